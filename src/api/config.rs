//! Client configuration and its environment defaults

use crate::error::EnvError;
use crate::flags::duration::{parse_bool, parse_duration};
use serde::Serialize;
use std::env;
use std::time::Duration;

pub const ENV_VAULT_ADDRESS: &str = "VAULT_ADDR";
pub const ENV_VAULT_CACERT: &str = "VAULT_CACERT";
pub const ENV_VAULT_CAPATH: &str = "VAULT_CAPATH";
pub const ENV_VAULT_CLIENT_CERT: &str = "VAULT_CLIENT_CERT";
pub const ENV_VAULT_CLIENT_KEY: &str = "VAULT_CLIENT_KEY";
pub const ENV_VAULT_TLS_SERVER_NAME: &str = "VAULT_TLS_SERVER_NAME";
pub const ENV_VAULT_INSECURE: &str = "VAULT_SKIP_VERIFY";
pub const ENV_VAULT_TOKEN: &str = "VAULT_TOKEN";
pub const ENV_VAULT_WRAP_TTL: &str = "VAULT_WRAP_TTL";
pub const ENV_VAULT_MAX_RETRIES: &str = "VAULT_MAX_RETRIES";
pub const ENV_VAULT_CLIENT_TIMEOUT: &str = "VAULT_CLIENT_TIMEOUT";
pub const ENV_VAULT_FORMAT: &str = "VAULT_FORMAT";

pub const DEFAULT_ADDRESS: &str = "https://127.0.0.1:8200";
const DEFAULT_MAX_RETRIES: u32 = 2;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// TLS settings applied to the client
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TlsConfig {
    /// PEM-encoded CA certificate file
    pub ca_cert: String,
    /// Directory of PEM-encoded CA certificates
    pub ca_path: String,
    pub client_cert: String,
    pub client_key: String,
    /// SNI host name
    pub tls_server_name: String,
    /// Skip certificate verification
    pub insecure: bool,
}

impl TlsConfig {
    /// True when every field is at its default
    pub fn is_empty(&self) -> bool {
        *self == TlsConfig::default()
    }
}

/// Settings the client is built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the server
    pub address: String,
    /// Custom TLS settings; `None` keeps the platform defaults
    pub tls: Option<TlsConfig>,
    /// HTTPS proxy URL
    pub proxy: Option<String>,
    pub max_retries: u32,
    pub timeout: Duration,
    /// Token picked up from the environment
    pub token: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            address: DEFAULT_ADDRESS.to_string(),
            tls: None,
            proxy: None,
            max_retries: DEFAULT_MAX_RETRIES,
            timeout: DEFAULT_TIMEOUT,
            token: String::new(),
        }
    }
}

impl Config {
    /// Replace the TLS settings
    pub fn configure_tls(&mut self, tls: TlsConfig) {
        self.tls = Some(tls);
    }

    /// Overlay settings from the process environment
    pub fn read_environment(&mut self) -> Result<(), EnvError> {
        self.read_environment_from(|key| env::var(key).ok())
    }

    /// Overlay settings from `lookup`; unset and empty variables are skipped
    pub fn read_environment_from<F>(&mut self, lookup: F) -> Result<(), EnvError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(addr) = get(ENV_VAULT_ADDRESS) {
            self.address = addr;
        }

        if let Some(v) = get(ENV_VAULT_MAX_RETRIES) {
            self.max_retries = v
                .parse()
                .map_err(|e: std::num::ParseIntError| invalid(ENV_VAULT_MAX_RETRIES, &v, e))?;
        }

        if let Some(v) = get(ENV_VAULT_CLIENT_TIMEOUT) {
            self.timeout =
                parse_duration(&v).map_err(|e| invalid(ENV_VAULT_CLIENT_TIMEOUT, &v, e))?;
        }

        let insecure = match get(ENV_VAULT_INSECURE) {
            Some(v) => Some(parse_bool(&v).map_err(|e| invalid(ENV_VAULT_INSECURE, &v, e))?),
            None => None,
        };

        let tls = TlsConfig {
            ca_cert: get(ENV_VAULT_CACERT).unwrap_or_default(),
            ca_path: get(ENV_VAULT_CAPATH).unwrap_or_default(),
            client_cert: get(ENV_VAULT_CLIENT_CERT).unwrap_or_default(),
            client_key: get(ENV_VAULT_CLIENT_KEY).unwrap_or_default(),
            tls_server_name: get(ENV_VAULT_TLS_SERVER_NAME).unwrap_or_default(),
            insecure: insecure.unwrap_or(false),
        };
        if !tls.is_empty() {
            self.configure_tls(tls);
        }

        if let Some(proxy) = get("HTTPS_PROXY").or_else(|| get("https_proxy")) {
            self.proxy = Some(proxy);
        }

        if let Some(token) = get(ENV_VAULT_TOKEN) {
            self.token = token;
        }

        Ok(())
    }
}

fn invalid(var: &str, value: &str, reason: impl ToString) -> EnvError {
    EnvError::Invalid {
        var: var.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn read(vars: &[(&str, &str)]) -> Result<Config, EnvError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let mut config = Config::default();
        config.read_environment_from(|k| map.get(k).cloned())?;
        Ok(config)
    }

    #[test]
    fn test_defaults() {
        let config = read(&[]).unwrap();
        assert_eq!(config.address, DEFAULT_ADDRESS);
        assert!(config.tls.is_none());
        assert!(config.token.is_empty());
        assert_eq!(config.max_retries, 2);
    }

    #[test]
    fn test_address_and_token() {
        let config = read(&[
            (ENV_VAULT_ADDRESS, "https://vault.example.com:8200"),
            (ENV_VAULT_TOKEN, "envtok"),
        ])
        .unwrap();
        assert_eq!(config.address, "https://vault.example.com:8200");
        assert_eq!(config.token, "envtok");
    }

    #[test]
    fn test_tls_from_environment() {
        let config = read(&[(ENV_VAULT_INSECURE, "true"), (ENV_VAULT_CACERT, "/ca.pem")]).unwrap();
        let tls = config.tls.unwrap();
        assert!(tls.insecure);
        assert_eq!(tls.ca_cert, "/ca.pem");
    }

    #[test]
    fn test_skip_verify_false_leaves_tls_alone() {
        let config = read(&[(ENV_VAULT_INSECURE, "false")]).unwrap();
        assert!(config.tls.is_none());
    }

    #[test]
    fn test_malformed_values_fail() {
        let err = read(&[(ENV_VAULT_INSECURE, "perhaps")]).unwrap_err();
        assert!(err.to_string().contains(ENV_VAULT_INSECURE));
        assert!(read(&[(ENV_VAULT_MAX_RETRIES, "many")]).is_err());
        assert!(read(&[(ENV_VAULT_CLIENT_TIMEOUT, "later")]).is_err());
    }

    #[test]
    fn test_proxy() {
        let config = read(&[("https_proxy", "http://proxy:3128")]).unwrap();
        assert_eq!(config.proxy.as_deref(), Some("http://proxy:3128"));
    }
}
