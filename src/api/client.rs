//! Client handle
//!
//! The handle validates its configuration and loads TLS material up front so
//! that a misconfigured client fails at construction rather than on first use.
//! Request execution lives outside this crate.

use crate::api::config::{Config, TlsConfig, ENV_VAULT_WRAP_TTL};
use crate::error::ClientError;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::debug;
use url::Url;

/// TTL used when wrapping is mandatory for the endpoint
pub const DEFAULT_WRAPPING_TTL: &str = "5m";

const PEM_MARKER: &str = "-----BEGIN";

/// Decides the response-wrapping TTL for an (operation, path) pair; an empty
/// string means the response is not wrapped
pub type WrappingLookupFunc = Arc<dyn Fn(&str, &str) -> String + Send + Sync>;

/// Default wrapping policy: `VAULT_WRAP_TTL` if set, else wrap only the
/// explicit wrap endpoint
pub fn default_wrapping_lookup_func(operation: &str, path: &str) -> String {
    if let Ok(ttl) = env::var(ENV_VAULT_WRAP_TTL) {
        if !ttl.is_empty() {
            return ttl;
        }
    }

    if (operation == "PUT" || operation == "POST") && path == "sys/wrapping/wrap" {
        return DEFAULT_WRAPPING_TTL.to_string();
    }

    String::new()
}

/// PEM blocks loaded for the TLS connection
#[derive(Debug, Default)]
pub struct TlsMaterial {
    pub ca_certs: Vec<String>,
    pub client_cert: Option<String>,
    pub client_key: Option<String>,
    pub server_name: Option<String>,
    pub insecure: bool,
}

struct ClientInner {
    config: Config,
    address: Url,
    proxy: Option<Url>,
    tls: Option<TlsMaterial>,
    token: RwLock<String>,
    wrapping: RwLock<Option<WrappingLookupFunc>>,
}

/// Cheaply clonable handle to a configured server client
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

impl Client {
    /// Build a client from `config`
    pub fn new(config: Config) -> Result<Self, ClientError> {
        let address = parse_address(&config.address)?;

        let proxy = match &config.proxy {
            Some(p) => Some(Url::parse(p).map_err(|_| ClientError::InvalidProxy(p.clone()))?),
            None => None,
        };

        let tls = match &config.tls {
            Some(t) => Some(load_tls(t)?),
            None => None,
        };

        debug!(address = %address, tls = tls.is_some(), "client configured");

        let token = config.token.clone();
        Ok(Client {
            inner: Arc::new(ClientInner {
                config,
                address,
                proxy,
                tls,
                token: RwLock::new(token),
                wrapping: RwLock::new(None),
            }),
        })
    }

    pub fn address(&self) -> &Url {
        &self.inner.address
    }

    pub fn proxy(&self) -> Option<&Url> {
        self.inner.proxy.as_ref()
    }

    /// The configuration this client was built from
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Custom TLS settings, if any were applied
    pub fn tls_config(&self) -> Option<&TlsConfig> {
        self.inner.config.tls.as_ref()
    }

    pub fn tls_material(&self) -> Option<&TlsMaterial> {
        self.inner.tls.as_ref()
    }

    pub fn token(&self) -> String {
        match self.inner.token.read() {
            Ok(token) => token.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn set_token(&self, token: &str) {
        match self.inner.token.write() {
            Ok(mut t) => *t = token.to_string(),
            Err(poisoned) => *poisoned.into_inner() = token.to_string(),
        }
    }

    pub fn clear_token(&self) {
        self.set_token("");
    }

    pub fn set_wrapping_lookup_func(&self, lookup: WrappingLookupFunc) {
        match self.inner.wrapping.write() {
            Ok(mut w) => *w = Some(lookup),
            Err(poisoned) => *poisoned.into_inner() = Some(lookup),
        }
    }

    /// Wrapping TTL for a request; empty means unwrapped
    pub fn wrapping_ttl(&self, operation: &str, path: &str) -> String {
        let lookup = match self.inner.wrapping.read() {
            Ok(w) => w.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        match lookup {
            Some(f) => f(operation, path),
            None => default_wrapping_lookup_func(operation, path),
        }
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("address", &self.inner.address.as_str())
            .field("tls", &self.inner.config.tls)
            .field("token", &if self.token().is_empty() { "" } else { "<redacted>" })
            .finish()
    }
}

fn parse_address(address: &str) -> Result<Url, ClientError> {
    let url = Url::parse(address).map_err(|e| ClientError::InvalidAddress {
        address: address.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" | "unix" => Ok(url),
        other => Err(ClientError::InvalidAddress {
            address: address.to_string(),
            reason: format!("unsupported scheme {:?}", other),
        }),
    }
}

fn read_pem(path: &Path) -> Result<String, ClientError> {
    let contents = fs::read_to_string(path).map_err(|error| ClientError::TlsMaterial {
        path: path.to_path_buf(),
        error,
    })?;
    if !contents.contains(PEM_MARKER) {
        return Err(ClientError::InvalidPem(path.to_path_buf()));
    }
    Ok(contents)
}

fn load_tls(tls: &TlsConfig) -> Result<TlsMaterial, ClientError> {
    let mut material = TlsMaterial {
        insecure: tls.insecure,
        ..TlsMaterial::default()
    };

    if !tls.tls_server_name.is_empty() {
        material.server_name = Some(tls.tls_server_name.clone());
    }

    match (tls.client_cert.is_empty(), tls.client_key.is_empty()) {
        (true, true) => {}
        (false, false) => {
            material.client_cert = Some(read_pem(Path::new(&tls.client_cert))?);
            material.client_key = Some(read_pem(Path::new(&tls.client_key))?);
        }
        _ => return Err(ClientError::IncompleteClientCert),
    }

    // A CA file takes precedence over a CA directory.
    if !tls.ca_cert.is_empty() {
        material.ca_certs.push(read_pem(Path::new(&tls.ca_cert))?);
    } else if !tls.ca_path.is_empty() {
        let dir = PathBuf::from(&tls.ca_path);
        if !dir.is_dir() {
            return Err(ClientError::CaPathNotDirectory(dir));
        }
        let entries = fs::read_dir(&dir).map_err(|error| ClientError::TlsMaterial {
            path: dir.clone(),
            error,
        })?;
        let mut paths: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .collect();
        paths.sort();
        for path in paths {
            if let Ok(pem) = read_pem(&path) {
                material.ca_certs.push(pem);
            }
        }
    }

    Ok(material)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const PEM: &str = "-----BEGIN CERTIFICATE-----\nMIIB\n-----END CERTIFICATE-----\n";

    #[test]
    fn test_new_with_defaults() {
        let client = Client::new(Config::default()).unwrap();
        assert_eq!(client.address().as_str(), "https://127.0.0.1:8200/");
        assert!(client.tls_config().is_none());
        assert!(client.token().is_empty());
    }

    #[test]
    fn test_invalid_address() {
        let config = Config {
            address: "not a url".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            Client::new(config),
            Err(ClientError::InvalidAddress { .. })
        ));

        let config = Config {
            address: "ftp://vault:21".to_string(),
            ..Config::default()
        };
        assert!(Client::new(config).is_err());
    }

    #[test]
    fn test_client_cert_requires_key() {
        let mut config = Config::default();
        config.configure_tls(TlsConfig {
            client_cert: "/some/cert.pem".to_string(),
            ..TlsConfig::default()
        });
        assert!(matches!(
            Client::new(config),
            Err(ClientError::IncompleteClientCert)
        ));
    }

    #[test]
    fn test_loads_ca_material() {
        let temp_dir = TempDir::new().unwrap();
        let ca = temp_dir.path().join("ca.pem");
        fs::write(&ca, PEM).unwrap();

        let mut config = Config::default();
        config.configure_tls(TlsConfig {
            ca_cert: ca.display().to_string(),
            tls_server_name: "vault.internal".to_string(),
            ..TlsConfig::default()
        });
        let client = Client::new(config).unwrap();
        let material = client.tls_material().unwrap();
        assert_eq!(material.ca_certs.len(), 1);
        assert_eq!(material.server_name.as_deref(), Some("vault.internal"));
    }

    #[test]
    fn test_ca_path_must_be_directory() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("file.pem");
        fs::write(&file, PEM).unwrap();

        let mut config = Config::default();
        config.configure_tls(TlsConfig {
            ca_path: file.display().to_string(),
            ..TlsConfig::default()
        });
        assert!(matches!(
            Client::new(config),
            Err(ClientError::CaPathNotDirectory(_))
        ));
    }

    #[test]
    fn test_non_pem_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let ca = temp_dir.path().join("ca.pem");
        fs::write(&ca, "garbage").unwrap();

        let mut config = Config::default();
        config.configure_tls(TlsConfig {
            ca_cert: ca.display().to_string(),
            ..TlsConfig::default()
        });
        assert!(matches!(Client::new(config), Err(ClientError::InvalidPem(_))));
    }

    #[test]
    fn test_token_roundtrip_through_handles() {
        let client = Client::new(Config::default()).unwrap();
        let other = client.clone();
        other.set_token("abc");
        assert_eq!(client.token(), "abc");
        client.clear_token();
        assert!(other.token().is_empty());
    }

    #[test]
    fn test_custom_wrapping_lookup() {
        let client = Client::new(Config::default()).unwrap();
        client.set_wrapping_lookup_func(Arc::new(|_: &str, _: &str| "10m".to_string()));
        assert_eq!(client.wrapping_ttl("GET", "secret/foo"), "10m");
    }
}
