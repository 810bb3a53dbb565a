//! Client bootstrap
//!
//! Turns environment defaults plus resolved flag values into a ready client:
//! address override, TLS settings, response wrapping and the token.

use crate::api::{default_wrapping_lookup_func, Client, Config, TlsConfig, WrappingLookupFunc};
use crate::error::{ApiError, ApiResult};
use crate::flags::format_duration;
use crate::token::TokenHelperFunc;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Resolved values of the HTTP option group
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpFlags {
    pub address: String,
    pub ca_cert: String,
    pub ca_path: String,
    pub client_cert: String,
    pub client_key: String,
    pub tls_server_name: String,
    pub tls_skip_verify: bool,
    pub wrap_ttl: Duration,
}

impl HttpFlags {
    /// TLS settings, present only if at least one TLS flag is set
    pub fn tls_config(&self) -> Option<TlsConfig> {
        let tls = TlsConfig {
            ca_cert: self.ca_cert.clone(),
            ca_path: self.ca_path.clone(),
            client_cert: self.client_cert.clone(),
            client_key: self.client_key.clone(),
            tls_server_name: self.tls_server_name.clone(),
            insecure: self.tls_skip_verify,
        };
        if tls.is_empty() {
            None
        } else {
            Some(tls)
        }
    }
}

/// Wrapping policy for a fixed TTL; zero defers to the default policy
pub fn wrapping_lookup_func(wrap_ttl: Duration) -> WrappingLookupFunc {
    if wrap_ttl.is_zero() {
        return Arc::new(default_wrapping_lookup_func);
    }
    let ttl = format_duration(wrap_ttl);
    Arc::new(move |_operation: &str, _path: &str| ttl.clone())
}

/// Build a client from environment-derived `config` and the HTTP flags
///
/// The token already on the client (from the environment) wins; otherwise the
/// token helper is asked. An empty token leaves the client unauthenticated.
pub fn bootstrap(
    mut config: Config,
    flags: &HttpFlags,
    token_helper: Option<&TokenHelperFunc>,
) -> ApiResult<Client> {
    if !flags.address.is_empty() {
        config.address = flags.address.clone();
    }

    if let Some(tls) = flags.tls_config() {
        config.configure_tls(tls);
    }

    let client = Client::new(config).map_err(ApiError::Client)?;
    client.set_wrapping_lookup_func(wrapping_lookup_func(flags.wrap_ttl));

    let mut token = client.token();
    if token.is_empty() {
        if let Some(get_helper) = token_helper {
            let helper = get_helper().map_err(ApiError::TokenHelper)?;
            token = helper.get().map_err(ApiError::TokenRetrieve)?;
            debug!(helper = %helper.path(), found = !token.is_empty(), "consulted token helper");
        }
    }

    if !token.is_empty() {
        client.set_token(&token);
    }

    Ok(client)
}
