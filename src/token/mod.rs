//! Token helpers
//!
//! A token helper persists the caller's token between invocations. The
//! built-in helper keeps it in a file in the home directory; an external
//! helper program can be configured instead.

pub mod external;
pub mod internal;

use crate::config::load_default_config;
use crate::error::TokenResult;
use std::sync::Arc;

pub use external::ExternalTokenHelper;
pub use internal::InternalTokenHelper;

/// Storage for the caller's token
pub trait TokenHelper: Send + Sync {
    /// Human-readable location of the token
    fn path(&self) -> String;

    /// The stored token; empty when none is stored
    fn get(&self) -> TokenResult<String>;

    fn store(&self, token: &str) -> TokenResult<()>;

    fn erase(&self) -> TokenResult<()>;
}

/// Produces the token helper to consult during client bootstrap
pub type TokenHelperFunc = Arc<dyn Fn() -> TokenResult<Box<dyn TokenHelper>> + Send + Sync>;

/// The helper named in the CLI configuration, or the built-in file helper
pub fn default_token_helper() -> TokenResult<Box<dyn TokenHelper>> {
    let config = load_default_config()?;
    match config.token_helper {
        Some(path) if !path.is_empty() => Ok(Box::new(ExternalTokenHelper::new(&path)?)),
        _ => Ok(Box::new(InternalTokenHelper::new()?)),
    }
}
