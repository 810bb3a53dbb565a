//! CLI configuration file types
//!
//! The file lives at `~/.vault` unless `VAULT_CONFIG_PATH` points elsewhere.

use serde::{Deserialize, Serialize};

/// Top-level configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DefaultConfig {
    /// Absolute path of an external token helper program
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_helper: Option<String>,
}
