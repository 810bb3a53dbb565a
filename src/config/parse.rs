//! Configuration file discovery and parsing

use crate::config::types::DefaultConfig;
use crate::error::{ConfigError, ConfigResult};
use directories::BaseDirs;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable overriding the configuration file location
pub const ENV_CONFIG_PATH: &str = "VAULT_CONFIG_PATH";

/// File name of the configuration in the home directory
const CONFIG_FILE_NAME: &str = ".vault";

/// Location of the configuration file, if one can be determined
pub fn config_path() -> Option<PathBuf> {
    if let Ok(path) = env::var(ENV_CONFIG_PATH) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }
    BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILE_NAME))
}

/// Parse configuration from a string
pub fn parse_config(yaml: &str, path: &Path) -> ConfigResult<DefaultConfig> {
    if yaml.trim().is_empty() {
        return Ok(DefaultConfig::default());
    }
    serde_yaml::from_str(yaml).map_err(|error| ConfigError::Parse {
        path: path.to_path_buf(),
        error,
    })
}

/// Load configuration from `path`; a missing file is an empty configuration
pub fn load_config(path: &Path) -> ConfigResult<DefaultConfig> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no CLI config file");
            return Ok(DefaultConfig::default());
        }
        Err(error) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                error,
            })
        }
    };

    parse_config(&contents, path)
}

/// Load configuration from its default location
pub fn load_default_config() -> ConfigResult<DefaultConfig> {
    match config_path() {
        Some(path) => load_config(&path),
        None => Ok(DefaultConfig::default()),
    }
}
