//! Error types for the Vault command layer

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for command-layer operations
pub type Result<T> = std::result::Result<T, VaultError>;

/// Main error type for the command layer
#[derive(Error, Debug)]
pub enum VaultError {
    /// Flag registration and parsing errors
    #[error(transparent)]
    Flag(#[from] FlagError),

    /// Client bootstrap errors
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Token store errors
    #[error(transparent)]
    Token(#[from] TokenError),

    /// CLI configuration file errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Output formatting errors
    #[error(transparent)]
    Format(#[from] FormatError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Flag registration and parsing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlagError {
    #[error("flag redefined: {0}")]
    Redefined(String),

    /// Diagnostic text produced by the argument parser
    #[error("{0}")]
    Parse(String),
}

/// Errors raised while building the API client
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("failed to read environment: {0}")]
    Environment(#[source] EnvError),

    #[error("failed to create client: {0}")]
    Client(#[source] ClientError),

    #[error("failed to get token helper: {0}")]
    TokenHelper(#[source] TokenError),

    #[error("failed to retrieve from token helper: {0}")]
    TokenRetrieve(#[source] TokenError),
}

/// Malformed environment values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvError {
    #[error("could not parse {var}={value:?}: {reason}")]
    Invalid {
        var: String,
        value: String,
        reason: String,
    },
}

/// Client construction failures
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("invalid address {address:?}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("both client cert and client key must be provided")]
    IncompleteClientCert,

    #[error("failed to read TLS material {path}: {error}")]
    TlsMaterial { path: PathBuf, error: io::Error },

    #[error("no PEM data found in {0}")]
    InvalidPem(PathBuf),

    #[error("CA path {0} is not a directory")]
    CaPathNotDirectory(PathBuf),

    #[error("invalid proxy URL {0:?}")]
    InvalidProxy(String),
}

/// Token store errors
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("could not determine home directory")]
    NoHomeDir,

    #[error("token helper path must be absolute: {0}")]
    RelativeHelperPath(String),

    #[error("error reading token file {path}: {error}")]
    Read { path: PathBuf, error: io::Error },

    #[error("error writing token file {path}: {error}")]
    Write { path: PathBuf, error: io::Error },

    #[error("failed to run token helper {program}: {error}")]
    Spawn { program: String, error: io::Error },

    #[error("token helper {program} exited with {status}: {stderr}")]
    HelperFailed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// CLI configuration file errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {error}")]
    Read { path: PathBuf, error: io::Error },

    #[error("failed to parse config file {path}: {error}")]
    Parse {
        path: PathBuf,
        error: serde_yaml::Error,
    },
}

/// Output formatting errors
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("Invalid output format: {0}. Valid formats are \"table\", \"json\", or \"yaml\"")]
    UnknownFormat(String),

    #[error("Field {0:?} not present in data")]
    MissingField(String),

    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to encode YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Specialized result type for flag operations
pub type FlagResult<T> = std::result::Result<T, FlagError>;

/// Specialized result type for client bootstrap
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Specialized result type for token store operations
pub type TokenResult<T> = std::result::Result<T, TokenError>;

/// Specialized result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
