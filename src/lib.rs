//! Vault CLI - command-line flag and client bootstrap layer
//!
//! Commands declare grouped flag sets with environment-variable defaults and
//! completion hints, parse Go-style single-dash arguments, render wrapped help
//! text and turn the resolved flags into a configured API client.

// Public modules
pub mod api;
pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod flags;
pub mod token;
pub mod ui;

// Re-export commonly used types
pub use error::{Result, VaultError};

/// Current version of the CLI
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
