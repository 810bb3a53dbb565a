//! CLI configuration file
//!
//! This module handles discovery and parsing of the user's CLI configuration,
//! which currently only selects the token helper.

pub mod parse;
pub mod types;

// Re-export main types
pub use parse::*;
pub use types::*;
