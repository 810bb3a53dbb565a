//! CLI interface
//!
//! This module handles command dispatch, help output and shell completion.

pub mod app;

// Re-export main types
pub use app::*;
