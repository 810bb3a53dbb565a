//! Server client configuration and construction
//!
//! Only the parts the command layer depends on live here: reading the
//! environment, applying TLS settings, holding the token and deciding
//! response wrapping.

pub mod client;
pub mod config;

// Re-export main types
pub use client::*;
pub use config::*;
