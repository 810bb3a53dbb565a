//! Grouped command-line flags
//!
//! Flags are declared as typed bindings, collected into named sections and
//! parsed in one pass. Help output is rendered per section with wrapped usage
//! text.

pub mod binding;
pub mod duration;
pub mod help;
pub mod predict;
pub mod sets;
pub mod wrap;

// Re-export main types
pub use binding::*;
pub use duration::{format_duration, parse_bool, parse_duration, ValueError};
pub use predict::Predictor;
pub use sets::{FlagSet, FlagSets};
pub use wrap::{wrap_at_length, MAX_LINE_LENGTH};
