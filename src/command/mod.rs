//! Commands and the base they share
//!
//! Every command embeds a [`BaseCommand`], declares which standard flag groups
//! it needs and builds its client through it.

pub mod base;
pub mod bootstrap;
pub mod format;
pub mod print_config;
pub mod print_token;

// Re-export main types
pub use base::*;
pub use bootstrap::*;
pub use format::*;
pub use print_config::PrintConfigCommand;
pub use print_token::PrintTokenCommand;

use crate::flags::FlagSets;

/// A runnable subcommand
pub trait Command: Send + Sync {
    /// One-line description for the command list
    fn synopsis(&self) -> String;

    /// Full help text, including grouped flag help
    fn help(&self) -> String;

    /// The command's flags, used to generate completion scripts
    fn flags(&self) -> Option<&FlagSets> {
        None
    }

    /// Run with the arguments following the command name; returns the exit code
    fn run(&self, args: &[String]) -> i32;
}

/// Build and parse the command's flags, flushing diagnostics before returning
///
/// Errors have already been reported on the UI; the `Err` value is the exit
/// code to return.
pub(crate) fn parse_flags<'a>(
    base: &'a BaseCommand,
    bits: FlagSetBit,
    args: &[String],
) -> Result<&'a FlagSets, i32> {
    let flags = match base.flag_set(bits) {
        Ok(flags) => flags,
        Err(e) => {
            base.ui().error(&e.to_string());
            return Err(1);
        }
    };

    let parsed = flags.parse(args);
    flags.close();
    match parsed {
        Ok(()) => Ok(flags),
        Err(_) => Err(1),
    }
}
