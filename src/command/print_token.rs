//! `vault print token`

use crate::command::base::{BaseCommand, FlagSetBit};
use crate::command::{parse_flags, Command};
use crate::flags::FlagSets;

/// Prints the token that other commands would use
pub struct PrintTokenCommand {
    pub base: BaseCommand,
}

impl PrintTokenCommand {
    pub fn new(base: BaseCommand) -> Self {
        PrintTokenCommand { base }
    }
}

impl Command for PrintTokenCommand {
    fn synopsis(&self) -> String {
        "Prints the contents of a token".to_string()
    }

    fn help(&self) -> String {
        let mut help = String::from(
            "Usage: vault print token [options]\n\n  \
             Prints the value of the Vault token that will be used for commands, after\n  \
             taking into account the configured token helper and the environment.\n\n      \
             $ vault print token\n\n",
        );
        if let Some(flags) = self.flags() {
            help.push_str(&flags.help());
        }
        help
    }

    fn flags(&self) -> Option<&FlagSets> {
        self.base.flag_set(FlagSetBit::HTTP).ok()
    }

    fn run(&self, args: &[String]) -> i32 {
        let ui = self.base.ui();
        let flags = match parse_flags(&self.base, FlagSetBit::HTTP, args) {
            Ok(flags) => flags,
            Err(code) => return code,
        };

        let args = flags.args();
        if !args.is_empty() {
            ui.error(&format!(
                "Too many arguments (expected 0, got {})",
                args.len()
            ));
            return 1;
        }

        let client = match self.base.client() {
            Ok(client) => client,
            Err(e) => {
                ui.error(&e.to_string());
                return 2;
            }
        };

        ui.output(&client.token());
        0
    }
}
