//! `vault print config`

use crate::command::base::{BaseCommand, FlagSetBit};
use crate::command::format::{output_data, print_raw_field};
use crate::command::{parse_flags, Command};
use crate::error::{FormatError, Result};
use crate::flags::{format_duration, FlagSets};
use serde::Serialize;
use serde_json::Value;

/// Settings the client would be built with, after flags and environment
#[derive(Debug, Serialize)]
struct ResolvedConfig {
    address: String,
    ca_cert: String,
    ca_path: String,
    client_cert: String,
    client_key: String,
    tls_server_name: String,
    tls_skip_verify: bool,
    proxy: Option<String>,
    max_retries: u32,
    timeout: String,
    wrap_ttl: String,
    token_present: bool,
}

/// Prints the resolved client configuration
pub struct PrintConfigCommand {
    pub base: BaseCommand,
}

impl PrintConfigCommand {
    pub fn new(base: BaseCommand) -> Self {
        PrintConfigCommand { base }
    }

    fn flag_bits() -> FlagSetBit {
        FlagSetBit::HTTP | FlagSetBit::OUTPUT_FIELD | FlagSetBit::OUTPUT_FORMAT
    }

    /// Client settings after flags, environment and token helper
    fn resolved(&self) -> Result<Value> {
        let client = self.base.client()?;
        let config = client.config();
        let tls = config.tls.clone().unwrap_or_default();
        let resolved = ResolvedConfig {
            address: client.address().to_string(),
            ca_cert: tls.ca_cert,
            ca_path: tls.ca_path,
            client_cert: tls.client_cert,
            client_key: tls.client_key,
            tls_server_name: tls.tls_server_name,
            tls_skip_verify: tls.insecure,
            proxy: config.proxy.clone(),
            max_retries: config.max_retries,
            timeout: format_duration(config.timeout),
            wrap_ttl: client.wrapping_ttl("GET", ""),
            token_present: !client.token().is_empty(),
        };
        Ok(serde_json::to_value(&resolved).map_err(FormatError::from)?)
    }
}

impl Command for PrintConfigCommand {
    fn synopsis(&self) -> String {
        "Prints the resolved client configuration".to_string()
    }

    fn help(&self) -> String {
        let mut help = String::from(
            "Usage: vault print config [options]\n\n  \
             Prints the settings the client is built from after applying flags,\n  \
             the environment and the token helper. The token itself is never shown.\n\n      \
             $ vault print config -format=json\n\n",
        );
        if let Some(flags) = self.flags() {
            help.push_str(&flags.help());
        }
        help
    }

    fn flags(&self) -> Option<&FlagSets> {
        self.base.flag_set(Self::flag_bits()).ok()
    }

    fn run(&self, args: &[String]) -> i32 {
        let ui = self.base.ui();
        let flags = match parse_flags(&self.base, Self::flag_bits(), args) {
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

        let data = match self.resolved() {
            Ok(data) => data,
            Err(e) => {
                ui.error(&e.to_string());
                return 2;
            }
        };

        let field = self.base.field();
        let result = if field.is_empty() {
            output_data(ui.as_ref(), &self.base.format(), &data)
        } else {
            print_raw_field(ui.as_ref(), &data, &field)
        };

        match result {
            Ok(()) => 0,
            Err(e) => {
                ui.error(&e.to_string());
                1
            }
        }
    }
}
