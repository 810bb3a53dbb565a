//! Shared base for every command
//!
//! Holds the storage for the common flags, builds the command's flag sets
//! exactly once and turns the resolved flags into a client.

use crate::api::{Client, Config, ENV_VAULT_FORMAT};
use crate::api::{
    DEFAULT_ADDRESS, ENV_VAULT_ADDRESS, ENV_VAULT_CACERT, ENV_VAULT_CAPATH, ENV_VAULT_CLIENT_CERT,
    ENV_VAULT_CLIENT_KEY, ENV_VAULT_INSECURE, ENV_VAULT_TLS_SERVER_NAME, ENV_VAULT_WRAP_TTL,
};
use crate::command::bootstrap::{bootstrap, HttpFlags};
use crate::error::{ApiError, ApiResult, FlagError, FlagResult};
use crate::flags::{BoolVar, DurationVar, FlagSet, FlagSets, Predictor, StringVar, Target};
use crate::token::TokenHelperFunc;
use crate::ui::Ui;
use std::ops::BitOr;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

/// Selects which standard flag groups a command registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagSetBit(u32);

impl FlagSetBit {
    pub const NONE: FlagSetBit = FlagSetBit(1 << 0);
    pub const HTTP: FlagSetBit = FlagSetBit(1 << 1);
    pub const OUTPUT_FIELD: FlagSetBit = FlagSetBit(1 << 2);
    pub const OUTPUT_FORMAT: FlagSetBit = FlagSetBit(1 << 3);

    /// True if any bit of `other` is set
    pub fn intersects(self, other: FlagSetBit) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for FlagSetBit {
    type Output = FlagSetBit;

    fn bitor(self, rhs: FlagSetBit) -> FlagSetBit {
        FlagSetBit(self.0 | rhs.0)
    }
}

/// State shared by all commands
pub struct BaseCommand {
    ui: Arc<dyn Ui>,

    flags: OnceLock<Result<FlagSets, FlagError>>,

    flag_address: Target<String>,
    flag_ca_cert: Target<String>,
    flag_ca_path: Target<String>,
    flag_client_cert: Target<String>,
    flag_client_key: Target<String>,
    flag_tls_server_name: Target<String>,
    flag_tls_skip_verify: Target<bool>,
    flag_wrap_ttl: Target<Duration>,

    flag_format: Target<String>,
    flag_field: Target<String>,

    token_helper: Option<TokenHelperFunc>,

    // Pre-built client; bypasses bootstrap when present.
    client: Option<Client>,
}

impl BaseCommand {
    pub fn new(ui: Arc<dyn Ui>) -> Self {
        BaseCommand {
            ui,
            flags: OnceLock::new(),
            flag_address: Target::default(),
            flag_ca_cert: Target::default(),
            flag_ca_path: Target::default(),
            flag_client_cert: Target::default(),
            flag_client_key: Target::default(),
            flag_tls_server_name: Target::default(),
            flag_tls_skip_verify: Target::default(),
            flag_wrap_ttl: Target::default(),
            flag_format: Target::default(),
            flag_field: Target::default(),
            token_helper: None,
            client: None,
        }
    }

    pub fn with_token_helper(mut self, token_helper: TokenHelperFunc) -> Self {
        self.token_helper = Some(token_helper);
        self
    }

    /// Use `client` for every call to [`BaseCommand::client`]
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn ui(&self) -> &Arc<dyn Ui> {
        &self.ui
    }

    /// The command's flag sets, built on first call
    ///
    /// Later calls return the same instance regardless of `bit`.
    pub fn flag_set(&self, bit: FlagSetBit) -> FlagResult<&FlagSets> {
        self.flag_set_with(bit, |_| Ok(()))
    }

    /// Like [`BaseCommand::flag_set`], letting the command add its own groups
    /// after the standard ones
    pub fn flag_set_with<F>(&self, bit: FlagSetBit, extra: F) -> FlagResult<&FlagSets>
    where
        F: FnOnce(&mut FlagSets) -> FlagResult<()>,
    {
        self.flags
            .get_or_init(|| {
                let mut set = self.standard_flag_sets(bit)?;
                extra(&mut set)?;
                Ok(set)
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    fn standard_flag_sets(&self, bit: FlagSetBit) -> FlagResult<FlagSets> {
        let mut set = FlagSets::new(Arc::clone(&self.ui));

        if bit.intersects(FlagSetBit::HTTP) {
            set.add_flag_set(self.http_flag_set()?)?;
        }

        if bit.intersects(FlagSetBit::OUTPUT_FIELD | FlagSetBit::OUTPUT_FORMAT) {
            let mut f = FlagSet::new("Output Options");

            if bit.intersects(FlagSetBit::OUTPUT_FIELD) {
                f.string_var(
                    StringVar::new("field", &self.flag_field)
                        .completion(Predictor::Anything)
                        .usage(
                            "Print only the field with the given name. Specifying \
                             this option will take precedence over other formatting \
                             directives. The result will not have a trailing newline \
                             making it idea for piping to other processes.",
                        ),
                )?;
            }

            if bit.intersects(FlagSetBit::OUTPUT_FORMAT) {
                f.string_var(
                    StringVar::new("format", &self.flag_format)
                        .default("table")
                        .env(ENV_VAULT_FORMAT)
                        .completion(Predictor::set(["table", "json", "yaml"]))
                        .usage(
                            "Print the output in the given format. Valid formats \
                             are \"table\", \"json\", or \"yaml\".",
                        ),
                )?;
            }

            set.add_flag_set(f)?;
        }

        Ok(set)
    }

    fn http_flag_set(&self) -> FlagResult<FlagSet> {
        let mut f = FlagSet::new("HTTP Options");

        f.string_var(
            StringVar::new("address", &self.flag_address)
                .default(DEFAULT_ADDRESS)
                .env(ENV_VAULT_ADDRESS)
                .completion(Predictor::Anything)
                .usage("Address of the Vault server."),
        )?;

        f.string_var(
            StringVar::new("ca-cert", &self.flag_ca_cert)
                .env(ENV_VAULT_CACERT)
                .completion(Predictor::files("*"))
                .usage(
                    "Path on the local disk to a single PEM-encoded CA \
                     certificate to verify the Vault server's SSL certificate. This \
                     takes precendence over -ca-path.",
                ),
        )?;

        f.string_var(
            StringVar::new("ca-path", &self.flag_ca_path)
                .env(ENV_VAULT_CAPATH)
                .completion(Predictor::dirs("*"))
                .usage(
                    "Path on the local disk to a directory of PEM-encoded CA \
                     certificates to verify the Vault server's SSL certificate.",
                ),
        )?;

        f.string_var(
            StringVar::new("client-cert", &self.flag_client_cert)
                .env(ENV_VAULT_CLIENT_CERT)
                .completion(Predictor::files("*"))
                .usage(
                    "Path on the local disk to a single PEM-encoded CA \
                     certificate to use for TLS authentication to the Vault server. If \
                     this flag is specified, -client-key is also required.",
                ),
        )?;

        f.string_var(
            StringVar::new("client-key", &self.flag_client_key)
                .env(ENV_VAULT_CLIENT_KEY)
                .completion(Predictor::files("*"))
                .usage(
                    "Path on the local disk to a single PEM-encoded private key \
                     matching the client certificate from -client-cert.",
                ),
        )?;

        f.string_var(
            StringVar::new("tls-server-name", &self.flag_tls_server_name)
                .env(ENV_VAULT_TLS_SERVER_NAME)
                .completion(Predictor::Anything)
                .usage(
                    "Name to use as the SNI host when connecting to the Vault \
                     server via TLS.",
                ),
        )?;

        f.bool_var(
            BoolVar::new("tls-skip-verify", &self.flag_tls_skip_verify)
                .env(ENV_VAULT_INSECURE)
                .completion(Predictor::Nothing)
                .usage(
                    "Disable verification of TLS certificates. Using this option \
                     is highly discouraged and decreases the security of data \
                     transmissions to and from the Vault server.",
                ),
        )?;

        f.duration_var(
            DurationVar::new("wrap-ttl", &self.flag_wrap_ttl)
                .env(ENV_VAULT_WRAP_TTL)
                .completion(Predictor::Anything)
                .usage(
                    "Wraps the response in a cubbyhole token with the requested \
                     TTL. The response is available via the \"vault unwrap\" command. \
                     The TTL is specified as a numeric string with suffix like \"30s\" \
                     or \"5m\"",
                ),
        )?;

        Ok(f)
    }

    pub fn address(&self) -> String {
        self.flag_address.get()
    }

    pub fn wrap_ttl(&self) -> Duration {
        self.flag_wrap_ttl.get()
    }

    /// Selected output format
    pub fn format(&self) -> String {
        self.flag_format.get()
    }

    /// Field selected for raw output; empty when unset
    pub fn field(&self) -> String {
        self.flag_field.get()
    }

    /// Snapshot of the HTTP option values
    pub fn http_flags(&self) -> HttpFlags {
        HttpFlags {
            address: self.flag_address.get(),
            ca_cert: self.flag_ca_cert.get(),
            ca_path: self.flag_ca_path.get(),
            client_cert: self.flag_client_cert.get(),
            client_key: self.flag_client_key.get(),
            tls_server_name: self.flag_tls_server_name.get(),
            tls_skip_verify: self.flag_tls_skip_verify.get(),
            wrap_ttl: self.flag_wrap_ttl.get(),
        }
    }

    /// The API client for this invocation
    pub fn client(&self) -> ApiResult<Client> {
        if let Some(client) = &self.client {
            return Ok(client.clone());
        }

        let mut config = Config::default();
        config.read_environment().map_err(ApiError::Environment)?;

        bootstrap(config, &self.http_flags(), self.token_helper.as_ref())
    }
}
