use std::env;
use std::io;
use std::process;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use vault_cli::cli::{utf8_args, App};
use vault_cli::ui::{BasicUi, Ui};

/// Environment variable controlling log verbosity
const ENV_VAULT_LOG: &str = "VAULT_LOG";

fn init_logging() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_env(ENV_VAULT_LOG).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{}", e))
}

fn main() {
    if let Err(e) = init_logging() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    let ui = Arc::new(BasicUi::new());
    let args = match utf8_args(env::args_os().skip(1)) {
        Ok(args) => args,
        Err(arg) => {
            ui.error(&format!("Argument is not valid UTF-8: {:?}", arg));
            process::exit(1);
        }
    };
    process::exit(App::new(ui).run(&args));
}
