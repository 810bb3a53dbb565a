//! Common test utilities

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use vault_cli::command::BaseCommand;
use vault_cli::error::{TokenError, TokenResult};
use vault_cli::token::{TokenHelper, TokenHelperFunc};
use vault_cli::ui::CaptureUi;

pub const PEM: &str = "-----BEGIN CERTIFICATE-----\nMIIB\n-----END CERTIFICATE-----\n";

/// Every environment variable the command layer reads, for clearing with temp-env
pub const VAULT_ENV: &[&str] = &[
    "VAULT_ADDR",
    "VAULT_CACERT",
    "VAULT_CAPATH",
    "VAULT_CLIENT_CERT",
    "VAULT_CLIENT_KEY",
    "VAULT_TLS_SERVER_NAME",
    "VAULT_SKIP_VERIFY",
    "VAULT_TOKEN",
    "VAULT_WRAP_TTL",
    "VAULT_MAX_RETRIES",
    "VAULT_CLIENT_TIMEOUT",
    "VAULT_FORMAT",
    "HTTPS_PROXY",
    "https_proxy",
];

/// Pairs for `temp_env::with_vars` that unset every Vault variable, then apply `set`
pub fn clean_env(set: &[(&str, &str)]) -> Vec<(String, Option<String>)> {
    let mut vars: Vec<(String, Option<String>)> = VAULT_ENV
        .iter()
        .map(|name| (name.to_string(), None))
        .collect();
    for (name, value) in set {
        vars.retain(|(n, _)| n != name);
        vars.push((name.to_string(), Some(value.to_string())));
    }
    vars
}

pub fn strings(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

/// Create a temporary directory with a PEM file of the given name
pub fn create_pem(name: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(name);
    fs::write(&path, PEM).unwrap();
    (temp_dir, path)
}

/// A base command writing to a capturing UI
pub fn base_command() -> (BaseCommand, Arc<CaptureUi>) {
    let ui = Arc::new(CaptureUi::new());
    (BaseCommand::new(ui.clone()), ui)
}

/// In-memory token store that counts lookups
pub struct MemoryTokenHelper {
    pub token: String,
    pub gets: Arc<AtomicUsize>,
}

impl TokenHelper for MemoryTokenHelper {
    fn path(&self) -> String {
        "memory".to_string()
    }

    fn get(&self) -> TokenResult<String> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        Ok(self.token.clone())
    }

    fn store(&self, _token: &str) -> TokenResult<()> {
        Ok(())
    }

    fn erase(&self) -> TokenResult<()> {
        Ok(())
    }
}

/// Token helper factory returning `token`, plus the shared lookup counter
pub fn memory_token_helper(token: &str) -> (TokenHelperFunc, Arc<AtomicUsize>) {
    let gets = Arc::new(AtomicUsize::new(0));
    let token = token.to_string();
    let counter = Arc::clone(&gets);
    let func: TokenHelperFunc = Arc::new(move || -> TokenResult<Box<dyn TokenHelper>> {
        Ok(Box::new(MemoryTokenHelper {
            token: token.clone(),
            gets: Arc::clone(&counter),
        }))
    });
    (func, gets)
}

/// Token helper factory that cannot be constructed
pub fn failing_token_helper() -> TokenHelperFunc {
    Arc::new(|| -> TokenResult<Box<dyn TokenHelper>> { Err(TokenError::NoHomeDir) })
}

/// Token helper whose lookup fails
pub fn broken_store_helper() -> TokenHelperFunc {
    struct Broken;

    impl TokenHelper for Broken {
        fn path(&self) -> String {
            "broken".to_string()
        }
        fn get(&self) -> TokenResult<String> {
            Err(TokenError::Read {
                path: PathBuf::from("/nonexistent/.vault-token"),
                error: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            })
        }
        fn store(&self, _token: &str) -> TokenResult<()> {
            Ok(())
        }
        fn erase(&self) -> TokenResult<()> {
            Ok(())
        }
    }

    Arc::new(|| -> TokenResult<Box<dyn TokenHelper>> { Ok(Box::new(Broken)) })
}
