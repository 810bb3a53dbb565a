//! External token helper programs
//!
//! The helper is invoked through the shell with a single verb argument:
//! `get` prints the token, `store` reads it from stdin, `erase` removes it.

use crate::error::{TokenError, TokenResult};
use crate::token::TokenHelper;
use std::io::{ErrorKind, Write};
use std::path::Path;
use std::process::{Command as StdCommand, Output, Stdio};
use tracing::debug;

/// Token helper backed by a user-supplied program
#[derive(Debug, Clone)]
pub struct ExternalTokenHelper {
    binary_path: String,
}

impl ExternalTokenHelper {
    /// The program path must be absolute
    pub fn new(binary_path: &str) -> TokenResult<Self> {
        if !Path::new(binary_path).is_absolute() {
            return Err(TokenError::RelativeHelperPath(binary_path.to_string()));
        }
        Ok(ExternalTokenHelper {
            binary_path: binary_path.to_string(),
        })
    }

    fn command(&self, verb: &str) -> StdCommand {
        let line = format!("{} {}", self.binary_path, verb);
        #[cfg(windows)]
        let mut command = {
            let mut c = StdCommand::new("cmd");
            c.arg("/C").arg(line);
            c
        };
        #[cfg(not(windows))]
        let mut command = {
            let mut c = StdCommand::new("sh");
            c.arg("-c").arg(line);
            c
        };
        command.stderr(Stdio::piped()).stdout(Stdio::piped());
        command
    }

    fn run(&self, verb: &str, input: Option<&str>) -> TokenResult<Output> {
        debug!(helper = %self.binary_path, verb, "running token helper");
        let spawn_error = |error| TokenError::Spawn {
            program: self.binary_path.clone(),
            error,
        };

        let mut command = self.command(verb);
        command.stdin(if input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        });

        let mut child = command.spawn().map_err(spawn_error)?;
        if let (Some(text), Some(mut stdin)) = (input, child.stdin.take()) {
            // A helper that exits without reading stdin is reported by its status.
            match stdin.write_all(text.as_bytes()) {
                Err(e) if e.kind() != ErrorKind::BrokenPipe => return Err(spawn_error(e)),
                _ => {}
            }
        }
        let output = child.wait_with_output().map_err(spawn_error)?;

        if !output.status.success() {
            return Err(TokenError::HelperFailed {
                program: self.binary_path.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output)
    }
}

impl TokenHelper for ExternalTokenHelper {
    fn path(&self) -> String {
        self.binary_path.clone()
    }

    fn get(&self) -> TokenResult<String> {
        let output = self.run("get", None)?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn store(&self, token: &str) -> TokenResult<()> {
        self.run("store", Some(token)).map(|_| ())
    }

    fn erase(&self) -> TokenResult<()> {
        self.run("erase", None).map(|_| ())
    }
}
