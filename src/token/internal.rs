//! Built-in file token helper

use crate::error::{TokenError, TokenResult};
use crate::token::TokenHelper;
use directories::BaseDirs;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const TOKEN_FILE_NAME: &str = ".vault-token";

/// Stores the token in `~/.vault-token`
#[derive(Debug, Clone)]
pub struct InternalTokenHelper {
    token_path: PathBuf,
}

impl InternalTokenHelper {
    pub fn new() -> TokenResult<Self> {
        let dirs = BaseDirs::new().ok_or(TokenError::NoHomeDir)?;
        Ok(Self::with_path(dirs.home_dir().join(TOKEN_FILE_NAME)))
    }

    /// Use a specific token file
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        InternalTokenHelper {
            token_path: path.into(),
        }
    }

    pub fn token_path(&self) -> &Path {
        &self.token_path
    }

    fn write_error(&self, error: io::Error) -> TokenError {
        TokenError::Write {
            path: self.token_path.clone(),
            error,
        }
    }
}

impl TokenHelper for InternalTokenHelper {
    fn path(&self) -> String {
        self.token_path.display().to_string()
    }

    fn get(&self) -> TokenResult<String> {
        match fs::read_to_string(&self.token_path) {
            Ok(contents) => Ok(contents.trim().to_string()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            Err(error) => Err(TokenError::Read {
                path: self.token_path.clone(),
                error,
            }),
        }
    }

    fn store(&self, token: &str) -> TokenResult<()> {
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options
            .open(&self.token_path)
            .map_err(|e| self.write_error(e))?;
        file.write_all(token.trim().as_bytes())
            .map_err(|e| self.write_error(e))
    }

    fn erase(&self) -> TokenResult<()> {
        match fs::remove_file(&self.token_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.write_error(e)),
        }
    }
}
