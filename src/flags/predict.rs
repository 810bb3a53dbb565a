//! Completion predicates attached to flags
//!
//! A predictor only suggests values to a shell-completion integration; it is
//! never consulted while parsing.

use clap::ValueHint;

/// Suggests candidate values for a flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predictor {
    /// Any value is acceptable; nothing to suggest
    Anything,
    /// The flag takes no value
    Nothing,
    /// Files matching the glob pattern
    Files(String),
    /// Directories matching the glob pattern
    Dirs(String),
    /// One of a fixed set of values
    Set(Vec<String>),
}

impl Predictor {
    pub fn files(pattern: &str) -> Self {
        Predictor::Files(pattern.to_string())
    }

    pub fn dirs(pattern: &str) -> Self {
        Predictor::Dirs(pattern.to_string())
    }

    pub fn set<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Predictor::Set(values.into_iter().map(Into::into).collect())
    }

    /// Candidates for the partially typed value `last`
    pub fn predict(&self, last: &str) -> Vec<String> {
        match self {
            Predictor::Anything | Predictor::Nothing => Vec::new(),
            Predictor::Set(values) => values
                .iter()
                .filter(|v| v.starts_with(last))
                .cloned()
                .collect(),
            Predictor::Files(pattern) => predict_paths(last, pattern, false),
            Predictor::Dirs(pattern) => predict_paths(last, pattern, true),
        }
    }

    /// Hint handed to clap when generating completion scripts
    pub fn value_hint(&self) -> ValueHint {
        match self {
            Predictor::Files(_) => ValueHint::FilePath,
            Predictor::Dirs(_) => ValueHint::DirPath,
            Predictor::Anything | Predictor::Nothing | Predictor::Set(_) => ValueHint::Other,
        }
    }
}

/// Directories are always offered so the user can descend into them
fn predict_paths(last: &str, pattern: &str, dirs_only: bool) -> Vec<String> {
    let dir = match last.rfind('/') {
        Some(idx) => &last[..=idx],
        None => "",
    };
    let escaped = glob::Pattern::escape(dir);

    let mut out = Vec::new();
    let mut push_matches = |pat: String, want_dirs: bool| {
        if let Ok(paths) = glob::glob(&pat) {
            for path in paths.flatten() {
                let is_dir = path.is_dir();
                if want_dirs != is_dir {
                    continue;
                }
                let mut shown = path.display().to_string();
                if is_dir && !shown.ends_with('/') {
                    shown.push('/');
                }
                if shown.starts_with(last) && !out.contains(&shown) {
                    out.push(shown);
                }
            }
        }
    };

    push_matches(format!("{}*", escaped), true);
    if !dirs_only {
        push_matches(format!("{}{}", escaped, pattern), false);
    } else if pattern != "*" {
        push_matches(format!("{}{}", escaped, pattern), true);
    }

    out.sort();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_set_filters_by_prefix() {
        let p = Predictor::set(["table", "json", "yaml"]);
        assert_eq!(p.predict("j"), vec!["json"]);
        assert_eq!(p.predict("").len(), 3);
    }

    #[test]
    fn test_anything_suggests_nothing() {
        assert!(Predictor::Anything.predict("x").is_empty());
        assert!(Predictor::Nothing.predict("").is_empty());
    }

    #[test]
    fn test_files_and_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().display().to_string();
        fs::write(temp_dir.path().join("ca.pem"), "pem").unwrap();
        fs::create_dir(temp_dir.path().join("certs")).unwrap();

        let prefix = format!("{}/", base);
        let files = Predictor::files("*").predict(&prefix);
        assert!(files.contains(&format!("{}/ca.pem", base)));
        assert!(files.contains(&format!("{}/certs/", base)));

        let dirs = Predictor::dirs("*").predict(&prefix);
        assert_eq!(dirs, vec![format!("{}/certs/", base)]);
    }

    #[test]
    fn test_value_hints() {
        assert_eq!(Predictor::files("*").value_hint(), ValueHint::FilePath);
        assert_eq!(Predictor::dirs("*").value_hint(), ValueHint::DirPath);
        assert_eq!(Predictor::Anything.value_hint(), ValueHint::Other);
    }
}
