//! Help text layout for grouped flags

use crate::flags::binding::Flag;
use crate::flags::wrap::wrap_at_length;
use regex::Regex;
use std::fmt::Write;
use std::sync::LazyLock;

/// Indentation of usage text under a flag name
pub const USAGE_INDENT: usize = 6;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Collapse every run of whitespace to a single space
pub fn normalize_usage(usage: &str) -> String {
    WHITESPACE.replace_all(usage, " ").into_owned()
}

/// Section heading followed by a blank line
pub fn write_flag_title(out: &mut String, title: &str) {
    let _ = write!(out, "{}\n\n", title);
}

/// One flag: its name line, then wrapped usage and a blank line
pub fn write_flag_detail(out: &mut String, flag: &Flag) {
    match flag.example() {
        Some(example) if !example.is_empty() => {
            let _ = writeln!(out, "  -{}=<{}>", flag.name(), example);
        }
        _ => {
            let _ = writeln!(out, "  -{}", flag.name());
        }
    }

    let usage = normalize_usage(flag.usage());
    let _ = write!(out, "{}\n\n", wrap_at_length(&usage, USAGE_INDENT));
}
