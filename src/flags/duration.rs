//! Duration and boolean value syntax shared by flags and the environment
//!
//! Durations are written as a sequence of decimal numbers with unit suffixes,
//! for example `30s`, `5m`, `1h30m` or `1.5h`.

use std::time::Duration;
use thiserror::Error;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Rejected duration or boolean text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind} {text:?}")]
pub struct ValueError {
    kind: &'static str,
    text: String,
}

fn invalid_duration(text: &str) -> ValueError {
    ValueError {
        kind: "duration",
        text: text.to_string(),
    }
}

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" | "μs" => Some(1_000),
        "ms" => Some(1_000_000),
        "s" => Some(NANOS_PER_SEC),
        "m" => Some(60 * NANOS_PER_SEC),
        "h" => Some(3600 * NANOS_PER_SEC),
        _ => None,
    }
}

/// Parse a duration such as `5m` or `1h30m`
///
/// A bare `0` is accepted as zero; any other number needs a unit.
pub fn parse_duration(text: &str) -> Result<Duration, ValueError> {
    let s = text.strip_prefix('+').unwrap_or(text);
    if s == "0" {
        return Ok(Duration::ZERO);
    }
    if s.is_empty() {
        return Err(invalid_duration(text));
    }

    let mut total: u128 = 0;
    let mut rest = s;
    while !rest.is_empty() {
        let int_len = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        let int_part = &rest[..int_len];
        rest = &rest[int_len..];

        let mut frac_part = "";
        if let Some(after_dot) = rest.strip_prefix('.') {
            let frac_len = after_dot
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(after_dot.len());
            frac_part = &after_dot[..frac_len];
            rest = &after_dot[frac_len..];
        }
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid_duration(text));
        }

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let unit = unit_nanos(&rest[..unit_len]).ok_or_else(|| invalid_duration(text))?;
        rest = &rest[unit_len..];

        let whole: u128 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| invalid_duration(text))?
        };
        let mut nanos = whole
            .checked_mul(unit)
            .ok_or_else(|| invalid_duration(text))?;

        // Digits beyond nanosecond precision cannot change the result.
        let frac_digits = &frac_part[..frac_part.len().min(18)];
        if !frac_digits.is_empty() {
            let frac: u128 = frac_digits.parse().map_err(|_| invalid_duration(text))?;
            let scale = 10u128.pow(frac_digits.len() as u32);
            nanos += frac * unit / scale;
        }

        total = total
            .checked_add(nanos)
            .ok_or_else(|| invalid_duration(text))?;
    }

    let secs = u64::try_from(total / NANOS_PER_SEC).map_err(|_| invalid_duration(text))?;
    Ok(Duration::new(secs, (total % NANOS_PER_SEC) as u32))
}

/// Render a duration in the shortest unit form the server accepts
///
/// Whole seconds render as hours, minutes and seconds (`5m`, `1h30m`);
/// anything with a sub-second part renders in a single smaller unit.
pub fn format_duration(d: Duration) -> String {
    if d.is_zero() {
        return "0s".to_string();
    }

    let subsec = d.subsec_nanos();
    if subsec != 0 {
        let nanos = d.as_nanos();
        return if nanos % 1_000_000 == 0 {
            format!("{}ms", nanos / 1_000_000)
        } else if nanos % 1_000 == 0 {
            format!("{}us", nanos / 1_000)
        } else {
            format!("{}ns", nanos)
        };
    }

    let secs = d.as_secs();
    let mut out = String::new();
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        out.push_str(&format!("{}h", h));
    }
    if m > 0 {
        out.push_str(&format!("{}m", m));
    }
    if s > 0 {
        out.push_str(&format!("{}s", s));
    }
    out
}

/// Parse a boolean the way command-line flags spell them
pub fn parse_bool(text: &str) -> Result<bool, ValueError> {
    match text {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err(ValueError {
            kind: "boolean",
            text: text.to_string(),
        }),
    }
}
