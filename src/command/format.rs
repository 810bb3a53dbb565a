//! Output formatting for command results

use crate::error::FormatError;
use crate::ui::Ui;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Column separator in table output
const TABLE_GLUE: &str = "    ";

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Table,
    Json,
    Yaml,
}

impl FromStr for Format {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "table" => Ok(Format::Table),
            "json" => Ok(Format::Json),
            "yaml" | "yml" => Ok(Format::Yaml),
            _ => Err(FormatError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Table => "table",
            Format::Json => "json",
            Format::Yaml => "yaml",
        };
        f.write_str(name)
    }
}

/// Render `data` in `format`
pub fn format_data(format: Format, data: &Value) -> Result<String, FormatError> {
    match format {
        Format::Json => Ok(serde_json::to_string_pretty(data)?),
        Format::Yaml => Ok(serde_yaml::to_string(data)?.trim_end().to_string()),
        Format::Table => Ok(format_table(data)),
    }
}

/// Write `data` to the UI in the format named by `format`
pub fn output_data(ui: &dyn Ui, format: &str, data: &Value) -> Result<(), FormatError> {
    let format: Format = format.parse()?;
    ui.output(&format_data(format, data)?);
    Ok(())
}

/// Write exactly one field's value, without a trailing newline
pub fn print_raw_field(ui: &dyn Ui, data: &Value, field: &str) -> Result<(), FormatError> {
    let value = data
        .get(field)
        .ok_or_else(|| FormatError::MissingField(field.to_string()))?;
    ui.output_raw(&scalar_text(value));
    Ok(())
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "n/a".to_string(),
        other => other.to_string(),
    }
}

fn format_table(data: &Value) -> String {
    let rows: Vec<(String, String)> = match data {
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| (k.clone(), scalar_text(v)))
            .collect(),
        Value::Array(items) => return items.iter().map(scalar_text).collect::<Vec<_>>().join("\n"),
        other => return scalar_text(other),
    };

    let width = rows
        .iter()
        .map(|(k, _)| k.chars().count())
        .max()
        .unwrap_or(0)
        .max("Key".len());

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format!("{:<width$}{}{}", "Key", TABLE_GLUE, "Value", width = width));
    lines.push(format!("{:<width$}{}{}", "---", TABLE_GLUE, "-----", width = width));
    for (key, value) in rows {
        lines.push(format!("{:<width$}{}{}", key, TABLE_GLUE, value, width = width));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::CaptureUi;
    use serde_json::json;

    #[test]
    fn test_parse_format() {
        assert_eq!("table".parse::<Format>().unwrap(), Format::Table);
        assert_eq!("JSON".parse::<Format>().unwrap(), Format::Json);
        assert_eq!("yaml".parse::<Format>().unwrap(), Format::Yaml);
        assert!(matches!(
            "xml".parse::<Format>(),
            Err(FormatError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_table_layout() {
        let data = json!({"address": "https://127.0.0.1:8200", "tls": false});
        let out = format_data(Format::Table, &data).unwrap();
        assert_eq!(
            out,
            "Key        Value\n---        -----\naddress    https://127.0.0.1:8200\ntls        false"
        );
    }

    #[test]
    fn test_json_and_yaml() {
        let data = json!({"a": "b"});
        let json_out = format_data(Format::Json, &data).unwrap();
        assert_eq!(serde_json::from_str::<Value>(&json_out).unwrap(), data);

        let yaml_out = format_data(Format::Yaml, &data).unwrap();
        assert_eq!(yaml_out, "a: b");
    }

    #[test]
    fn test_raw_field_has_no_newline() {
        let ui = CaptureUi::new();
        print_raw_field(&ui, &json!({"token": "abc"}), "token").unwrap();
        assert_eq!(ui.output_text(), "abc");
    }

    #[test]
    fn test_raw_field_missing() {
        let ui = CaptureUi::new();
        let err = print_raw_field(&ui, &json!({}), "nope").unwrap_err();
        assert!(matches!(err, FormatError::MissingField(_)));
    }

    #[test]
    fn test_output_data_rejects_unknown_format() {
        let ui = CaptureUi::new();
        assert!(output_data(&ui, "csv", &json!({})).is_err());
        assert!(ui.output_text().is_empty());
    }
}
