//! Output formatting for query results.

use clap::ValueEnum;
use serde::Serialize;

use crate::config::TEXT_WRAP_WIDTH;
use crate::error::Result;

/// How the CLI prints results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
    /// YAML document.
    Yaml,
}

/// Serialize a value as pretty-printed JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Serialize a value as a YAML document starting with `---`.
pub fn to_yaml<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let yaml = serde_yaml_ng::to_string(value)?;
    Ok(format!("---\n{yaml}"))
}

/// Serialize a value for a structured format, or `None` for text output.
pub fn to_structured<T: Serialize + ?Sized>(
    value: &T,
    format: OutputFormat,
) -> Result<Option<String>> {
    match format {
        OutputFormat::Text => Ok(None),
        OutputFormat::Json => to_json(value).map(Some),
        OutputFormat::Yaml => to_yaml(value).map(Some),
    }
}

/// Format key/value pairs as `key | value` lines.
#[must_use]
pub fn pair_lines(pairs: &[(String, String)]) -> Vec<String> {
    pairs
        .iter()
        .map(|(key, value)| format!("{key} | {value}"))
        .collect()
}

/// Wrap summary text for the terminal, keeping its own line breaks.
#[must_use]
pub fn wrap_summary(text: &str) -> String {
    text.lines()
        .map(|line| textwrap::fill(line, TEXT_WRAP_WIDTH))
        .collect::<Vec<_>>()
        .join("\n")
}
