//! # Output
//!
//! Everything goes to stdout; logs go to stderr.

use crate::error::CliResult;
use serde::Serialize;
use std::io::Write;

/// Output syntax for structured results.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
    /// YAML.
    Yaml,
}

/// Writes `value` as JSON or YAML. `Text` callers render themselves.
pub fn write_structured<T: Serialize>(
    out: &mut impl Write,
    value: &T,
    format: Format,
) -> CliResult<()> {
    match format {
        Format::Yaml => {
            let text = serde_yaml::to_string(value)?;
            out.write_all(text.as_bytes())?;
        }
        Format::Json | Format::Text => {
            serde_json::to_writer_pretty(&mut *out, value)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
