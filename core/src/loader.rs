#![deny(missing_docs)]

//! # Document Loading
//!
//! Reference loader: turns JSON or YAML text into a [`RawDocument`].
//! Reading files or URLs is left to callers.

use crate::error::{AppError, AppResult};
use crate::oas::pointer::RawDocument;

/// Source syntax of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// JSON text.
    Json,
    /// YAML text (a superset of JSON).
    Yaml,
}

/// Guesses the syntax from the first non-blank character.
pub fn detect_format(content: &str) -> DocumentFormat {
    match content.trim_start().chars().next() {
        Some('{') | Some('[') => DocumentFormat::Json,
        _ => DocumentFormat::Yaml,
    }
}

/// Parses a document, detecting its syntax.
pub fn parse_document(content: &str) -> AppResult<RawDocument> {
    parse_document_as(content, detect_format(content))
}

/// Parses a document with a known syntax.
pub fn parse_document_as(content: &str, format: DocumentFormat) -> AppResult<RawDocument> {
    match format {
        DocumentFormat::Json => serde_json::from_str(content)
            .map_err(|e| AppError::General(format!("Failed to parse JSON: {}", e))),
        DocumentFormat::Yaml => serde_yaml::from_str(content)
            .map_err(|e| AppError::General(format!("Failed to parse YAML: {}", e))),
    }
}
