#![deny(missing_docs)]

//! # Diagnostics
//!
//! Non-fatal findings recorded during a run: coercions applied to the input,
//! `allOf` merge notes and best-effort downgrades.

use serde::Serialize;
use std::fmt;

/// Category of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagnosticKind {
    /// The input violated an invariant and was corrected (e.g. optional path parameter).
    Coercion,
    /// An `allOf` conflict was settled by the merge policy.
    MergeNote,
    /// A failure was replaced by a placeholder because best-effort mode is on.
    Downgrade,
    /// A security requirement could not be classified.
    UnknownSecurityScheme,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DiagnosticKind::Coercion => "coercion",
            DiagnosticKind::MergeNote => "merge",
            DiagnosticKind::Downgrade => "downgrade",
            DiagnosticKind::UnknownSecurityScheme => "unknown-security-scheme",
        };
        f.write_str(s)
    }
}

/// A non-fatal finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// Category.
    pub kind: DiagnosticKind,
    /// Pointer or endpoint context the finding applies to.
    pub location: String,
    /// What happened.
    pub message: String,
}

impl Diagnostic {
    /// Creates a diagnostic.
    pub fn new(kind: DiagnosticKind, location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            location: location.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.location, self.message)
    }
}
