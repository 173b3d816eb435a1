//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the normalization engine.
//!
//! Each failure condition a caller may want to treat differently (strict vs.
//! best-effort handling) has its own variant instead of a generic message.

use derive_more::{Display, From};
use std::fmt;

/// The chain of pointers that was being traversed when a failure occurred.
///
/// Rendered as `a -> b -> c`, or `<root>` when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefTrail(pub Vec<String>);

impl RefTrail {
    /// Returns the pointers in traversal order.
    pub fn pointers(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for RefTrail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "<root>")
        } else {
            write!(f, "{}", self.0.join(" -> "))
        }
    }
}

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// A `$ref` target could not be found.
    #[from(ignore)]
    #[display("Reference Resolution Error: '{pointer}' not found (via {trail})")]
    ReferenceResolution {
        /// The pointer that failed to resolve.
        pointer: String,
        /// The traversal path that led to the pointer.
        trail: RefTrail,
    },

    /// An `allOf` member conflict that the configured merge policy refuses to settle.
    #[from(ignore)]
    #[display("Schema Conflict Error at {location}: {detail}")]
    SchemaConflict {
        /// Where the conflicting composition lives (pointer or endpoint context).
        location: String,
        /// Which field conflicted and how.
        detail: String,
    },

    /// Two raw operations normalize to the same endpoint identifier.
    #[from(ignore)]
    #[display("Duplicate Endpoint Error: '{id}' is declared more than once")]
    DuplicateEndpoint {
        /// The colliding identifier, e.g. `GET /users/{id}`.
        id: String,
    },

    /// A security requirement names a scheme that is not declared, or declares
    /// a type outside the supported set.
    #[from(ignore)]
    #[display("Unknown Security Scheme '{scheme}': {note}")]
    UnknownSecurityScheme {
        /// The scheme name as written in the requirement.
        scheme: String,
        /// Why the scheme could not be classified.
        note: String,
    },

    /// Traversal went deeper than the configured recursion cap.
    #[from(ignore)]
    #[display("Depth Limit Error: recursion cap exceeded (via {trail})")]
    DepthLimit {
        /// The traversal path at the point the cap was hit.
        trail: RefTrail,
    },

    /// No endpoint with the requested identifier exists in the model.
    #[from(ignore)]
    #[display("Endpoint Not Found: {_0}")]
    EndpointNotFound(String),

    /// The raw document is structurally unusable (not an object, missing `info`, wrong version).
    #[from(ignore)]
    #[display("Invalid Document: {_0}")]
    InvalidDocument(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

impl AppError {
    /// Returns true for conditions that best-effort mode may downgrade to a diagnostic.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::ReferenceResolution { .. }
                | AppError::SchemaConflict { .. }
                | AppError::DepthLimit { .. }
                | AppError::UnknownSecurityScheme { .. }
        )
    }
}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
