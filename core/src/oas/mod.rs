#![deny(missing_docs)]

//! # OpenAPI Normalization Module
//!
//! - **models**: the canonical representation.
//! - **pointer**: `$ref` lookup seam and the single-document implementation.
//! - **resolver**: schema, parameter, body and response resolution.
//! - **security**: security scheme classification.
//! - **routes**: walking `paths` into endpoints.
//! - **document**: the end-to-end run.

pub mod document;
pub mod models;
pub mod pointer;
pub(crate) mod ref_utils;
pub mod resolver;
pub mod routes;
pub mod security;

pub use document::{normalize, normalize_document};
pub use pointer::{DocumentPointerResolver, PointerResolver, RawDocument};
pub use resolver::SchemaResolver;
pub use security::SecurityClassifier;
