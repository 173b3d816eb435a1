#![deny(missing_docs)]

//! # OAS Guide Core
//!
//! Normalizes OpenAPI 3.x documents into a resolved, ordered endpoint model
//! and derives execution guides, pagination hints and workflow exports from it.

/// Shared error types.
pub mod error;

/// Options for a normalization run.
pub mod config;

/// JSON / YAML document parsing.
pub mod loader;

/// OpenAPI (OAS) normalization: models, resolver, security, routes.
pub mod oas;

/// Example requests, code samples and step-by-step guides.
pub mod guide;

/// Corpus statistics and tag grouping.
pub mod summary;

/// Pagination pattern detection.
pub mod analysis;

/// Workflow exporters.
pub mod export;

pub use analysis::{detect_pagination, PaginationReport, PaginationStyle};
pub use config::{MergePolicy, NormalizeOptions, ResolutionMode};
pub use error::{AppError, AppResult, RefTrail};
pub use export::{build_workflow, WorkflowConfig, WorkflowExportNode};
pub use guide::{build_guide, EndpointExecutionGuide};
pub use loader::{parse_document, DocumentFormat};
pub use oas::models::{
    ApiSpecModel, Diagnostic, DiagnosticKind, Endpoint, EndpointId, EndpointQuery, HttpMethod,
    SchemaKind, SchemaNode, SecurityRequirement, SecurityType,
};
pub use oas::{
    normalize, normalize_document, DocumentPointerResolver, PointerResolver, RawDocument,
};
pub use summary::summarize;
