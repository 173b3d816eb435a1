#![deny(missing_docs)]

//! # OpenAPI Models
//!
//! Canonical representation produced by the normalization engine.
//!
//! - **schema**: resolved schema nodes.
//! - **security**: security requirement variants.
//! - **endpoint**: endpoints, parameters, bodies, responses, servers.
//! - **spec**: the root `ApiSpecModel` aggregate.
//! - **diagnostics**: non-fatal findings.

pub mod diagnostics;
pub mod endpoint;
pub mod schema;
pub mod security;
pub mod spec;

pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use endpoint::{
    Endpoint, EndpointId, HttpMethod, ParamLocation, Parameter, RequestBody, Response, Server,
    ServerVariable,
};
pub use schema::{Constraints, SchemaKind, SchemaNode};
pub use security::{
    ApiKeyLocation, OAuthFlow, OAuthFlowKind, SecurityAlternative, SecurityRequirement,
    SecurityType, NO_AUTH_INSTRUCTION,
};
pub use spec::{ApiSpecModel, AuthVariation, Contact, EndpointQuery, Summary, TagGroup};
