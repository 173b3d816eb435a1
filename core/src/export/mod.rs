#![deny(missing_docs)]

//! # Exporters
//!
//! Output formats for downstream tools. Exporters only read the model.

pub mod workflow;

pub use workflow::{build_workflow, http_request_node, WorkflowConfig, WorkflowExportNode};
