#![deny(missing_docs)]

//! # API Specification Model
//!
//! The root aggregate handed to report writers and exporters. Built once per
//! run and never mutated afterwards.

use crate::config::NormalizeOptions;
use crate::error::AppResult;
use crate::guide::{build_guide, EndpointExecutionGuide};
use crate::oas::models::diagnostics::Diagnostic;
use crate::oas::models::endpoint::{Endpoint, EndpointId, HttpMethod, Server};
use crate::oas::models::schema::SchemaNode;
use crate::oas::models::security::{SecurityAlternative, SecurityType};
use crate::oas::routes::naming::endpoint_id;
use indexmap::IndexMap;
use serde::Serialize;

/// Contact information from `info.contact`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// Name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A tag and the endpoints carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagGroup {
    /// Tag name.
    pub name: String,
    /// Tag description, when declared at document level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Member endpoint identifiers in endpoint order.
    pub endpoints: Vec<EndpointId>,
}

/// How many endpoints share one security configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthVariation {
    /// The shared configuration.
    pub security: Vec<SecurityAlternative>,
    /// Number of endpoints using it.
    pub endpoint_count: usize,
}

/// Corpus-level statistics.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Number of endpoints.
    pub total_endpoints: usize,
    /// Endpoint count per method.
    pub endpoints_by_method: IndexMap<HttpMethod, usize>,
    /// Security kinds used by at least one endpoint.
    pub authentication_types: Vec<SecurityType>,
    /// Content types used by any request or response, in first-use order.
    pub common_content_types: Vec<String>,
    /// Distinct security configurations with their endpoint counts.
    pub auth_variations: Vec<AuthVariation>,
}

/// The normalized API.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSpecModel {
    /// `info.title`.
    pub title: String,
    /// `info.version`.
    pub version: String,
    /// `info.description`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `info.termsOfService`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terms_of_service: Option<String>,
    /// `info.contact`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    /// Servers (a default entry when none are declared).
    pub servers: Vec<Server>,
    /// Document-level security.
    pub default_security: Vec<SecurityAlternative>,
    /// Endpoints in declaration order.
    pub endpoints: Vec<Endpoint>,
    /// Resolved `components.schemas`.
    pub schemas: IndexMap<String, SchemaNode>,
    /// Tag index.
    pub tags: Vec<TagGroup>,
    /// Statistics.
    pub summary: Summary,
    /// Non-fatal findings of the run.
    pub diagnostics: Vec<Diagnostic>,
    /// Options the model was built with; guides reuse them.
    #[serde(skip)]
    pub(crate) options: NormalizeOptions,
}

/// Filter for [`ApiSpecModel::search`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointQuery {
    /// Case-insensitive text matched against path, summary, description, tags and operationId.
    pub text: Option<String>,
    /// Restrict to one method.
    pub method: Option<HttpMethod>,
    /// Restrict to one tag.
    pub tag: Option<String>,
}

impl ApiSpecModel {
    /// Looks up an endpoint by identifier.
    ///
    /// The method is case-insensitive and the path is normalized first, so
    /// `get /users/{id}/` finds `GET /users/{id}`.
    pub fn endpoint(&self, id: &str) -> Option<&Endpoint> {
        if let Some(found) = self.endpoints.iter().find(|e| e.id.as_str() == id) {
            return Some(found);
        }
        let (method, path) = id.trim().split_once(char::is_whitespace)?;
        let wanted = endpoint_id(HttpMethod::from_key(method)?, path);
        self.endpoints.iter().find(|e| e.id == wanted)
    }

    /// The options this model was normalized with.
    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    /// The base URL guides use: first server with variables substituted.
    pub fn base_url(&self) -> String {
        self.servers
            .first()
            .map(Server::resolved_url)
            .unwrap_or_else(|| self.options.default_server_url.clone())
    }

    /// The base URL for one endpoint: its own server override, else [`Self::base_url`].
    pub fn base_url_for(&self, endpoint: &Endpoint) -> String {
        endpoint
            .servers
            .first()
            .map(Server::resolved_url)
            .unwrap_or_else(|| self.base_url())
    }

    /// Builds the execution guide for one endpoint.
    pub fn build_guide(&self, id: &str) -> AppResult<EndpointExecutionGuide> {
        build_guide(self, id)
    }

    /// Endpoints matching every set field of the query.
    pub fn search(&self, query: &EndpointQuery) -> Vec<&Endpoint> {
        let needle = query.text.as_ref().map(|t| t.to_lowercase());
        self.endpoints
            .iter()
            .filter(|e| query.method.is_none_or(|m| e.method == m))
            .filter(|e| {
                query
                    .tag
                    .as_ref()
                    .is_none_or(|tag| e.tags.iter().any(|t| t == tag))
            })
            .filter(|e| needle.as_ref().is_none_or(|n| endpoint_matches(e, n)))
            .collect()
    }
}

fn endpoint_matches(endpoint: &Endpoint, needle: &str) -> bool {
    let fields = [
        Some(endpoint.path.as_str()),
        endpoint.summary.as_deref(),
        endpoint.description.as_deref(),
        endpoint.operation_id.as_deref(),
    ];
    fields
        .iter()
        .flatten()
        .any(|f| f.to_lowercase().contains(needle))
        || endpoint
            .tags
            .iter()
            .any(|t| t.to_lowercase().contains(needle))
}
