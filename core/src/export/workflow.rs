#![deny(missing_docs)]

//! # Workflow Export
//!
//! Automation-platform workflow configs (n8n format): a manual trigger
//! chained to one HTTP-request node per endpoint.
//!
//! Values the workflow supplies at run time are expressions over the incoming
//! item (`{{ $json["name"] }}`). Node ids are UUIDv5 digests of the endpoint
//! identifier, so exporting the same model twice yields the same document.

use crate::error::{AppError, AppResult};
use crate::oas::models::{
    ApiKeyLocation, ApiSpecModel, Endpoint, ParamLocation, SecurityRequirement,
};
use crate::oas::routes::naming::{derive_operation_name, fill_template, to_snake_case};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{json, Map, Value};
use uuid::Uuid;

/// Node type of HTTP-request nodes.
pub const HTTP_REQUEST_NODE: &str = "n8n-nodes-base.httpRequest";
/// Node type of the manual trigger.
pub const MANUAL_TRIGGER_NODE: &str = "n8n-nodes-base.manualTrigger";

const HTTP_REQUEST_VERSION: f64 = 4.2;
const TRIGGER_POSITION: [i32; 2] = [250, 150];
const FIRST_NODE_Y: i32 = 300;
const NODE_SPACING: i32 = 150;

/// A reference to a credential the user creates in the target platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRef {
    /// Suggested credential name (the security scheme name).
    pub name: String,
}

/// One workflow node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowExportNode {
    /// Stable node id.
    pub id: String,
    /// Display name, unique within a workflow.
    pub name: String,
    /// Node type.
    #[serde(rename = "type")]
    pub node_type: String,
    /// Node type version.
    pub type_version: f64,
    /// Canvas position.
    pub position: [i32; 2],
    /// Node parameters.
    pub parameters: Map<String, Value>,
    /// Credentials by credential type.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub credentials: IndexMap<String, CredentialRef>,
}

/// A connection target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionTarget {
    /// Target node name.
    pub node: String,
    /// Connection type.
    #[serde(rename = "type")]
    pub kind: String,
    /// Input index on the target.
    pub index: usize,
}

/// Outgoing connections of one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeConnections {
    /// Main outputs, each a list of targets.
    pub main: Vec<Vec<ConnectionTarget>>,
}

/// Workflow-level settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSettings {
    /// Execution order version.
    pub execution_order: String,
}

/// A complete workflow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowConfig {
    /// Workflow name.
    pub name: String,
    /// Trigger first, then one node per endpoint.
    pub nodes: Vec<WorkflowExportNode>,
    /// Connections keyed by source node name.
    pub connections: IndexMap<String, NodeConnections>,
    /// Settings.
    pub settings: WorkflowSettings,
}

/// Builds the HTTP-request node for one endpoint.
pub fn http_request_node(
    endpoint: &Endpoint,
    base_url: &str,
    position: [i32; 2],
) -> WorkflowExportNode {
    let mut parameters = Map::new();
    parameters.insert("method".into(), json!(endpoint.method));

    let has_path_params = endpoint.parameters_in(ParamLocation::Path).next().is_some();
    let path = fill_template(&endpoint.path, expression);
    let url = format!("{}{}", base_url.trim_end_matches('/'), path);
    // A value containing expressions is itself an expression.
    let url = if has_path_params { format!("={}", url) } else { url };
    parameters.insert("url".into(), Value::String(url));

    let mut credentials = IndexMap::new();
    if let Some(alternative) = endpoint.primary_security() {
        if let Some((auth_type, scheme_name)) = alternative
            .requirements
            .iter()
            .find_map(credential_type)
        {
            parameters.insert("authentication".into(), json!("genericCredentialType"));
            parameters.insert("genericAuthType".into(), json!(auth_type));
            credentials.insert(
                auth_type.to_string(),
                CredentialRef {
                    name: scheme_name.to_string(),
                },
            );
        }
    }

    insert_parameter_list(&mut parameters, "Query", endpoint, ParamLocation::Query);
    insert_parameter_list(&mut parameters, "Header", endpoint, ParamLocation::Header);

    match &endpoint.request_body {
        Some(body) => {
            let fields: Vec<Value> = body
                .schema
                .properties
                .iter()
                .filter(|(_, prop)| !prop.read_only)
                .map(|(name, _)| json!({"name": name, "value": bound_value(name)}))
                .collect();
            parameters.insert("sendBody".into(), json!(true));
            parameters.insert("contentType".into(), json!(body_content_type(body.content_types.first())));
            parameters.insert("bodyParameters".into(), json!({"parameters": fields}));
        }
        None => {
            parameters.insert("sendBody".into(), json!(false));
        }
    }
    parameters.insert("options".into(), json!({}));

    WorkflowExportNode {
        id: node_id(endpoint.id.as_str()),
        name: node_name(endpoint),
        node_type: HTTP_REQUEST_NODE.to_string(),
        type_version: HTTP_REQUEST_VERSION,
        position,
        parameters,
        credentials,
    }
}

/// Builds a workflow calling `ids` in order (every endpoint when empty).
pub fn build_workflow(model: &ApiSpecModel, name: &str, ids: &[&str]) -> AppResult<WorkflowConfig> {
    let endpoints: Vec<&Endpoint> = if ids.is_empty() {
        model.endpoints.iter().collect()
    } else {
        ids.iter()
            .map(|id| {
                model
                    .endpoint(id)
                    .ok_or_else(|| AppError::EndpointNotFound(id.to_string()))
            })
            .collect::<AppResult<_>>()?
    };

    let trigger = WorkflowExportNode {
        id: node_id(&format!("trigger:{}", name)),
        name: "Manual Trigger".to_string(),
        node_type: MANUAL_TRIGGER_NODE.to_string(),
        type_version: 1.0,
        position: TRIGGER_POSITION,
        parameters: Map::new(),
        credentials: IndexMap::new(),
    };

    let mut nodes = vec![trigger];
    let mut connections = IndexMap::new();
    for (i, endpoint) in endpoints.into_iter().enumerate() {
        let y = FIRST_NODE_Y + NODE_SPACING * i as i32;
        let mut node = http_request_node(endpoint, &model.base_url_for(endpoint), [250, y]);
        node.name = unique_name(&nodes, node.name);

        let previous = nodes.last().map(|n| n.name.clone()).unwrap_or_default();
        connections.insert(
            previous,
            NodeConnections {
                main: vec![vec![ConnectionTarget {
                    node: node.name.clone(),
                    kind: "main".to_string(),
                    index: 0,
                }]],
            },
        );
        nodes.push(node);
    }

    tracing::debug!(workflow = name, nodes = nodes.len(), "Workflow exported");
    Ok(WorkflowConfig {
        name: name.to_string(),
        nodes,
        connections,
        settings: WorkflowSettings {
            execution_order: "v1".to_string(),
        },
    })
}

fn node_id(seed: &str) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, format!("oas-guide:{}", seed).as_bytes()).to_string()
}

/// Summary, else snake_cased operationId, else a name derived from method and path.
fn node_name(endpoint: &Endpoint) -> String {
    if let Some(summary) = endpoint.summary.as_deref().filter(|s| !s.trim().is_empty()) {
        return summary.trim().to_string();
    }
    match &endpoint.operation_id {
        Some(operation_id) => to_snake_case(operation_id),
        None => derive_operation_name(endpoint.method, &endpoint.path),
    }
}

fn unique_name(nodes: &[WorkflowExportNode], name: String) -> String {
    let taken = |candidate: &str| nodes.iter().any(|n| n.name == candidate);
    if !taken(&name) {
        return name;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{} ({})", name, n);
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

fn expression(name: &str) -> String {
    format!("{{{{ $json[\"{}\"] }}}}", name)
}

fn bound_value(name: &str) -> String {
    format!("={}", expression(name))
}

fn insert_parameter_list(
    parameters: &mut Map<String, Value>,
    suffix: &str,
    endpoint: &Endpoint,
    location: ParamLocation,
) {
    let entries: Vec<Value> = endpoint
        .parameters_in(location)
        .map(|p| json!({"name": p.name, "value": bound_value(&p.name)}))
        .collect();
    if entries.is_empty() {
        return;
    }
    let key = suffix.to_lowercase();
    parameters.insert(format!("send{}", suffix), json!(true));
    parameters.insert(format!("{}Parameters", key), json!({"parameters": entries}));
}

/// Credential type for the first requirement the platform can express.
fn credential_type(requirement: &SecurityRequirement) -> Option<(&'static str, &str)> {
    match requirement {
        SecurityRequirement::ApiKey {
            scheme_name,
            location,
            ..
        } => match location {
            ApiKeyLocation::Query => Some(("httpQueryAuth", scheme_name)),
            ApiKeyLocation::Header | ApiKeyLocation::Cookie => {
                Some(("httpHeaderAuth", scheme_name))
            }
        },
        SecurityRequirement::Http {
            scheme_name,
            scheme,
            ..
        } => match scheme.as_str() {
            "basic" => Some(("httpBasicAuth", scheme_name)),
            "digest" => Some(("httpDigestAuth", scheme_name)),
            _ => Some(("httpHeaderAuth", scheme_name)),
        },
        SecurityRequirement::OAuth2 { scheme_name, .. }
        | SecurityRequirement::OpenIdConnect { scheme_name, .. } => {
            Some(("oAuth2Api", scheme_name))
        }
        SecurityRequirement::None { .. } => None,
    }
}

fn body_content_type(content_type: Option<&String>) -> &'static str {
    match content_type.map(String::as_str) {
        Some("multipart/form-data") => "multipart-form-data",
        Some("application/x-www-form-urlencoded") => "form-urlencoded",
        Some(ct) if !ct.contains("json") => "raw",
        _ => "json",
    }
}
