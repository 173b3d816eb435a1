#![deny(missing_docs)]

//! # Endpoint Builder
//!
//! Builds one canonical [`Endpoint`] from a raw operation and its path item.

use crate::error::AppResult;
use crate::oas::models::{
    DiagnosticKind, Endpoint, EndpointId, HttpMethod, ParamLocation, Parameter, SchemaKind,
    SchemaNode, SecurityAlternative, Server, ServerVariable,
};
use crate::oas::resolver::{
    merge_parameters, resolve_parameter_list, resolve_request_body, resolve_responses,
    SchemaResolver,
};
use crate::oas::routes::naming::template_variables;
use crate::oas::security::SecurityClassifier;
use indexmap::IndexMap;
use serde_json::Value;

/// Shared inputs for building the endpoints of one document.
pub struct EndpointContext<'r, 'a> {
    /// Schema resolution state for the run.
    pub resolver: &'r mut SchemaResolver<'a>,
    /// Security classification for the run.
    pub classifier: &'r mut SecurityClassifier,
    /// Document-level security, inherited by operations without their own.
    pub default_security: &'r [SecurityAlternative],
}

/// The raw inputs of one operation. The path is normalized and owned by the
/// caller, so it only lives for the call (`'p`).
pub struct RawOperation<'a, 'p> {
    /// HTTP method.
    pub method: HttpMethod,
    /// Normalized path template.
    pub path: &'p str,
    /// The operation object.
    pub operation: &'a Value,
    /// The (dereferenced) path item holding the operation.
    pub path_item: &'a Value,
}

/// Builds the endpoint for `raw`. `path_params` are the already resolved
/// path-level parameters of the enclosing path item.
pub fn build_endpoint<'a>(
    ctx: &mut EndpointContext<'_, 'a>,
    raw: RawOperation<'a, '_>,
    path_params: &[Parameter],
) -> AppResult<Endpoint> {
    let id = EndpointId::new(raw.method, raw.path);
    let location = id.to_string();
    let operation = raw.operation;

    let operation_params =
        resolve_parameter_list(ctx.resolver, operation.get("parameters"), &location)?;
    let mut parameters = merge_parameters(path_params.to_vec(), operation_params);
    add_implicit_path_parameters(ctx.resolver, &mut parameters, raw.path, &location);

    let request_body = match operation.get("requestBody") {
        Some(raw_body) => resolve_request_body(
            ctx.resolver,
            raw_body,
            &format!("{} requestBody", location),
        )?,
        None => None,
    };
    let responses = resolve_responses(ctx.resolver, operation.get("responses"), &location)?;
    let security = ctx
        .classifier
        .effective_security(operation.get("security"), ctx.default_security);

    let text = |value: &Value, key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);
    let servers = match operation.get("servers") {
        Some(servers) => read_servers(Some(servers)),
        None => read_servers(raw.path_item.get("servers")),
    };

    Ok(Endpoint {
        id,
        method: raw.method,
        path: raw.path.to_string(),
        operation_id: text(operation, "operationId"),
        summary: text(operation, "summary").or_else(|| text(raw.path_item, "summary")),
        description: text(operation, "description")
            .or_else(|| text(raw.path_item, "description")),
        tags: operation
            .get("tags")
            .and_then(Value::as_array)
            .map(|tags| tags.iter().filter_map(Value::as_str).map(str::to_string).collect())
            .unwrap_or_default(),
        deprecated: operation
            .get("deprecated")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        security,
        parameters,
        request_body,
        responses,
        servers,
    })
}

/// Every `{var}` of the template needs a path parameter; missing ones are
/// added as required strings.
fn add_implicit_path_parameters(
    resolver: &mut SchemaResolver<'_>,
    parameters: &mut Vec<Parameter>,
    path: &str,
    location: &str,
) {
    for name in template_variables(path) {
        let declared = parameters
            .iter()
            .any(|p| p.location == ParamLocation::Path && p.name == name);
        if declared {
            continue;
        }
        resolver.record(
            DiagnosticKind::Coercion,
            location,
            format!("path variable '{}' has no declared parameter; added as a required string", name),
        );
        parameters.push(Parameter {
            name,
            location: ParamLocation::Path,
            required: true,
            schema: SchemaNode::of_kind(SchemaKind::String),
            description: None,
            example: None,
            examples: IndexMap::new(),
            deprecated: false,
        });
    }
}

/// Reads a `servers` array. Entries without a `url` are skipped.
pub fn read_servers(raw: Option<&Value>) -> Vec<Server> {
    let Some(Value::Array(entries)) = raw else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| {
            let url = entry.get("url").and_then(Value::as_str)?;
            let variables = entry
                .get("variables")
                .and_then(Value::as_object)
                .map(|vars| {
                    vars.iter()
                        .map(|(name, var)| (name.clone(), read_server_variable(var)))
                        .collect()
                })
                .unwrap_or_default();
            Some(Server {
                url: url.to_string(),
                description: entry
                    .get("description")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                variables,
            })
        })
        .collect()
}

fn read_server_variable(raw: &Value) -> ServerVariable {
    let as_text = |v: &Value| match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    ServerVariable {
        default: raw.get("default").map(as_text).unwrap_or_default(),
        enum_values: raw
            .get("enum")
            .and_then(Value::as_array)
            .map(|values| values.iter().map(as_text).collect())
            .unwrap_or_default(),
        description: raw
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}
