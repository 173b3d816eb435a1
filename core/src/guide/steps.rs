#![deny(missing_docs)]

//! # Step-by-Step Instructions
//!
//! Instructions come from one fixed template, parameterized by the method,
//! the parameters by location, the body and the applicable security.

use crate::oas::models::{Endpoint, ParamLocation, Parameter};
use serde::Serialize;

/// What a step is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StepKind {
    /// Method and path.
    SendRequest,
    /// Credentials.
    Authenticate,
    /// Substituting path template variables.
    PathParameters,
    /// Query string.
    QueryParameters,
    /// Header parameters.
    HeaderParameters,
    /// Cookie parameters.
    CookieParameters,
    /// Body content type.
    ContentType,
    /// Body payload.
    RequestBody,
    /// What a successful call returns.
    ExpectedResponse,
}

/// One instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuideStep {
    /// Step category.
    pub kind: StepKind,
    /// Human-readable text.
    pub instruction: String,
}

impl GuideStep {
    fn new(kind: StepKind, instruction: String) -> Self {
        Self { kind, instruction }
    }
}

/// Ordered instructions for calling `endpoint`.
pub fn build_steps(endpoint: &Endpoint) -> Vec<GuideStep> {
    let mut steps = vec![GuideStep::new(
        StepKind::SendRequest,
        format!("Send a {} request to endpoint: {}", endpoint.method, endpoint.path),
    )];

    if let Some(alternative) = endpoint.primary_security().filter(|a| !a.is_anonymous()) {
        let instructions: Vec<&str> = alternative
            .requirements
            .iter()
            .filter(|r| !r.is_none())
            .map(|r| r.instruction())
            .collect();
        steps.push(GuideStep::new(
            StepKind::Authenticate,
            format!("Authentication: {}", instructions.join(" and ")),
        ));
    }

    let path_params: Vec<&Parameter> = endpoint.parameters_in(ParamLocation::Path).collect();
    if !path_params.is_empty() {
        let replacements: Vec<String> = path_params
            .iter()
            .map(|p| {
                format!(
                    "{{{}}} with your {} ({})",
                    p.name,
                    p.description.as_deref().unwrap_or(&p.name),
                    p.schema.resolved_type
                )
            })
            .collect();
        steps.push(GuideStep::new(
            StepKind::PathParameters,
            format!("Replace path parameters: {}", replacements.join(", ")),
        ));
    }

    let (required, optional): (Vec<&Parameter>, Vec<&Parameter>) = endpoint
        .parameters_in(ParamLocation::Query)
        .partition(|p| p.required);
    if !required.is_empty() {
        steps.push(GuideStep::new(
            StepKind::QueryParameters,
            format!("Required query parameters: {}", typed_list(&required)),
        ));
    }
    if !optional.is_empty() {
        steps.push(GuideStep::new(
            StepKind::QueryParameters,
            format!("Optional query parameters: {}", typed_list(&optional)),
        ));
    }

    let headers: Vec<&Parameter> = endpoint.parameters_in(ParamLocation::Header).collect();
    if !headers.is_empty() {
        steps.push(GuideStep::new(
            StepKind::HeaderParameters,
            format!("Set headers: {}", typed_list(&headers)),
        ));
    }
    let cookies: Vec<&Parameter> = endpoint.parameters_in(ParamLocation::Cookie).collect();
    if !cookies.is_empty() {
        steps.push(GuideStep::new(
            StepKind::CookieParameters,
            format!("Send cookies: {}", typed_list(&cookies)),
        ));
    }

    if let Some(body) = &endpoint.request_body {
        let content_type = body
            .content_types
            .first()
            .map(String::as_str)
            .unwrap_or("application/json");
        steps.push(GuideStep::new(
            StepKind::ContentType,
            format!("Set Content-Type header to: {}", content_type),
        ));
        let fields = if body.schema.required.is_empty() {
            "see schema".to_string()
        } else {
            body.schema
                .required
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        };
        let lead = if body.required {
            "Include request body"
        } else {
            "Optionally include request body"
        };
        steps.push(GuideStep::new(
            StepKind::RequestBody,
            format!("{} with required fields: {}", lead, fields),
        ));
    }

    if let Some(response) = endpoint.success_response() {
        let shape = response
            .schema
            .as_ref()
            .map(|s| format!(", body: {}", s.shape_summary()))
            .unwrap_or_default();
        steps.push(GuideStep::new(
            StepKind::ExpectedResponse,
            format!(
                "Expected success response: {} - {}{}",
                response.status_code, response.description, shape
            ),
        ));
    }

    steps
}

fn typed_list(params: &[&Parameter]) -> String {
    params
        .iter()
        .map(|p| format!("{} ({})", p.name, p.schema.resolved_type))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::models::{
        EndpointId, HttpMethod, RequestBody, Response, SchemaKind, SchemaNode, SecurityAlternative,
        SecurityRequirement,
    };
    use indexmap::IndexMap;

    fn param(name: &str, location: ParamLocation, required: bool, kind: SchemaKind) -> Parameter {
        Parameter {
            name: name.to_string(),
            location,
            required,
            schema: SchemaNode::of_kind(kind),
            description: None,
            example: None,
            examples: IndexMap::new(),
            deprecated: false,
        }
    }

    fn endpoint(method: HttpMethod, path: &str, parameters: Vec<Parameter>) -> Endpoint {
        Endpoint {
            id: EndpointId::new(method, path),
            method,
            path: path.to_string(),
            operation_id: None,
            summary: None,
            description: None,
            tags: Vec::new(),
            deprecated: false,
            security: Vec::new(),
            parameters,
            request_body: None,
            responses: Vec::new(),
            servers: Vec::new(),
        }
    }

    fn instructions(steps: &[GuideStep]) -> Vec<&str> {
        steps.iter().map(|s| s.instruction.as_str()).collect()
    }

    #[test]
    fn test_minimal_endpoint_has_only_the_request_line() {
        let ep = endpoint(HttpMethod::Delete, "/cache", Vec::new());
        let steps = build_steps(&ep);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].kind, StepKind::SendRequest);
        assert_eq!(steps[0].instruction, "Send a DELETE request to endpoint: /cache");
    }

    #[test]
    fn test_parameter_steps_by_location() {
        let mut id = param("id", ParamLocation::Path, true, SchemaKind::String);
        id.description = Some("report id".into());
        let ep = endpoint(
            HttpMethod::Get,
            "/reports/{id}",
            vec![
                id,
                param("format", ParamLocation::Query, true, SchemaKind::String),
                param("page", ParamLocation::Query, false, SchemaKind::Integer),
                param("X-Request-Id", ParamLocation::Header, true, SchemaKind::String),
                param("Accept-Language", ParamLocation::Header, false, SchemaKind::String),
                param("session", ParamLocation::Cookie, true, SchemaKind::String),
            ],
        );
        let steps = build_steps(&ep);
        let kinds: Vec<StepKind> = steps.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                StepKind::SendRequest,
                StepKind::PathParameters,
                StepKind::QueryParameters,
                StepKind::QueryParameters,
                StepKind::HeaderParameters,
                StepKind::CookieParameters,
            ]
        );
        assert_eq!(
            instructions(&steps)[1..],
            [
                "Replace path parameters: {id} with your report id (string)",
                "Required query parameters: format (string)",
                "Optional query parameters: page (integer)",
                "Set headers: X-Request-Id (string), Accept-Language (string)",
                "Send cookies: session (string)",
            ]
        );
    }

    #[test]
    fn test_auth_body_and_response_steps() {
        let mut ep = endpoint(HttpMethod::Post, "/notes", Vec::new());
        ep.security = vec![SecurityAlternative {
            requirements: vec![SecurityRequirement::Http {
                scheme_name: "Bearer".into(),
                scheme: "bearer".into(),
                bearer_format: None,
                description: None,
                instruction: "Include bearer token".into(),
            }],
        }];
        let mut schema = SchemaNode::of_kind(SchemaKind::Object);
        schema
            .properties
            .insert("text".into(), SchemaNode::of_kind(SchemaKind::String).into());
        schema.required.insert("text".into());
        ep.request_body = Some(RequestBody {
            required: false,
            content_types: vec!["application/json".into()],
            schema: schema.clone(),
            description: None,
            examples: IndexMap::new(),
        });
        ep.responses = vec![Response {
            status_code: "201".into(),
            description: "Created".into(),
            content_types: vec!["application/json".into()],
            schema: Some(schema),
            examples: IndexMap::new(),
        }];

        let steps = build_steps(&ep);
        assert_eq!(
            instructions(&steps)[1..],
            [
                "Authentication: Include bearer token",
                "Set Content-Type header to: application/json",
                "Optionally include request body with required fields: text",
                "Expected success response: 201 - Created, body: object { text: string }",
            ]
        );
    }

    #[test]
    fn test_anonymous_alternative_skips_auth_step() {
        let mut ep = endpoint(HttpMethod::Get, "/health", Vec::new());
        ep.security = vec![SecurityAlternative::unauthenticated()];
        let steps = build_steps(&ep);
        assert!(steps.iter().all(|s| s.kind != StepKind::Authenticate));
    }
}
