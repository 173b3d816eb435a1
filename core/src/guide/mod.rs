#![deny(missing_docs)]

//! # Execution Guides
//!
//! Built on demand for one endpoint of a normalized model:
//!
//! - **examples**: example values from resolved schemas.
//! - **request**: the concrete example request.
//! - **snippets**: curl / HTTP / JavaScript / Python renderings.
//! - **steps**: the templated instructions.

pub mod examples;
pub mod request;
pub mod snippets;
pub mod steps;

pub use examples::{example_value, ExampleContext};
pub use request::{build_request, ExampleRequest};
pub use snippets::CodeSamples;
pub use steps::{GuideStep, StepKind};

use crate::error::{AppError, AppResult};
use crate::oas::models::{ApiSpecModel, Endpoint, EndpointId, HttpMethod, SecurityAlternative};
use serde::Serialize;
use serde_json::Value;

/// Everything a caller needs to invoke one endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointExecutionGuide {
    /// Endpoint identifier.
    pub endpoint_id: EndpointId,
    /// HTTP method.
    pub method: HttpMethod,
    /// Path template.
    pub path: String,
    /// Endpoint summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Base URL the request targets.
    pub base_url: String,
    /// Effective security of the endpoint.
    pub security: Vec<SecurityAlternative>,
    /// The example request.
    pub request: ExampleRequest,
    /// Status code of the response the example describes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_status: Option<String>,
    /// Example success payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_example: Option<Value>,
    /// Client snippets.
    pub code_samples: CodeSamples,
    /// Step-by-step instructions.
    pub steps: Vec<GuideStep>,
}

/// Builds the guide for the endpoint with identifier `id`.
pub fn build_guide(model: &ApiSpecModel, id: &str) -> AppResult<EndpointExecutionGuide> {
    let endpoint = model
        .endpoint(id)
        .ok_or_else(|| AppError::EndpointNotFound(id.to_string()))?;
    let base_url = model.base_url_for(endpoint);
    let depth = model.options().example_depth;

    let request = build_request(endpoint, &base_url, depth);
    let (response_status, response_example) = match response_example(endpoint, depth) {
        Some((status, example)) => (Some(status), Some(example)),
        None => (None, None),
    };

    tracing::debug!(endpoint = %endpoint.id, base_url = %base_url, "Guide built");
    Ok(EndpointExecutionGuide {
        endpoint_id: endpoint.id.clone(),
        method: endpoint.method,
        path: endpoint.path.clone(),
        summary: endpoint.summary.clone(),
        code_samples: snippets::render_samples(&request, &base_url),
        steps: steps::build_steps(endpoint),
        security: endpoint.security.clone(),
        base_url,
        request,
        response_status,
        response_example,
    })
}

/// First 2XX response with a schema, else `default` with a schema.
fn response_example(endpoint: &Endpoint, depth: usize) -> Option<(String, Value)> {
    let response = endpoint
        .responses
        .iter()
        .find(|r| r.is_success() && r.schema.is_some())
        .or_else(|| {
            endpoint
                .responses
                .iter()
                .find(|r| r.is_default() && r.schema.is_some())
        })?;
    let example = match response.examples.values().next() {
        Some(example) => example.clone(),
        None => {
            let schema = response.schema.as_ref()?;
            example_value(schema, ExampleContext::Response, depth)
        }
    };
    Some((response.status_code.clone(), example))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NormalizeOptions;
    use crate::oas::normalize;
    use serde_json::json;

    fn model(yaml: &str) -> ApiSpecModel {
        let raw: Value = serde_yaml::from_str(yaml).unwrap();
        normalize(&raw, &NormalizeOptions::default()).unwrap()
    }

    const USERS: &str = r#"
openapi: 3.0.3
info: {title: Users, version: '1'}
paths:
  /users/{id}:
    get:
      summary: Fetch a user
      parameters:
        - name: id
          in: path
          required: true
          schema: {type: string}
      responses:
        '200':
          description: OK
          content:
            application/json:
              schema:
                type: object
                properties:
                  name: {type: string}
"#;

    #[test]
    fn test_guide_for_path_parameter_endpoint() {
        let model = model(USERS);
        let guide = model.build_guide("GET /users/{id}").unwrap();

        assert_eq!(guide.request.path, "/users/{id}");
        assert_eq!(guide.request.url, "https://api.example.com/users/{id}");
        assert_eq!(guide.request.body, None);
        assert_eq!(guide.response_status.as_deref(), Some("200"));
        assert_eq!(guide.response_example, Some(json!({"name": ""})));

        let count = |kind: StepKind| guide.steps.iter().filter(|s| s.kind == kind).count();
        assert_eq!(count(StepKind::PathParameters), 1);
        assert_eq!(count(StepKind::ExpectedResponse), 1);
        assert_eq!(count(StepKind::Authenticate), 0);
        assert_eq!(count(StepKind::RequestBody), 0);
        assert!(guide.steps[1].instruction.contains("{id} with your id (string)"));
        assert!(guide
            .steps
            .last()
            .unwrap()
            .instruction
            .ends_with("body: object { name?: string }"));
    }

    #[test]
    fn test_unknown_endpoint() {
        let model = model(USERS);
        assert!(matches!(
            build_guide(&model, "DELETE /users/{id}"),
            Err(AppError::EndpointNotFound(id)) if id == "DELETE /users/{id}"
        ));
    }

    #[test]
    fn test_operation_server_and_auth_steps() {
        let model = model(
            r#"
openapi: 3.1.0
info: {title: Notes, version: '2'}
servers:
  - url: https://{region}.notes.example.com/v2
    variables:
      region: {default: eu}
security:
  - Token: []
components:
  securitySchemes:
    Token: {type: http, scheme: bearer, bearerFormat: JWT}
paths:
  /notes:
    post:
      requestBody:
        required: true
        content:
          application/json:
            schema:
              type: object
              required: [text]
              properties:
                id: {type: integer, readOnly: true}
                text: {type: string}
      responses:
        '201':
          description: Created
  /uploads:
    post:
      servers:
        - url: https://upload.example.com
      responses:
        default:
          description: Anything
          content:
            application/json:
              schema: {type: object, properties: {ok: {type: boolean}}}
"#,
        );

        let notes = model.build_guide("POST /notes").unwrap();
        assert_eq!(notes.base_url, "https://eu.notes.example.com/v2");
        assert_eq!(notes.request.body, Some(json!({"text": ""})));
        assert_eq!(notes.request.headers["Authorization"], "Bearer {YOUR_TOKEN}");
        assert_eq!(notes.response_example, None);
        let kinds: Vec<StepKind> = notes.steps.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                StepKind::SendRequest,
                StepKind::Authenticate,
                StepKind::ContentType,
                StepKind::RequestBody,
                StepKind::ExpectedResponse,
            ]
        );
        assert_eq!(
            notes.steps[3].instruction,
            "Include request body with required fields: text"
        );

        let upload = model.build_guide("POST /uploads").unwrap();
        assert_eq!(upload.base_url, "https://upload.example.com");
        assert_eq!(upload.response_status.as_deref(), Some("default"));
        assert_eq!(upload.response_example, Some(json!({"ok": false})));
        assert!(upload.code_samples.http.contains("Host: upload.example.com"));
    }
}
