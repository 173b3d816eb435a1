#![deny(missing_docs)]

//! # Endpoint Models
//!
//! One canonical record per `(method, path)` pair, with its parameters,
//! body, responses and effective security.

use crate::oas::models::schema::SchemaNode;
use crate::oas::models::security::SecurityAlternative;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// HTTP methods an OpenAPI path item may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// GET
    Get,
    /// PUT
    Put,
    /// POST
    Post,
    /// DELETE
    Delete,
    /// OPTIONS
    Options,
    /// HEAD
    Head,
    /// PATCH
    Patch,
    /// TRACE
    Trace,
}

impl HttpMethod {
    /// Parses a path-item key, case-insensitively.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "get" => Some(Self::Get),
            "put" => Some(Self::Put),
            "post" => Some(Self::Post),
            "delete" => Some(Self::Delete),
            "options" => Some(Self::Options),
            "head" => Some(Self::Head),
            "patch" => Some(Self::Patch),
            "trace" => Some(Self::Trace),
            _ => None,
        }
    }

    /// Upper-case method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
            Self::Head => "HEAD",
            Self::Patch => "PATCH",
            Self::Trace => "TRACE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The stable join key of an endpoint: `"METHOD /path"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EndpointId(String);

impl EndpointId {
    /// Builds an identifier from an already normalized path.
    pub fn new(method: HttpMethod, path: &str) -> Self {
        Self(format!("{} {}", method, path))
    }

    /// The identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EndpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The source location of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    /// Path.
    Path,
    /// Query.
    Query,
    /// Header.
    Header,
    /// Cookie.
    Cookie,
}

impl ParamLocation {
    /// Parses the `in` keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "path" => Some(Self::Path),
            "query" => Some(Self::Query),
            "header" => Some(Self::Header),
            "cookie" => Some(Self::Cookie),
            _ => None,
        }
    }
}

impl fmt::Display for ParamLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParamLocation::Path => "path",
            ParamLocation::Query => "query",
            ParamLocation::Header => "header",
            ParamLocation::Cookie => "cookie",
        };
        f.write_str(s)
    }
}

/// A resolved operation parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Location.
    #[serde(rename = "in")]
    pub location: ParamLocation,
    /// Whether the parameter must be sent. Always true for path parameters.
    pub required: bool,
    /// Resolved schema.
    pub schema: SchemaNode,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Explicit example.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    /// Named examples (name -> value).
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub examples: IndexMap<String, Value>,
    /// Deprecated flag.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub deprecated: bool,
}

impl Parameter {
    /// The explicitly documented example: `example`, then the first named example.
    pub fn explicit_example(&self) -> Option<&Value> {
        self.example
            .as_ref()
            .or_else(|| self.examples.values().next())
    }
}

/// A resolved request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestBody {
    /// Whether the body must be sent.
    pub required: bool,
    /// Media types in declaration order.
    pub content_types: Vec<String>,
    /// Schema of the first media type.
    pub schema: SchemaNode,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Named examples of the first media type (name -> value).
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub examples: IndexMap<String, Value>,
}

/// A resolved response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// Status code key as declared (`200`, `4XX`, `default`).
    pub status_code: String,
    /// Description.
    pub description: String,
    /// Media types in declaration order.
    pub content_types: Vec<String>,
    /// Schema of the first media type, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaNode>,
    /// Named examples of the first media type (name -> value).
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub examples: IndexMap<String, Value>,
}

impl Response {
    /// True for 2xx codes and the `2XX` range.
    pub fn is_success(&self) -> bool {
        self.status_code.starts_with('2')
    }

    /// True for the catch-all `default` response.
    pub fn is_default(&self) -> bool {
        self.status_code == "default"
    }
}

/// A server URL template.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Server {
    /// URL, possibly with `{variable}` placeholders.
    pub url: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Template variables.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub variables: IndexMap<String, ServerVariable>,
}

impl Server {
    /// The URL with every variable replaced by its default.
    pub fn resolved_url(&self) -> String {
        let mut url = self.url.clone();
        for (name, var) in &self.variables {
            url = url.replace(&format!("{{{}}}", name), &var.default);
        }
        url
    }
}

/// A server URL variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerVariable {
    /// Default substitution.
    pub default: String,
    /// Allowed values.
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The canonical endpoint record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    /// `"METHOD /path"`.
    pub id: EndpointId,
    /// HTTP method.
    pub method: HttpMethod,
    /// Normalized path template.
    pub path: String,
    /// operationId.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    /// Summary (operation-level, else path-level).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Description (operation-level, else path-level).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Tags.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Deprecated flag.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub deprecated: bool,
    /// Effective security: any alternative suffices. Empty when neither the
    /// operation nor the document declare security.
    pub security: Vec<SecurityAlternative>,
    /// Parameters after path/operation merge.
    pub parameters: Vec<Parameter>,
    /// Request body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    /// Declared responses in order.
    pub responses: Vec<Response>,
    /// Operation- or path-level server overrides.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,
}

impl Endpoint {
    /// Parameters at the given location, in order.
    pub fn parameters_in(&self, location: ParamLocation) -> impl Iterator<Item = &Parameter> {
        self.parameters
            .iter()
            .filter(move |p| p.location == location)
    }

    /// The response used as "the" success response: first 2xx, then `default`.
    pub fn success_response(&self) -> Option<&Response> {
        self.responses
            .iter()
            .find(|r| r.is_success())
            .or_else(|| self.responses.iter().find(|r| r.is_default()))
    }

    /// The alternative used when demonstrating a call: the first declared one.
    pub fn primary_security(&self) -> Option<&SecurityAlternative> {
        self.security.first()
    }

    /// True when calling this endpoint needs credentials.
    pub fn requires_auth(&self) -> bool {
        self.primary_security()
            .map(|alt| !alt.is_anonymous())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_keys_are_case_insensitive() {
        assert_eq!(HttpMethod::from_key("get"), Some(HttpMethod::Get));
        assert_eq!(HttpMethod::from_key("PATCH"), Some(HttpMethod::Patch));
        assert_eq!(HttpMethod::from_key("parameters"), None);
    }

    #[test]
    fn test_endpoint_id_format() {
        let id = EndpointId::new(HttpMethod::Get, "/users/{id}");
        assert_eq!(id.as_str(), "GET /users/{id}");
        assert_eq!(id.to_string(), "GET /users/{id}");
    }

    #[test]
    fn test_server_resolves_variable_defaults() {
        let mut variables = IndexMap::new();
        variables.insert(
            "region".to_string(),
            ServerVariable {
                default: "eu".into(),
                enum_values: vec!["eu".into(), "us".into()],
                description: None,
            },
        );
        let server = Server {
            url: "https://{region}.api.example.com/v1".into(),
            description: None,
            variables,
        };
        assert_eq!(server.resolved_url(), "https://eu.api.example.com/v1");
    }
}
