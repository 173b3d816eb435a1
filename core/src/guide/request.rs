#![deny(missing_docs)]

//! # Example Requests
//!
//! Turns an [`Endpoint`] into one concrete, copy-pasteable HTTP request:
//! filled path, query string, headers, cookies and body.
//!
//! Concrete values are percent-encoded. Values nobody documented stay as
//! `{name}` placeholders so the reader knows what to fill in. Placeholders are
//! tracked by key, so a documented value that merely looks like `{...}` is
//! still encoded.

use crate::guide::examples::{example_value, scalar_text, ExampleContext};
use crate::oas::models::{
    ApiKeyLocation, Endpoint, HttpMethod, ParamLocation, Parameter, SecurityAlternative,
    SecurityRequirement,
};
use crate::oas::routes::naming::fill_template;
use indexmap::{IndexMap, IndexSet};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Serialize;
use serde_json::Value;

/// Characters escaped inside a path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Characters escaped inside a query key or value.
const QUERY_COMPONENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'/')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Placeholder sent for API keys.
pub const API_KEY_PLACEHOLDER: &str = "{YOUR_API_KEY}";
/// Placeholder sent for bearer tokens.
pub const TOKEN_PLACEHOLDER: &str = "{YOUR_TOKEN}";
/// Placeholder sent for basic credentials.
pub const BASIC_PLACEHOLDER: &str = "{BASE64_CREDENTIALS}";
/// Placeholder sent for OAuth2 / OpenID Connect access tokens.
pub const ACCESS_TOKEN_PLACEHOLDER: &str = "{YOUR_ACCESS_TOKEN}";

/// A synthesized request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExampleRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Full URL: base, filled path and query string.
    pub url: String,
    /// Path with parameters substituted.
    pub path: String,
    /// Query parameters in declaration order (auth keys last).
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub query: IndexMap<String, String>,
    /// Query keys whose value is an unfilled placeholder, sent unencoded.
    #[serde(skip)]
    pub placeholders: IndexSet<String>,
    /// Headers: `Content-Type`, header parameters, then authentication.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, String>,
    /// Cookies.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub cookies: IndexMap<String, String>,
    /// Body payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl ExampleRequest {
    /// The encoded query string without the leading `?`.
    pub fn query_string(&self) -> String {
        self.query
            .iter()
            .map(|(key, value)| {
                let value = if self.placeholders.contains(key) {
                    value.clone()
                } else {
                    encode_query(value)
                };
                format!("{}={}", encode_query(key), value)
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// The `Cookie` header value, if any cookies are sent.
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        Some(
            self.cookies
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    /// The declared `Content-Type`, if a body is sent.
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("Content-Type").map(String::as_str)
    }
}

/// Builds the example request for `endpoint` against `base_url`.
pub fn build_request(endpoint: &Endpoint, base_url: &str, example_depth: usize) -> ExampleRequest {
    let path = fill_template(&endpoint.path, |name| {
        let param = endpoint
            .parameters_in(ParamLocation::Path)
            .find(|p| p.name == name);
        match param.and_then(documented_value) {
            Some(value) => utf8_percent_encode(&scalar_text(&value), PATH_SEGMENT).to_string(),
            None => format!("{{{}}}", name),
        }
    });

    let mut query = IndexMap::new();
    let mut placeholders = IndexSet::new();
    let mut headers = IndexMap::new();
    let mut cookies = IndexMap::new();

    let body = endpoint.request_body.as_ref().map(|body| {
        if let Some(content_type) = body.content_types.first() {
            headers.insert("Content-Type".to_string(), content_type.clone());
        }
        body.examples
            .values()
            .next()
            .cloned()
            .unwrap_or_else(|| example_value(&body.schema, ExampleContext::Request, example_depth))
    });

    for param in &endpoint.parameters {
        let target = match param.location {
            ParamLocation::Path => continue,
            ParamLocation::Query => &mut query,
            ParamLocation::Header => &mut headers,
            ParamLocation::Cookie => &mut cookies,
        };
        let value = if param.required {
            match documented_value(param) {
                Some(value) => scalar_text(&value),
                None => {
                    if param.location == ParamLocation::Query {
                        placeholders.insert(param.name.clone());
                    }
                    format!("{{{}}}", param.name)
                }
            }
        } else {
            match param.explicit_example() {
                Some(example) => scalar_text(example),
                None => continue,
            }
        };
        target.insert(param.name.clone(), value);
    }

    if let Some(alternative) = endpoint.primary_security() {
        apply_auth(
            alternative,
            &mut query,
            &mut placeholders,
            &mut headers,
            &mut cookies,
        );
    }

    let mut request = ExampleRequest {
        method: endpoint.method,
        url: String::new(),
        path,
        query,
        placeholders,
        headers,
        cookies,
        body,
    };
    request.url = format!("{}{}", base_url.trim_end_matches('/'), request.path);
    if !request.query.is_empty() {
        request.url.push('?');
        request.url.push_str(&request.query_string());
    }
    request
}

/// Parameter example, then schema example, then the first enum value.
fn documented_value(param: &Parameter) -> Option<Value> {
    param
        .explicit_example()
        .or(param.schema.example.as_ref())
        .or_else(|| param.schema.enum_values.first())
        .cloned()
}

fn apply_auth(
    alternative: &SecurityAlternative,
    query: &mut IndexMap<String, String>,
    placeholders: &mut IndexSet<String>,
    headers: &mut IndexMap<String, String>,
    cookies: &mut IndexMap<String, String>,
) {
    for requirement in &alternative.requirements {
        match requirement {
            SecurityRequirement::ApiKey { name, location, .. } => {
                let target = match location {
                    ApiKeyLocation::Header => &mut *headers,
                    ApiKeyLocation::Query => {
                        placeholders.insert(name.clone());
                        &mut *query
                    }
                    ApiKeyLocation::Cookie => &mut *cookies,
                };
                target.insert(name.clone(), API_KEY_PLACEHOLDER.to_string());
            }
            SecurityRequirement::Http { scheme, .. } => {
                let value = match scheme.as_str() {
                    "bearer" => format!("Bearer {}", TOKEN_PLACEHOLDER),
                    "basic" => format!("Basic {}", BASIC_PLACEHOLDER),
                    other => format!("{} {{YOUR_CREDENTIALS}}", capitalize(other)),
                };
                headers.insert("Authorization".to_string(), value);
            }
            SecurityRequirement::OAuth2 { .. } | SecurityRequirement::OpenIdConnect { .. } => {
                headers.insert(
                    "Authorization".to_string(),
                    format!("Bearer {}", ACCESS_TOKEN_PLACEHOLDER),
                );
            }
            SecurityRequirement::None { .. } => {}
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn encode_query(text: &str) -> String {
    utf8_percent_encode(text, QUERY_COMPONENT).to_string()
}
