//! # Code Samples
//!
//! Renders an [`ExampleRequest`] as curl, raw HTTP/1.1, JavaScript `fetch`
//! and Python `requests` snippets.

use crate::guide::request::ExampleRequest;
use serde::Serialize;
use serde_json::Value;
use url::Url;

/// One request rendered for several clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeSamples {
    /// Shell command.
    pub curl: String,
    /// Raw request as sent on the wire.
    pub http: String,
    /// `fetch` call.
    pub javascript: String,
    /// `requests` call.
    pub python: String,
}

/// Renders every sample for `request`.
pub fn render_samples(request: &ExampleRequest, base_url: &str) -> CodeSamples {
    CodeSamples {
        curl: curl(request),
        http: http_request(request, base_url),
        javascript: javascript(request),
        python: python(request),
    }
}

fn curl(request: &ExampleRequest) -> String {
    let mut lines = vec![format!(
        "curl -X {} {}",
        request.method,
        shell_quote(&request.url)
    )];
    for (key, value) in &request.headers {
        lines.push(format!("  -H {}", shell_quote(&format!("{}: {}", key, value))));
    }
    if let Some(cookies) = request.cookie_header() {
        lines.push(format!("  -b {}", shell_quote(&cookies)));
    }
    if let Some(body) = &request.body {
        lines.push(format!("  -d {}", shell_quote(&body_text(body))));
    }
    lines.join(" \\\n")
}

fn http_request(request: &ExampleRequest, base_url: &str) -> String {
    let (host, prefix) = split_base(base_url);
    let mut target = format!("{}{}", prefix, request.path);
    if !request.query.is_empty() {
        target.push('?');
        target.push_str(&request.query_string());
    }

    let mut lines = vec![
        format!("{} {} HTTP/1.1", request.method, target),
        format!("Host: {}", host),
    ];
    for (key, value) in &request.headers {
        lines.push(format!("{}: {}", key, value));
    }
    if let Some(cookies) = request.cookie_header() {
        lines.push(format!("Cookie: {}", cookies));
    }
    lines.push(String::new());
    if let Some(body) = &request.body {
        lines.push(body_text(body));
    }
    lines.join("\n")
}

fn javascript(request: &ExampleRequest) -> String {
    let mut code = vec!["// Using fetch API".to_string()];
    if let Some(body) = &request.body {
        code.push(format!("const requestBody = {};", pretty(body)));
    }
    code.push(String::new());
    code.push(format!("const response = await fetch('{}', {{", js_escape(&request.url)));
    code.push(format!("  method: '{}',", request.method));

    let headers = all_headers(request);
    if !headers.is_empty() {
        code.push("  headers: {".to_string());
        for (key, value) in &headers {
            code.push(format!("    '{}': '{}',", js_escape(key), js_escape(value)));
        }
        code.push("  },".to_string());
    }
    if request.body.is_some() {
        if is_json(request) {
            code.push("  body: JSON.stringify(requestBody),".to_string());
        } else {
            code.push("  body: requestBody,".to_string());
        }
    }
    code.push("});".to_string());
    code.push(String::new());
    code.push("if (!response.ok) {".to_string());
    code.push("  throw new Error(`HTTP error! status: ${response.status}`);".to_string());
    code.push("}".to_string());
    code.push(String::new());
    code.push("const data = await response.json();".to_string());
    code.push("console.log(data);".to_string());
    code.join("\n")
}

fn python(request: &ExampleRequest) -> String {
    let mut code = vec!["import requests".to_string(), String::new()];

    let headers = all_headers(request);
    if !headers.is_empty() {
        code.push("headers = {".to_string());
        for (key, value) in &headers {
            code.push(format!("    '{}': '{}',", py_escape(key), py_escape(value)));
        }
        code.push("}".to_string());
        code.push(String::new());
    }
    if let Some(body) = &request.body {
        code.push(format!("data = {}", python_literal(body, 0)));
        code.push(String::new());
    }

    let mut args = vec![format!("'{}'", py_escape(&request.url))];
    if !headers.is_empty() {
        args.push("headers=headers".to_string());
    }
    if request.body.is_some() {
        args.push(if is_json(request) { "json=data" } else { "data=data" }.to_string());
    }
    code.push(format!(
        "response = requests.request('{}', {})",
        request.method,
        args.join(", ")
    ));
    code.push("response.raise_for_status()".to_string());
    code.push(String::new());
    code.push("print(response.json())".to_string());
    code.join("\n")
}

/// Headers including a `Cookie` entry for clients without a cookie option.
fn all_headers(request: &ExampleRequest) -> Vec<(String, String)> {
    let mut headers: Vec<(String, String)> = request
        .headers
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    if let Some(cookies) = request.cookie_header() {
        headers.push(("Cookie".to_string(), cookies));
    }
    headers
}

fn is_json(request: &ExampleRequest) -> bool {
    request.content_type().is_none_or(|ct| ct.contains("json"))
}

/// Host (with port) and path prefix of the base URL.
fn split_base(base_url: &str) -> (String, String) {
    match Url::parse(base_url) {
        Ok(url) => {
            let host = match (url.host_str(), url.port()) {
                (Some(host), Some(port)) => format!("{}:{}", host, port),
                (Some(host), None) => host.to_string(),
                (None, _) => String::new(),
            };
            (host, url.path().trim_end_matches('/').to_string())
        }
        Err(e) => {
            tracing::debug!(base_url, error = %e, "Base URL is not absolute");
            (String::new(), base_url.trim_end_matches('/').to_string())
        }
    }
}

fn body_text(body: &Value) -> String {
    match body {
        Value::String(s) => s.clone(),
        other => pretty(other),
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn shell_quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', r"'\''"))
}

fn js_escape(text: &str) -> String {
    text.replace('\\', r"\\").replace('\'', r"\'")
}

fn py_escape(text: &str) -> String {
    js_escape(text)
}

/// JSON rendered as a Python literal (`True`, `False`, `None`).
fn python_literal(value: &Value, indent: usize) -> String {
    let pad = "    ".repeat(indent + 1);
    let close = "    ".repeat(indent);
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("'{}'", py_escape(s)),
        Value::Array(items) if items.is_empty() => "[]".to_string(),
        Value::Array(items) => {
            let rendered: Vec<String> = items
                .iter()
                .map(|item| format!("{}{},", pad, python_literal(item, indent + 1)))
                .collect();
            format!("[\n{}\n{}]", rendered.join("\n"), close)
        }
        Value::Object(map) if map.is_empty() => "{}".to_string(),
        Value::Object(map) => {
            let rendered: Vec<String> = map
                .iter()
                .map(|(k, v)| {
                    format!("{}'{}': {},", pad, py_escape(k), python_literal(v, indent + 1))
                })
                .collect();
            format!("{{\n{}\n{}}}", rendered.join("\n"), close)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::models::HttpMethod;
    use indexmap::{IndexMap, IndexSet};
    use serde_json::json;

    fn request() -> ExampleRequest {
        let mut headers = IndexMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Authorization".to_string(), "Bearer {YOUR_TOKEN}".to_string());
        ExampleRequest {
            method: HttpMethod::Post,
            url: "https://api.example.com:8443/v1/notes?draft=true".into(),
            path: "/notes".into(),
            query: [("draft".to_string(), "true".to_string())].into_iter().collect(),
            placeholders: IndexSet::new(),
            headers,
            cookies: IndexMap::new(),
            body: Some(json!({"text": "it's", "pinned": false, "meta": null})),
        }
    }

    #[test]
    fn test_curl_quotes_body() {
        let samples = render_samples(&request(), "https://api.example.com:8443/v1");
        assert!(samples
            .curl
            .starts_with("curl -X POST 'https://api.example.com:8443/v1/notes?draft=true' \\\n"));
        assert!(samples.curl.contains("-H 'Authorization: Bearer {YOUR_TOKEN}'"));
        assert!(samples.curl.contains(r#""text": "it'\''s""#));
    }

    #[test]
    fn test_http_request_line_and_host() {
        let samples = render_samples(&request(), "https://api.example.com:8443/v1/");
        let mut lines = samples.http.lines();
        assert_eq!(lines.next(), Some("POST /v1/notes?draft=true HTTP/1.1"));
        assert_eq!(lines.next(), Some("Host: api.example.com:8443"));
        assert_eq!(lines.next(), Some("Content-Type: application/json"));
    }

    #[test]
    fn test_python_literal_and_call() {
        let samples = render_samples(&request(), "https://api.example.com:8443/v1");
        assert!(samples.python.contains("'pinned': False,"));
        assert!(samples.python.contains("'meta': None,"));
        assert!(samples.python.contains(
            "response = requests.request('POST', 'https://api.example.com:8443/v1/notes?draft=true', headers=headers, json=data)"
        ));
    }

    #[test]
    fn test_javascript_fetch() {
        let samples = render_samples(&request(), "https://api.example.com:8443/v1");
        assert!(samples.javascript.contains("  method: 'POST',"));
        assert!(samples.javascript.contains("  body: JSON.stringify(requestBody),"));
    }

    #[test]
    fn test_cookies_become_header_for_clients() {
        let mut req = request();
        req.cookies.insert("session".into(), "{session}".into());
        let samples = render_samples(&req, "https://api.example.com");
        assert!(samples.curl.contains("-b 'session={session}'"));
        assert!(samples.http.contains("Cookie: session={session}"));
        assert!(samples.python.contains("'Cookie': 'session={session}',"));
    }
}
