#![deny(missing_docs)]

//! # Response Resolution
//!
//! Resolves an operation's `responses` map into [`Response`] records, keeping
//! status keys verbatim (`"200"`, `"4XX"`, `"default"`) in declaration order.

use crate::error::AppResult;
use crate::oas::models::Response;
use crate::oas::resolver::body::read_content;
use crate::oas::resolver::SchemaResolver;
use serde_json::Value;

/// Resolves every declared response. Entries lost to best-effort downgrades are skipped.
pub fn resolve_responses<'a>(
    resolver: &mut SchemaResolver<'a>,
    raw: Option<&'a Value>,
    location: &str,
) -> AppResult<Vec<Response>> {
    let Some(Value::Object(entries)) = raw else {
        return Ok(Vec::new());
    };

    let mut responses = Vec::with_capacity(entries.len());
    for (status, raw_response) in entries {
        // Specification extensions share the map with status codes.
        if status.starts_with("x-") {
            continue;
        }
        let response_location = format!("{} response {}", location, status);
        let Some((response, _)) = resolver.follow(raw_response, &response_location)? else {
            continue;
        };
        let media = read_content(resolver, response.get("content"), &response_location)?;
        responses.push(Response {
            status_code: status.clone(),
            description: response
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            content_types: media.content_types,
            schema: media.schema,
            examples: media.examples,
        });
    }
    Ok(responses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NormalizeOptions;
    use crate::oas::models::SchemaKind;
    use crate::oas::pointer::DocumentPointerResolver;
    use serde_json::json;

    #[test]
    fn test_responses_keep_order_and_follow_references() {
        let doc = json!({"components": {"responses": {
            "NotFound": {
                "description": "Missing",
                "content": {"application/problem+json": {"schema": {"type": "object", "properties": {"title": {"type": "string"}}}}}
            }
        }}});
        let options = NormalizeOptions::default();
        let pointers = DocumentPointerResolver::new(&doc);
        let mut resolver = SchemaResolver::new(&pointers, &options);

        let raw = json!({
            "200": {
                "description": "OK",
                "content": {"application/json": {"schema": {"type": "array", "items": {"type": "string"}}}}
            },
            "404": {"$ref": "#/components/responses/NotFound"},
            "default": {"description": "Unexpected"},
            "x-internal": true
        });
        let responses = resolve_responses(&mut resolver, Some(&raw), "GET /tags").unwrap();
        let codes: Vec<&str> = responses.iter().map(|r| r.status_code.as_str()).collect();
        assert_eq!(codes, vec!["200", "404", "default"]);

        assert_eq!(responses[0].schema.as_ref().unwrap().resolved_type, "array<string>");
        assert_eq!(responses[1].description, "Missing");
        assert_eq!(responses[1].content_types, vec!["application/problem+json"]);
        assert_eq!(responses[1].schema.as_ref().unwrap().kind, SchemaKind::Object);
        assert!(responses[2].schema.is_none());
    }
}
