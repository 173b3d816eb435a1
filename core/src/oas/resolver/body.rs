#![deny(missing_docs)]

//! # Body Resolution
//!
//! Reads `content` maps (shared by request bodies, responses and
//! `content`-style parameters) and resolves request bodies.
//!
//! Only the first media type supplies the schema and examples; every media
//! type name is kept, in declaration order.

use crate::error::AppResult;
use crate::oas::models::{RequestBody, SchemaNode};
use crate::oas::resolver::SchemaResolver;
use indexmap::IndexMap;
use serde_json::Value;

/// What a `content` map contributes to its owner. A bare media `example`
/// is listed under the name `"example"`.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct MediaContent {
    pub content_types: Vec<String>,
    pub schema: Option<SchemaNode>,
    pub examples: IndexMap<String, Value>,
}

/// Resolves a `content` map.
pub(crate) fn read_content<'a>(
    resolver: &mut SchemaResolver<'a>,
    content: Option<&'a Value>,
    location: &str,
) -> AppResult<MediaContent> {
    let Some(Value::Object(media_types)) = content else {
        return Ok(MediaContent::default());
    };

    let mut result = MediaContent {
        content_types: media_types.keys().cloned().collect(),
        ..MediaContent::default()
    };

    if let Some((media_name, media)) = media_types.iter().next() {
        let media_location = format!("{}/content/{}", location, media_name);
        if let Some(raw_schema) = media.get("schema") {
            let schema = resolver.resolve(raw_schema, &format!("{}/schema", media_location))?;
            result.schema = Some(schema);
        }
        if let Some(example) = media.get("example") {
            result.examples.insert("example".to_string(), example.clone());
        }
        result
            .examples
            .extend(read_examples(resolver, media, &media_location)?);
    }
    Ok(result)
}

/// Flattens the `examples` map of a parameter or media object to `name -> value`.
///
/// Example objects behind `$ref` are followed; entries with only an
/// `externalValue` are skipped.
pub(crate) fn read_examples<'a>(
    resolver: &mut SchemaResolver<'a>,
    owner: &'a Value,
    location: &str,
) -> AppResult<IndexMap<String, Value>> {
    let mut examples = IndexMap::new();
    let Some(Value::Object(named)) = owner.get("examples") else {
        return Ok(examples);
    };
    for (name, raw) in named {
        let example_location = format!("{}/examples/{}", location, name);
        let Some((target, _)) = resolver.follow(raw, &example_location)? else {
            continue;
        };
        if let Some(value) = target.get("value") {
            examples.insert(name.clone(), value.clone());
        }
    }
    Ok(examples)
}

/// Resolves an operation's `requestBody`, following `$ref`.
pub fn resolve_request_body<'a>(
    resolver: &mut SchemaResolver<'a>,
    raw: &'a Value,
    location: &str,
) -> AppResult<Option<RequestBody>> {
    let Some((body, _)) = resolver.follow(raw, location)? else {
        return Ok(None);
    };
    if !body.is_object() {
        resolver.malformed(location, "requestBody must be an object".to_string())?;
        return Ok(None);
    }

    let media = read_content(resolver, body.get("content"), location)?;
    Ok(Some(RequestBody {
        required: body.get("required").and_then(Value::as_bool).unwrap_or(false),
        content_types: media.content_types,
        schema: media.schema.unwrap_or_else(SchemaNode::any),
        description: body
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string),
        examples: media.examples,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NormalizeOptions;
    use crate::oas::models::SchemaKind;
    use crate::oas::pointer::DocumentPointerResolver;
    use serde_json::json;

    #[test]
    fn test_request_body_reference_and_first_media_type() {
        let doc = json!({"components": {
            "requestBodies": {
                "NewPet": {
                    "required": true,
                    "content": {
                        "application/json": {
                            "schema": {"type": "object", "properties": {"name": {"type": "string"}}},
                            "examples": {
                                "rex": {"value": {"name": "Rex"}},
                                "shared": {"$ref": "#/components/examples/Tom"}
                            }
                        },
                        "application/xml": {"schema": {"type": "string"}}
                    }
                }
            },
            "examples": {"Tom": {"summary": "cat", "value": {"name": "Tom"}}}
        }});
        let options = NormalizeOptions::default();
        let pointers = DocumentPointerResolver::new(&doc);
        let mut resolver = SchemaResolver::new(&pointers, &options);

        let raw = json!({"$ref": "#/components/requestBodies/NewPet"});
        let body = resolve_request_body(&mut resolver, &raw, "POST /pets")
            .unwrap()
            .unwrap();
        assert!(body.required);
        assert_eq!(body.content_types, vec!["application/json", "application/xml"]);
        assert_eq!(body.schema.kind, SchemaKind::Object);
        assert_eq!(body.examples["rex"], json!({"name": "Rex"}));
        assert_eq!(body.examples["shared"], json!({"name": "Tom"}));
    }

    #[test]
    fn test_body_without_content_accepts_anything() {
        let doc = json!({});
        let options = NormalizeOptions::default();
        let pointers = DocumentPointerResolver::new(&doc);
        let mut resolver = SchemaResolver::new(&pointers, &options);
        let raw = json!({"description": "raw"});
        let body = resolve_request_body(&mut resolver, &raw, "loc")
            .unwrap()
            .unwrap();
        assert!(!body.required);
        assert!(body.content_types.is_empty());
        assert_eq!(body.schema.kind, SchemaKind::Any);
    }
}
