#![deny(missing_docs)]

//! # Parameter Resolution
//!
//! Resolves raw parameter objects (inline or `$ref`) into [`Parameter`]s and
//! merges path-level with operation-level declarations.
//!
//! - `schema` wins; otherwise the first media type of `content` supplies it;
//!   legacy `type`/`format` keywords on the parameter itself are read as a schema.
//! - Path parameters are always required. Optional ones are coerced and flagged.
//! - `Accept`, `Content-Type` and `Authorization` header parameters are ignored,
//!   since the request itself controls those headers.

use crate::error::AppResult;
use crate::oas::models::{DiagnosticKind, ParamLocation, Parameter, SchemaNode};
use crate::oas::resolver::body::{read_content, read_examples};
use crate::oas::resolver::SchemaResolver;
use serde_json::Value;

const CONTROLLED_HEADERS: [&str; 3] = ["accept", "content-type", "authorization"];

/// Resolves one raw parameter. `Ok(None)` means the entry was skipped
/// (ignored header, or a downgraded failure in best-effort mode).
pub fn resolve_parameter<'a>(
    resolver: &mut SchemaResolver<'a>,
    raw: &'a Value,
    location: &str,
) -> AppResult<Option<Parameter>> {
    let Some((param, _)) = resolver.follow(raw, location)? else {
        return Ok(None);
    };

    let Some(name) = param.get("name").and_then(Value::as_str) else {
        resolver.malformed(location, "parameter has no name".to_string())?;
        return Ok(None);
    };
    let Some(param_in) = param
        .get("in")
        .and_then(Value::as_str)
        .and_then(ParamLocation::from_keyword)
    else {
        resolver.malformed(
            location,
            format!("parameter '{}' has a missing or unknown location", name),
        )?;
        return Ok(None);
    };

    let param_location = format!("{} parameter {}", location, name);

    if param_in == ParamLocation::Header
        && CONTROLLED_HEADERS
            .iter()
            .any(|h| name.eq_ignore_ascii_case(h))
    {
        resolver.record(
            DiagnosticKind::Coercion,
            &param_location,
            format!("header parameter '{}' is set by the request itself; ignored", name),
        );
        return Ok(None);
    }

    let mut example = param.get("example").cloned();
    let mut examples = read_examples(resolver, param, &param_location)?;

    let schema = if let Some(raw_schema) = param.get("schema") {
        resolver.resolve(raw_schema, &format!("{}/schema", param_location))?
    } else if param.get("content").is_some() {
        let mut media = read_content(resolver, param.get("content"), &param_location)?;
        if example.is_none() {
            example = media.examples.shift_remove("example");
        }
        for (key, value) in media.examples {
            examples.entry(key).or_insert(value);
        }
        media.schema.unwrap_or_else(SchemaNode::any)
    } else if param.get("type").is_some() {
        resolver.resolve(param, &param_location)?
    } else {
        SchemaNode::any()
    };

    let mut required = param.get("required").and_then(Value::as_bool).unwrap_or(false);
    if param_in == ParamLocation::Path && !required {
        required = true;
        resolver.record(
            DiagnosticKind::Coercion,
            &param_location,
            format!("path parameter '{}' was not marked required; coerced", name),
        );
    }

    Ok(Some(Parameter {
        name: name.to_string(),
        location: param_in,
        required,
        schema,
        description: param
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string),
        example,
        examples,
        deprecated: param
            .get("deprecated")
            .and_then(Value::as_bool)
            .unwrap_or(false),
    }))
}

/// Resolves a raw `parameters` array. Non-array input yields an empty list.
pub fn resolve_parameter_list<'a>(
    resolver: &mut SchemaResolver<'a>,
    raw: Option<&'a Value>,
    location: &str,
) -> AppResult<Vec<Parameter>> {
    let Some(Value::Array(entries)) = raw else {
        return Ok(Vec::new());
    };
    let mut result: Vec<Parameter> = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.iter().enumerate() {
        let entry_location = format!("{}/parameters/{}", location, idx);
        if let Some(param) = resolve_parameter(resolver, entry, &entry_location)? {
            upsert(&mut result, param);
        }
    }
    Ok(result)
}

/// Path-level parameters first; an operation-level parameter replaces the
/// path-level one with the same `(name, location)` in place, others are appended.
pub fn merge_parameters(path_level: Vec<Parameter>, operation_level: Vec<Parameter>) -> Vec<Parameter> {
    let mut merged = path_level;
    for param in operation_level {
        upsert(&mut merged, param);
    }
    merged
}

fn upsert(params: &mut Vec<Parameter>, param: Parameter) {
    match params
        .iter_mut()
        .find(|p| p.name == param.name && p.location == param.location)
    {
        Some(existing) => *existing = param,
        None => params.push(param),
    }
}
