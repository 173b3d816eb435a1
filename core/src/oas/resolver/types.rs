#![deny(missing_docs)]

//! # Schema Keyword Reading
//!
//! Reads the scalar keywords of a raw schema object into a [`SchemaNode`] and
//! derives the short `resolved_type` labels used in documentation.
//!
//! Compatibility shapes are interpreted here rather than rewritten in the raw
//! tree:
//! - `nullable: true` / `x-nullable: true` / `type: [T, "null"]` -> `nullable`
//! - `const: v` -> `enum: [v]` (with the type inferred from `v` when absent)
//! - `examples: [..]` (JSON Schema style) -> `example` when `example` is absent

use crate::oas::models::{SchemaKind, SchemaNode};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Builds a node from the non-structural keywords of `map`.
///
/// `properties`, `items` and the combinators are left for the resolver.
pub(crate) fn read_keywords(map: &Map<String, Value>) -> SchemaNode {
    let mut node = SchemaNode::default();

    let (kind, type_allows_null) = read_type(map.get("type"));
    node.kind = kind;
    node.nullable = type_allows_null || flag(map, "nullable") || flag(map, "x-nullable");

    node.format = string_field(map, "format");
    node.description = string_field(map, "description");
    node.read_only = flag(map, "readOnly");
    node.write_only = flag(map, "writeOnly");

    node.constraints.pattern = string_field(map, "pattern");
    node.constraints.min_length = map.get("minLength").and_then(Value::as_u64);
    node.constraints.max_length = map.get("maxLength").and_then(Value::as_u64);
    node.constraints.minimum = map.get("minimum").and_then(Value::as_f64);
    node.constraints.maximum = map.get("maximum").and_then(Value::as_f64);

    if let Some(Value::Array(values)) = map.get("enum") {
        node.enum_values = values.clone();
    }
    if let Some(const_val) = map.get("const") {
        if node.enum_values.is_empty() {
            node.enum_values = vec![const_val.clone()];
        }
        if node.kind == SchemaKind::Any && !map.contains_key("type") {
            if let Some(kind) = infer_kind(const_val) {
                node.kind = kind;
            }
        }
    }

    node.example = map.get("example").cloned().or_else(|| {
        map.get("examples")
            .and_then(Value::as_array)
            .and_then(|items| items.first())
            .cloned()
    });
    node.default = map.get("default").cloned();

    node
}

/// Interprets the `type` keyword. Returns the kind and whether `null` was listed.
fn read_type(value: Option<&Value>) -> (SchemaKind, bool) {
    match value {
        Some(Value::String(s)) => (SchemaKind::from_keyword(s).unwrap_or(SchemaKind::Any), false),
        Some(Value::Array(types)) => {
            let names: Vec<&str> = types.iter().filter_map(Value::as_str).collect();
            let allows_null = names.contains(&"null");
            let concrete: Vec<SchemaKind> = names
                .iter()
                .filter(|n| **n != "null")
                .filter_map(|n| SchemaKind::from_keyword(n))
                .collect();
            match concrete.as_slice() {
                [single] => (*single, allows_null),
                [] if allows_null => (SchemaKind::Null, false),
                _ => (SchemaKind::Any, allows_null),
            }
        }
        _ => (SchemaKind::Any, false),
    }
}

fn infer_kind(value: &Value) -> Option<SchemaKind> {
    match value {
        Value::String(_) => Some(SchemaKind::String),
        Value::Bool(_) => Some(SchemaKind::Boolean),
        Value::Number(num) => {
            if num.is_i64() || num.is_u64() {
                Some(SchemaKind::Integer)
            } else {
                Some(SchemaKind::Number)
            }
        }
        Value::Array(_) => Some(SchemaKind::Array),
        Value::Object(_) => Some(SchemaKind::Object),
        Value::Null => Some(SchemaKind::Null),
    }
}

fn flag(map: &Map<String, Value>, key: &str) -> bool {
    map.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn string_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Derives the documentation label from a node's structure.
pub(crate) fn structural_label(node: &SchemaNode) -> String {
    let base = match node.kind {
        SchemaKind::Array => format!(
            "array<{}>",
            node.items
                .as_ref()
                .map(|i| i.resolved_type.as_str())
                .unwrap_or("any")
        ),
        SchemaKind::Any if !node.one_of.is_empty() => union_label("oneOf", &node.one_of),
        SchemaKind::Any if !node.any_of.is_empty() => union_label("anyOf", &node.any_of),
        kind => match &node.format {
            Some(format) if kind != SchemaKind::Object => format!("{}({})", kind, format),
            _ => kind.to_string(),
        },
    };
    if node.nullable && node.kind != SchemaKind::Null {
        format!("{} | null", base)
    } else {
        base
    }
}

fn union_label(keyword: &str, members: &[Arc<SchemaNode>]) -> String {
    let names: Vec<&str> = members.iter().map(|m| m.resolved_type.as_str()).collect();
    format!("{}<{}>", keyword, names.join(" | "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn keywords(value: Value) -> SchemaNode {
        match value {
            Value::Object(map) => read_keywords(&map),
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn test_reads_constraints_and_flags() {
        let node = keywords(json!({
            "type": "string",
            "format": "email",
            "pattern": "^.+@.+$",
            "minLength": 3,
            "maxLength": 64,
            "readOnly": true
        }));
        assert_eq!(node.kind, SchemaKind::String);
        assert_eq!(node.format.as_deref(), Some("email"));
        assert_eq!(node.constraints.min_length, Some(3));
        assert_eq!(node.constraints.max_length, Some(64));
        assert!(node.read_only);
        assert!(!node.write_only);
    }

    #[test]
    fn test_type_array_with_null_sets_nullable() {
        let node = keywords(json!({"type": ["integer", "null"]}));
        assert_eq!(node.kind, SchemaKind::Integer);
        assert!(node.nullable);
    }

    #[test]
    fn test_legacy_nullable_flags() {
        assert!(keywords(json!({"type": "string", "nullable": true})).nullable);
        assert!(keywords(json!({"type": "string", "x-nullable": true})).nullable);
    }

    #[test]
    fn test_const_becomes_single_enum_with_inferred_type() {
        let node = keywords(json!({"const": 42}));
        assert_eq!(node.enum_values, vec![json!(42)]);
        assert_eq!(node.kind, SchemaKind::Integer);
    }

    #[test]
    fn test_examples_array_fills_example() {
        let node = keywords(json!({"type": "string", "examples": ["a", "b"]}));
        assert_eq!(node.example, Some(json!("a")));

        let node = keywords(json!({"type": "string", "example": "x", "examples": ["a"]}));
        assert_eq!(node.example, Some(json!("x")));
    }

    #[test]
    fn test_labels() {
        let mut node = SchemaNode::of_kind(SchemaKind::String);
        node.format = Some("uuid".into());
        assert_eq!(structural_label(&node), "string(uuid)");

        let mut arr = SchemaNode::of_kind(SchemaKind::Array);
        let mut item = SchemaNode::of_kind(SchemaKind::Object);
        item.resolved_type = "User".into();
        arr.items = Some(Arc::new(item));
        arr.nullable = true;
        assert_eq!(structural_label(&arr), "array<User> | null");

        let mut union = SchemaNode::any();
        union.one_of = vec![
            SchemaNode::of_kind(SchemaKind::String).into(),
            SchemaNode::of_kind(SchemaKind::Integer).into(),
        ];
        assert_eq!(structural_label(&union), "oneOf<string | integer>");
    }
}
