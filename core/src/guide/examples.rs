#![deny(missing_docs)]

//! # Example Values
//!
//! Derives one representative JSON value per resolved schema node.
//!
//! Precedence is `example`, then the first `enum` value, then a type default
//! (`""`, `0`, `false`, a one-element array, or an object built property by
//! property). Recursion is bounded by a depth budget, and recursive
//! placeholders render as `null`, so every call terminates.

use crate::oas::models::{SchemaKind, SchemaNode};
use serde_json::{Map, Value};

/// Which side of the exchange an example is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExampleContext {
    /// Request payloads omit `readOnly` properties.
    Request,
    /// Response payloads omit `writeOnly` properties.
    Response,
}

impl ExampleContext {
    fn skips(&self, property: &SchemaNode) -> bool {
        match self {
            ExampleContext::Request => property.read_only,
            ExampleContext::Response => property.write_only,
        }
    }
}

/// Synthesizes an example for `node`.
///
/// `depth` is the remaining nesting budget: a node reached with no budget
/// left yields `null`, as do self-referential placeholders.
pub fn example_value(node: &SchemaNode, ctx: ExampleContext, depth: usize) -> Value {
    if depth == 0 || node.self_referential {
        return Value::Null;
    }
    if let Some(example) = &node.example {
        return example.clone();
    }
    if let Some(first) = node.enum_values.first() {
        return first.clone();
    }
    if let Some(member) = node.one_of.first().or_else(|| node.any_of.first()) {
        return example_value(member, ctx, depth - 1);
    }

    match node.kind {
        SchemaKind::String => Value::String(String::new()),
        SchemaKind::Number | SchemaKind::Integer => Value::from(0),
        SchemaKind::Boolean => Value::Bool(false),
        SchemaKind::Null => Value::Null,
        SchemaKind::Array => match &node.items {
            Some(items) => Value::Array(vec![example_value(items, ctx, depth - 1)]),
            None => Value::Array(Vec::new()),
        },
        SchemaKind::Object => object_example(node, ctx, depth),
        SchemaKind::Any if !node.properties.is_empty() => object_example(node, ctx, depth),
        // Leftover allOf members (e.g. self-referential mixins) speak for the node.
        SchemaKind::Any => match node.all_of.iter().find(|m| !m.self_referential) {
            Some(member) => example_value(member, ctx, depth - 1),
            None => Value::Null,
        },
    }
}

fn object_example(node: &SchemaNode, ctx: ExampleContext, depth: usize) -> Value {
    let mut object = Map::new();
    for (name, property) in &node.properties {
        if ctx.skips(property) {
            continue;
        }
        object.insert(name.clone(), example_value(property, ctx, depth - 1));
    }
    Value::Object(object)
}

/// The scalar text used when an example lands in a URL, header or cookie.
///
/// Strings are taken verbatim, arrays are comma-joined, other values use
/// their JSON rendering.
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Array(items) => items.iter().map(scalar_text).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(props: Vec<(&str, SchemaNode)>) -> SchemaNode {
        let mut node = SchemaNode::of_kind(SchemaKind::Object);
        for (name, prop) in props {
            node.properties.insert(name.to_string(), prop.into());
        }
        node
    }

    #[test]
    fn test_type_defaults() {
        let node = object(vec![
            ("name", SchemaNode::of_kind(SchemaKind::String)),
            ("age", SchemaNode::of_kind(SchemaKind::Integer)),
            ("active", SchemaNode::of_kind(SchemaKind::Boolean)),
        ]);
        assert_eq!(
            example_value(&node, ExampleContext::Response, 6),
            json!({"name": "", "age": 0, "active": false})
        );
    }

    #[test]
    fn test_example_beats_enum_beats_default() {
        let mut status = SchemaNode::of_kind(SchemaKind::String);
        status.enum_values = vec![json!("active"), json!("banned")];
        assert_eq!(example_value(&status, ExampleContext::Request, 6), json!("active"));

        status.example = Some(json!("banned"));
        assert_eq!(example_value(&status, ExampleContext::Request, 6), json!("banned"));
    }

    #[test]
    fn test_read_and_write_only_follow_context() {
        let mut id = SchemaNode::of_kind(SchemaKind::Integer);
        id.read_only = true;
        let mut password = SchemaNode::of_kind(SchemaKind::String);
        password.write_only = true;
        let node = object(vec![("id", id), ("password", password)]);

        assert_eq!(
            example_value(&node, ExampleContext::Request, 6),
            json!({"password": ""})
        );
        assert_eq!(
            example_value(&node, ExampleContext::Response, 6),
            json!({"id": 0})
        );
    }

    #[test]
    fn test_arrays_unions_and_placeholders() {
        let mut tags = SchemaNode::of_kind(SchemaKind::Array);
        tags.items = Some(SchemaNode::of_kind(SchemaKind::String).into());
        assert_eq!(example_value(&tags, ExampleContext::Request, 6), json!([""]));

        let mut union = SchemaNode::any();
        union.one_of = vec![
            SchemaNode::of_kind(SchemaKind::Boolean).into(),
            SchemaNode::of_kind(SchemaKind::String).into(),
        ];
        assert_eq!(example_value(&union, ExampleContext::Request, 6), json!(false));

        let mut tree = object(vec![(
            "child",
            SchemaNode::recursive_placeholder("#/components/schemas/Tree", "Tree"),
        )]);
        tree.resolved_type = "Tree".into();
        assert_eq!(
            example_value(&tree, ExampleContext::Response, 6),
            json!({"child": null})
        );
    }

    #[test]
    fn test_depth_budget_terminates() {
        let mut node = SchemaNode::of_kind(SchemaKind::String);
        for _ in 0..10 {
            let mut wrapper = SchemaNode::of_kind(SchemaKind::Array);
            wrapper.items = Some(node.into());
            node = wrapper;
        }
        assert_eq!(
            example_value(&node, ExampleContext::Request, 3),
            json!([[[null]]])
        );
        assert_eq!(example_value(&node, ExampleContext::Request, 0), Value::Null);
    }

    #[test]
    fn test_scalar_text() {
        assert_eq!(scalar_text(&json!("abc")), "abc");
        assert_eq!(scalar_text(&json!(42)), "42");
        assert_eq!(scalar_text(&json!([1, "b"])), "1,b");
        assert_eq!(scalar_text(&Value::Null), "");
    }
}
