#![deny(missing_docs)]

//! # Schema Nodes
//!
//! The canonical, fully-resolved schema unit produced by the resolver.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Canonical schema kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaKind {
    /// `string`
    String,
    /// `number`
    Number,
    /// `integer`
    Integer,
    /// `boolean`
    Boolean,
    /// `array`
    Array,
    /// `object`
    Object,
    /// `null`
    Null,
    /// No type constraint (or an unresolvable / recursive placeholder).
    #[default]
    Any,
}

impl SchemaKind {
    /// Parses an OpenAPI `type` keyword. Unknown names yield `None`.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "string" => Some(Self::String),
            "number" => Some(Self::Number),
            "integer" => Some(Self::Integer),
            "boolean" => Some(Self::Boolean),
            "array" => Some(Self::Array),
            "object" => Some(Self::Object),
            "null" => Some(Self::Null),
            _ => None,
        }
    }

    /// The keyword as written in OpenAPI documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::Null => "null",
            Self::Any => "any",
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation constraints carried over from the raw schema.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraints {
    /// Regular expression the value must match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Minimum string length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    /// Maximum string length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    /// Inclusive numeric lower bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    /// Inclusive numeric upper bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
}

impl Constraints {
    /// True when no constraint is set.
    pub fn is_empty(&self) -> bool {
        self.pattern.is_none()
            && self.min_length.is_none()
            && self.max_length.is_none()
            && self.minimum.is_none()
            && self.maximum.is_none()
    }
}

/// A resolved schema.
///
/// Children are shared handles: every use of the same memoized reference
/// points at one resolved node, so diamond-shaped reference graphs stay
/// linear in size. After resolution `reference` is informational only:
/// traversal never follows it. Recursive references are cut with a placeholder node whose
/// `self_referential` flag is set.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaNode {
    /// The value kind.
    #[serde(rename = "type")]
    pub kind: SchemaKind,
    /// Format hint (date-time, uuid, email, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Human description, including any merge notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether `null` is accepted in addition to `kind`.
    #[serde(skip_serializing_if = "is_false")]
    pub nullable: bool,
    /// Only present in responses.
    #[serde(skip_serializing_if = "is_false")]
    pub read_only: bool,
    /// Only present in requests.
    #[serde(skip_serializing_if = "is_false")]
    pub write_only: bool,
    /// Validation constraints.
    #[serde(flatten)]
    pub constraints: Constraints,
    /// Allowed literal values.
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<Value>,
    /// Object properties in declaration order.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, Arc<SchemaNode>>,
    /// Required property names. Every entry is a key of `properties` on object nodes.
    #[serde(skip_serializing_if = "IndexSet::is_empty")]
    pub required: IndexSet<String>,
    /// Array item schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Arc<SchemaNode>>,
    /// Exactly-one-of alternatives.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<Arc<SchemaNode>>,
    /// Any-of alternatives.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<Arc<SchemaNode>>,
    /// All-of members that could not be folded into this node.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<Arc<SchemaNode>>,
    /// Original `$ref` pointer, kept for diagnostics.
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Short label used in documentation (`string(uuid)`, `array<User>`, ...).
    pub resolved_type: String,
    /// Explicit example value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    /// Default value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Set on placeholders that stand in for a reference already on the traversal path.
    #[serde(skip_serializing_if = "is_false")]
    pub self_referential: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl SchemaNode {
    /// A node that accepts anything.
    pub fn any() -> Self {
        Self {
            resolved_type: SchemaKind::Any.as_str().to_string(),
            ..Self::default()
        }
    }

    /// A primitive node of the given kind.
    pub fn of_kind(kind: SchemaKind) -> Self {
        Self {
            kind,
            resolved_type: kind.as_str().to_string(),
            ..Self::default()
        }
    }

    /// The terminal placeholder emitted when `pointer` is already on the traversal path.
    pub fn recursive_placeholder(pointer: &str, label: &str) -> Self {
        Self {
            kind: SchemaKind::Any,
            reference: Some(pointer.to_string()),
            resolved_type: format!("{} (recursive)", label),
            description: Some(format!("Self-referential: repeats {}", label)),
            self_referential: true,
            ..Self::default()
        }
    }

    /// True when this is a combinator node (`oneOf` / `anyOf`) with alternatives.
    pub fn is_union(&self) -> bool {
        !self.one_of.is_empty() || !self.any_of.is_empty()
    }

    /// Returns true if the named property is required.
    pub fn is_required(&self, property: &str) -> bool {
        self.required.contains(property)
    }

    /// Appends a line to the description.
    pub(crate) fn append_note(&mut self, note: &str) {
        match &mut self.description {
            Some(desc) if !desc.is_empty() => {
                desc.push('\n');
                desc.push_str(note);
            }
            _ => self.description = Some(note.to_string()),
        }
    }

    /// One-line shape description used in guides: `object { id: integer, name: string }`.
    pub fn shape_summary(&self) -> String {
        if self.kind == SchemaKind::Object && !self.properties.is_empty() {
            let fields: Vec<String> = self
                .properties
                .iter()
                .map(|(name, prop)| {
                    let marker = if self.is_required(name) { "" } else { "?" };
                    format!("{}{}: {}", name, marker, prop.resolved_type)
                })
                .collect();
            return format!("object {{ {} }}", fields.join(", "));
        }
        self.resolved_type.clone()
    }
}
