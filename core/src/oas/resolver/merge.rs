#![deny(missing_docs)]

//! # allOf Merging
//!
//! Folds resolved `allOf` members into the node carrying them.
//!
//! - Properties are upserted: a later member replaces a same-named property in place.
//! - `required` sets are unioned.
//! - Scalar disagreements (type, format, pattern, bounds, enum) follow the
//!   configured [`MergePolicy`]. Every settled conflict leaves a `[merge]`
//!   line in the node description and a merge diagnostic.
//! - Members that cannot be folded (recursive placeholders, a second set of
//!   `oneOf`/`anyOf` alternatives) stay in `all_of`.

use crate::config::{MergePolicy, ResolutionMode};
use crate::error::{AppError, AppResult};
use crate::oas::models::{DiagnosticKind, SchemaKind, SchemaNode};
use crate::oas::resolver::SchemaResolver;
use std::fmt;
use std::sync::Arc;

/// Outcome of one settled disagreement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Keep,
    Replace,
}

impl SchemaResolver<'_> {
    /// Folds `members` into `base` in declaration order.
    pub(crate) fn merge_all_of(
        &mut self,
        base: SchemaNode,
        members: Vec<SchemaNode>,
        location: &str,
    ) -> AppResult<SchemaNode> {
        let mut acc = base;
        let mut notes = Vec::new();

        for member in members {
            if member.self_referential {
                acc.all_of.push(Arc::new(member));
                continue;
            }
            self.fold(&mut acc, member, location, &mut notes)?;
        }

        for note in &notes {
            acc.append_note(note);
            self.record(DiagnosticKind::MergeNote, location, note.clone());
        }
        Ok(acc)
    }

    fn fold(
        &mut self,
        acc: &mut SchemaNode,
        member: SchemaNode,
        location: &str,
        notes: &mut Vec<String>,
    ) -> AppResult<()> {
        let current_kind = (acc.kind != SchemaKind::Any).then_some(acc.kind);
        let incoming_kind = (member.kind != SchemaKind::Any).then_some(member.kind);
        acc.kind = self
            .settle("type", current_kind, incoming_kind, location, notes)?
            .unwrap_or(SchemaKind::Any);

        acc.format = self.settle("format", acc.format.take(), member.format, location, notes)?;
        acc.constraints.pattern = self.settle(
            "pattern",
            acc.constraints.pattern.take(),
            member.constraints.pattern,
            location,
            notes,
        )?;
        acc.constraints.min_length = self.settle(
            "minLength",
            acc.constraints.min_length,
            member.constraints.min_length,
            location,
            notes,
        )?;
        acc.constraints.max_length = self.settle(
            "maxLength",
            acc.constraints.max_length,
            member.constraints.max_length,
            location,
            notes,
        )?;
        acc.constraints.minimum = self.settle(
            "minimum",
            acc.constraints.minimum,
            member.constraints.minimum,
            location,
            notes,
        )?;
        acc.constraints.maximum = self.settle(
            "maximum",
            acc.constraints.maximum,
            member.constraints.maximum,
            location,
            notes,
        )?;

        if !member.enum_values.is_empty() {
            if acc.enum_values.is_empty() || acc.enum_values == member.enum_values {
                acc.enum_values = member.enum_values;
            } else {
                let before = serde_json::Value::Array(acc.enum_values.clone());
                let after = serde_json::Value::Array(member.enum_values.clone());
                if self.conflict("enum", &before, &after, location, notes)? == Choice::Replace {
                    acc.enum_values = member.enum_values;
                }
            }
        }

        if acc.description.is_none() {
            acc.description = member.description;
        }
        acc.nullable |= member.nullable;
        acc.read_only |= member.read_only;
        acc.write_only |= member.write_only;
        if acc.example.is_none() {
            acc.example = member.example;
        }
        if acc.default.is_none() {
            acc.default = member.default;
        }

        for (name, prop) in member.properties {
            match acc.properties.get_mut(&name) {
                Some(existing) if !Arc::ptr_eq(existing, &prop) && *existing != prop => {
                    let field = format!("properties.{}", name);
                    let before = &existing.resolved_type;
                    let after = &prop.resolved_type;
                    if self.conflict(&field, before, after, location, notes)? == Choice::Replace {
                        *existing = prop;
                    }
                }
                Some(_) => {}
                None => {
                    acc.properties.insert(name, prop);
                }
            }
        }
        acc.required.extend(member.required);

        if let Some(items) = member.items {
            match acc.items.as_mut() {
                Some(existing) if !Arc::ptr_eq(existing, &items) && **existing != *items => {
                    let before = existing.resolved_type.clone();
                    if self.conflict("items", &before, &items.resolved_type, location, notes)?
                        == Choice::Replace
                    {
                        *existing = items;
                    }
                }
                Some(_) => {}
                None => acc.items = Some(items),
            }
        }

        let member_is_union = !member.one_of.is_empty() || !member.any_of.is_empty();
        if member_is_union {
            if acc.is_union() {
                let mut rest = SchemaNode::any();
                rest.one_of = member.one_of;
                rest.any_of = member.any_of;
                rest.resolved_type = super::types::structural_label(&rest);
                acc.all_of.push(Arc::new(rest));
            } else {
                acc.one_of = member.one_of;
                acc.any_of = member.any_of;
            }
        }
        acc.all_of.extend(member.all_of);
        Ok(())
    }

    /// Picks between two optional values; disagreement goes through the policy.
    fn settle<T: PartialEq + fmt::Display>(
        &mut self,
        field: &str,
        current: Option<T>,
        incoming: Option<T>,
        location: &str,
        notes: &mut Vec<String>,
    ) -> AppResult<Option<T>> {
        match (current, incoming) {
            (Some(a), Some(b)) if a != b => match self.conflict(field, &a, &b, location, notes)? {
                Choice::Keep => Ok(Some(a)),
                Choice::Replace => Ok(Some(b)),
            },
            (Some(a), _) => Ok(Some(a)),
            (None, b) => Ok(b),
        }
    }

    fn conflict(
        &mut self,
        field: &str,
        current: &dyn fmt::Display,
        incoming: &dyn fmt::Display,
        location: &str,
        notes: &mut Vec<String>,
    ) -> AppResult<Choice> {
        let options = self.options();
        match options.all_of_conflicts {
            MergePolicy::LastWins => {
                notes.push(format!(
                    "[merge] {}: {} overridden by {}",
                    field, current, incoming
                ));
                Ok(Choice::Replace)
            }
            MergePolicy::FirstWins => {
                notes.push(format!(
                    "[merge] {}: kept {}, ignored {}",
                    field, current, incoming
                ));
                Ok(Choice::Keep)
            }
            MergePolicy::Reject => {
                let detail = format!(
                    "allOf members disagree on {}: {} vs {}",
                    field, current, incoming
                );
                if options.mode == ResolutionMode::Strict {
                    return Err(AppError::SchemaConflict {
                        location: location.to_string(),
                        detail,
                    });
                }
                tracing::warn!("Conflict at {} settled last-wins: {}", location, detail);
                notes.push(format!(
                    "[merge] {}: {} overridden by {} (conflict not rejected in best-effort mode)",
                    field, current, incoming
                ));
                Ok(Choice::Replace)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{MergePolicy, NormalizeOptions, ResolutionMode};
    use crate::error::AppError;
    use crate::oas::models::{DiagnosticKind, SchemaKind};
    use crate::oas::pointer::DocumentPointerResolver;
    use crate::oas::resolver::SchemaResolver;
    use serde_json::{json, Value};

    fn doc() -> Value {
        json!({"components": {"schemas": {
            "Base": {
                "type": "object",
                "required": ["id"],
                "properties": {
                    "id": {"type": "integer"},
                    "label": {"type": "string"}
                }
            },
            "Derived": {
                "allOf": [
                    {"$ref": "#/components/schemas/Base"},
                    {
                        "type": "object",
                        "required": ["name"],
                        "properties": {
                            "name": {"type": "string"},
                            "label": {"type": "integer"}
                        }
                    }
                ]
            },
            "Clash": {
                "allOf": [
                    {"type": "string", "format": "date"},
                    {"type": "string", "format": "date-time"}
                ]
            }
        }}})
    }

    #[test]
    fn test_merges_properties_and_required() {
        let raw = doc();
        let options = NormalizeOptions::default();
        let pointers = DocumentPointerResolver::new(&raw);
        let mut resolver = SchemaResolver::new(&pointers, &options);
        let derived = resolver.resolve_pointer("#/components/schemas/Derived").unwrap();

        assert_eq!(derived.kind, SchemaKind::Object);
        assert!(derived.all_of.is_empty());
        let names: Vec<&str> = derived.properties.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["id", "label", "name"]);
        assert_eq!(derived.properties["label"].kind, SchemaKind::Integer);
        assert!(derived.is_required("id"));
        assert!(derived.is_required("name"));
        assert!(derived
            .description
            .as_deref()
            .unwrap()
            .contains("[merge] properties.label: string overridden by integer"));
        assert_eq!(resolver.diagnostics()[0].kind, DiagnosticKind::MergeNote);
    }

    #[test]
    fn test_first_wins_keeps_earlier_value() {
        let raw = doc();
        let options = NormalizeOptions {
            all_of_conflicts: MergePolicy::FirstWins,
            ..NormalizeOptions::default()
        };
        let pointers = DocumentPointerResolver::new(&raw);
        let mut resolver = SchemaResolver::new(&pointers, &options);
        let clash = resolver.resolve_pointer("#/components/schemas/Clash").unwrap();
        assert_eq!(clash.format.as_deref(), Some("date"));
        assert_eq!(clash.resolved_type, "string(date)");
    }

    #[test]
    fn test_reject_policy_by_mode() {
        let raw = doc();
        let strict = NormalizeOptions {
            all_of_conflicts: MergePolicy::Reject,
            ..NormalizeOptions::default()
        };
        let pointers = DocumentPointerResolver::new(&raw);
        let mut resolver = SchemaResolver::new(&pointers, &strict);
        match resolver.resolve_pointer("#/components/schemas/Clash") {
            Err(AppError::SchemaConflict { location, detail }) => {
                assert_eq!(location, "#/components/schemas/Clash");
                assert!(detail.contains("format"));
            }
            other => panic!("expected conflict, got {:?}", other),
        }

        let relaxed = NormalizeOptions {
            mode: ResolutionMode::BestEffort,
            ..strict.clone()
        };
        let mut resolver = SchemaResolver::new(&pointers, &relaxed);
        let clash = resolver.resolve_pointer("#/components/schemas/Clash").unwrap();
        assert_eq!(clash.format.as_deref(), Some("date-time"));
    }

    #[test]
    fn test_inline_member_required_resolved_against_merged_properties() {
        let raw = json!({"components": {"schemas": {
            "Named": {"type": "object", "properties": {"name": {"type": "string"}}},
            "Strict": {"allOf": [
                {"$ref": "#/components/schemas/Named"},
                {"type": "object", "required": ["name"]}
            ]}
        }}});
        let options = NormalizeOptions::default();
        let pointers = DocumentPointerResolver::new(&raw);
        let mut resolver = SchemaResolver::new(&pointers, &options);
        let node = resolver.resolve_pointer("#/components/schemas/Strict").unwrap();
        assert!(node.is_required("name"));
        assert!(resolver.diagnostics().is_empty());
    }
}
