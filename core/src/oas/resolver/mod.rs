#![deny(missing_docs)]

//! # Resolver Module
//!
//! Turns raw schema fragments into self-contained [`SchemaNode`] trees.
//!
//! Handles:
//! - `$ref` following through a [`PointerResolver`], with memoization by pointer.
//! - Cycle cutting: a reference already on the traversal path becomes a
//!   recursive placeholder instead of being expanded again.
//! - `allOf` folding according to the configured [`MergePolicy`](crate::config::MergePolicy).
//! - Parameter, request body and response resolution for the endpoint builder.
//!
//! A placeholder depends on the ancestor it points at, so a subtree that
//! produced a placeholder for a pointer *above* its own root is only valid in
//! that context. Such subtrees are not memoized; every other resolved pointer is.
//! Memo entries are shared [`Arc`] handles, so a repeated reference costs one
//! pointer copy rather than a copy of its subtree.
//!
//! References are keyed by their canonical local form (see
//! [`PointerResolver::canonical`]), so `#/components/schemas/User` and an
//! absolute reference into the same document are one node.

pub mod body;
pub mod merge;
pub mod params;
pub mod responses;
pub mod types;

pub use body::resolve_request_body;
pub use params::{merge_parameters, resolve_parameter, resolve_parameter_list};
pub use responses::resolve_responses;

use crate::config::NormalizeOptions;
use crate::error::{AppError, AppResult, RefTrail};
use crate::oas::models::{Diagnostic, DiagnosticKind, SchemaKind, SchemaNode};
use crate::oas::pointer::PointerResolver;
use crate::oas::ref_utils::{extract_component_name, ref_label};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Depth-first schema resolver with memoization and cycle detection.
pub struct SchemaResolver<'a> {
    pointers: &'a dyn PointerResolver,
    options: &'a NormalizeOptions,
    memo: HashMap<String, Arc<SchemaNode>>,
    /// Pointers currently being expanded, outermost first.
    path: Vec<String>,
    /// Lowest `path` index a placeholder in the current subtree pointed at.
    low_link: usize,
    depth: usize,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> SchemaResolver<'a> {
    /// Creates a resolver reading targets through `pointers`.
    pub fn new(pointers: &'a dyn PointerResolver, options: &'a NormalizeOptions) -> Self {
        Self {
            pointers,
            options,
            memo: HashMap::new(),
            path: Vec::new(),
            low_link: usize::MAX,
            depth: 0,
            diagnostics: Vec::new(),
        }
    }

    /// The options in effect.
    pub fn options(&self) -> &'a NormalizeOptions {
        self.options
    }

    /// The pointer lookup in effect.
    pub fn pointers(&self) -> &'a dyn PointerResolver {
        self.pointers
    }

    /// Resolves the schema a pointer designates.
    pub fn resolve_pointer(&mut self, pointer: &str) -> AppResult<SchemaNode> {
        self.resolve_ref(pointer, pointer).map(Arc::unwrap_or_clone)
    }

    /// Resolves an inline (possibly `$ref`) schema. `location` names the
    /// fragment in diagnostics.
    pub fn resolve(&mut self, raw: &Value, location: &str) -> AppResult<SchemaNode> {
        self.resolve_value(raw, location).map(Arc::unwrap_or_clone)
    }

    /// Non-fatal findings collected so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Drains the collected findings.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub(crate) fn record(
        &mut self,
        kind: DiagnosticKind,
        location: impl Into<String>,
        message: impl Into<String>,
    ) {
        let diagnostic = Diagnostic::new(kind, location, message);
        tracing::debug!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    /// Follows `$ref` chains on non-schema objects (parameters, bodies,
    /// responses, path items). Returns the target and its pointer, if any.
    pub(crate) fn follow(
        &mut self,
        raw: &'a Value,
        location: &str,
    ) -> AppResult<Option<(&'a Value, Option<String>)>> {
        let mut current = raw;
        let mut seen: Vec<String> = Vec::new();
        let pointers = self.pointers;
        while let Some(pointer) = current.get("$ref").and_then(Value::as_str) {
            if seen.iter().any(|p| p == pointer) {
                seen.push(pointer.to_string());
                let err = AppError::ReferenceResolution {
                    pointer: pointer.to_string(),
                    trail: RefTrail(seen),
                };
                return self.downgrade_or_fail(err, location).map(|()| None);
            }
            seen.push(pointer.to_string());
            match pointers.resolve(pointer) {
                Some(target) => current = target,
                None => {
                    let err = AppError::ReferenceResolution {
                        pointer: pointer.to_string(),
                        trail: RefTrail(seen),
                    };
                    return self.downgrade_or_fail(err, location).map(|()| None);
                }
            }
        }
        Ok(Some((current, seen.pop())))
    }

    /// In best-effort mode records a recoverable error as a downgrade; otherwise returns it.
    pub(crate) fn downgrade_or_fail(&mut self, err: AppError, location: &str) -> AppResult<()> {
        if self.options.is_best_effort() && err.is_recoverable() {
            tracing::warn!("Downgrading at {}: {}", location, err);
            self.record(DiagnosticKind::Downgrade, location, err.to_string());
            Ok(())
        } else {
            Err(err)
        }
    }

    /// Structural problems in the raw document: `InvalidDocument` in strict
    /// mode, a downgrade diagnostic otherwise.
    pub(crate) fn malformed(&mut self, location: &str, message: String) -> AppResult<()> {
        let err = AppError::InvalidDocument(format!("{}: {}", location, message));
        if self.options.is_best_effort() {
            tracing::warn!("Skipping malformed fragment: {}", err);
            self.record(DiagnosticKind::Downgrade, location, err.to_string());
            Ok(())
        } else {
            Err(err)
        }
    }

    /// Like [`Self::downgrade_or_fail`], but yields an `any` node carrying the error text.
    fn any_or_fail(&mut self, err: AppError, location: &str) -> AppResult<SchemaNode> {
        let note = err.to_string();
        self.downgrade_or_fail(err, location)?;
        let mut node = SchemaNode::any();
        node.append_note(&note);
        Ok(node)
    }

    fn trail(&self, last: Option<&str>) -> RefTrail {
        let mut trail = self.path.clone();
        if let Some(last) = last {
            trail.push(last.to_string());
        }
        RefTrail(trail)
    }

    fn resolve_value(&mut self, raw: &Value, location: &str) -> AppResult<Arc<SchemaNode>> {
        if self.depth >= self.options.max_depth {
            let err = AppError::DepthLimit {
                trail: self.trail(None),
            };
            return self.any_or_fail(err, location).map(Arc::new);
        }
        self.depth += 1;
        let result = self.resolve_value_inner(raw, location, true);
        self.depth -= 1;
        result
    }

    fn resolve_value_inner(
        &mut self,
        raw: &Value,
        location: &str,
        enforce_required: bool,
    ) -> AppResult<Arc<SchemaNode>> {
        match raw {
            Value::Bool(true) => Ok(Arc::new(SchemaNode::any())),
            Value::Bool(false) => {
                let mut node = SchemaNode::any();
                node.append_note("Never matches (false schema)");
                Ok(Arc::new(node))
            }
            Value::Object(map) => match map.get("$ref").and_then(Value::as_str) {
                Some(pointer) => {
                    let mut node = self.resolve_ref(pointer, location)?;
                    // OAS 3.1 lets a reference override the target's description.
                    if let Some(desc) = map.get("description").and_then(Value::as_str) {
                        Arc::make_mut(&mut node).description = Some(desc.to_string());
                    }
                    Ok(node)
                }
                None => self
                    .resolve_inline(map, location, enforce_required)
                    .map(Arc::new),
            },
            _ => {
                let message = "schema must be an object or boolean".to_string();
                self.malformed(location, message.clone())?;
                let mut node = SchemaNode::any();
                node.append_note(&message);
                Ok(Arc::new(node))
            }
        }
    }

    fn resolve_ref(&mut self, raw_pointer: &str, location: &str) -> AppResult<Arc<SchemaNode>> {
        let pointers = self.pointers;
        let pointer = pointers.canonical(raw_pointer);
        let label = ref_label(&pointer);
        if let Some(index) = self.path.iter().position(|p| *p == pointer) {
            tracing::debug!("Cycle at {} -> {}", location, pointer);
            self.low_link = self.low_link.min(index);
            return Ok(Arc::new(SchemaNode::recursive_placeholder(&pointer, &label)));
        }
        if let Some(node) = self.memo.get(&pointer) {
            return Ok(Arc::clone(node));
        }

        let Some(raw) = pointers.resolve(raw_pointer) else {
            let err = AppError::ReferenceResolution {
                pointer: raw_pointer.to_string(),
                trail: self.trail(Some(raw_pointer)),
            };
            let mut node = self.any_or_fail(err, location)?;
            node.reference = Some(raw_pointer.to_string());
            return Ok(Arc::new(node));
        };

        let own_index = self.path.len();
        self.path.push(pointer.clone());
        let outer_low = std::mem::replace(&mut self.low_link, usize::MAX);
        let result = self.resolve_value(raw, &pointer);
        self.path.pop();
        let low = self.low_link;
        self.low_link = outer_low.min(low);

        // Shallow: children stay shared with the memo.
        let mut node = Arc::unwrap_or_clone(result?);
        node.reference = Some(pointer.clone());
        if extract_component_name(&pointer, None, "schemas").is_some()
            && (node.kind == SchemaKind::Object || node.is_union() || !node.all_of.is_empty())
        {
            node.resolved_type = if node.nullable {
                format!("{} | null", label)
            } else {
                label
            };
        }

        let node = Arc::new(node);
        if low >= own_index {
            self.memo.insert(pointer, Arc::clone(&node));
        }
        Ok(node)
    }

    fn resolve_inline(
        &mut self,
        map: &Map<String, Value>,
        location: &str,
        enforce_required: bool,
    ) -> AppResult<SchemaNode> {
        let mut node = types::read_keywords(map);

        if let Some(Value::Object(props)) = map.get("properties") {
            for (name, raw_prop) in props {
                let prop_location = format!("{}/properties/{}", location, name);
                let prop = self.resolve_value(raw_prop, &prop_location)?;
                node.properties.insert(name.clone(), prop);
            }
        }
        if let Some(Value::Array(names)) = map.get("required") {
            node.required = names
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect();
        }
        if let Some(raw_items) = map.get("items") {
            let items = self.resolve_value(raw_items, &format!("{}/items", location))?;
            node.items = Some(items);
        }
        if let Some(Value::Array(members)) = map.get("oneOf") {
            node.one_of = self.resolve_list(members, location, "oneOf")?;
        }
        if let Some(Value::Array(members)) = map.get("anyOf") {
            node.any_of = self.resolve_list(members, location, "anyOf")?;
        }
        if let Some(Value::Array(members)) = map.get("allOf") {
            let mut resolved = Vec::with_capacity(members.len());
            for (idx, member) in members.iter().enumerate() {
                let member_location = format!("{}/allOf/{}", location, idx);
                resolved.push(self.resolve_all_of_member(member, &member_location)?);
            }
            node = self.merge_all_of(node, resolved, location)?;
        }

        if node.kind == SchemaKind::Any && !node.is_union() {
            if !node.properties.is_empty() {
                node.kind = SchemaKind::Object;
            } else if node.items.is_some() {
                node.kind = SchemaKind::Array;
            }
        }

        if enforce_required && node.kind == SchemaKind::Object {
            self.enforce_required(&mut node, location);
        }

        node.resolved_type = types::structural_label(&node);
        Ok(node)
    }

    /// Inline `allOf` members routinely list `required` names that another
    /// member declares, so the required check waits for the merged node.
    fn resolve_all_of_member(&mut self, raw: &Value, location: &str) -> AppResult<SchemaNode> {
        match raw {
            Value::Object(map) if !map.contains_key("$ref") => {
                if self.depth >= self.options.max_depth {
                    let err = AppError::DepthLimit {
                        trail: self.trail(None),
                    };
                    return self.any_or_fail(err, location);
                }
                self.depth += 1;
                let result = self.resolve_inline(map, location, false);
                self.depth -= 1;
                result
            }
            _ => self.resolve_value(raw, location).map(Arc::unwrap_or_clone),
        }
    }

    fn resolve_list(
        &mut self,
        members: &[Value],
        location: &str,
        keyword: &str,
    ) -> AppResult<Vec<Arc<SchemaNode>>> {
        members
            .iter()
            .enumerate()
            .map(|(idx, member)| {
                self.resolve_value(member, &format!("{}/{}/{}", location, keyword, idx))
            })
            .collect()
    }

    fn enforce_required(&mut self, node: &mut SchemaNode, location: &str) {
        let unknown: Vec<String> = node
            .required
            .iter()
            .filter(|name| !node.properties.contains_key(*name))
            .cloned()
            .collect();
        for name in unknown {
            node.required.shift_remove(&name);
            self.record(
                DiagnosticKind::Coercion,
                location,
                format!("required property '{}' is not declared; dropped", name),
            );
        }
    }
}
