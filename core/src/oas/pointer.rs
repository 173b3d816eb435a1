#![deny(missing_docs)]

//! # Pointer Resolution
//!
//! The seam through which the engine looks up `$ref` targets. The document
//! loader supplies an implementation; [`DocumentPointerResolver`] covers the
//! common case of references local to a single in-memory document.

use crate::oas::ref_utils::{normalize_ref_to_local, pointer_segments};
use serde_json::Value;

/// The raw, format-independent document tree produced by a loader.
pub type RawDocument = Value;

/// Looks up the raw fragment a `$ref` string points at.
pub trait PointerResolver {
    /// Returns the fragment, or `None` when the pointer does not exist.
    fn resolve(&self, pointer: &str) -> Option<&Value>;

    /// The form of `pointer` used to identify its target. Two pointers with
    /// the same canonical form name the same fragment.
    fn canonical(&self, pointer: &str) -> String {
        pointer.to_string()
    }
}

impl<T: PointerResolver + ?Sized> PointerResolver for &T {
    fn resolve(&self, pointer: &str) -> Option<&Value> {
        (**self).resolve(pointer)
    }

    fn canonical(&self, pointer: &str) -> String {
        (**self).canonical(pointer)
    }
}

/// Resolves pointers local to one document.
///
/// References whose document part matches `$self` (or the retrieval URI
/// given to [`DocumentPointerResolver::with_base_uri`]) are treated as local.
#[derive(Debug, Clone, Copy)]
pub struct DocumentPointerResolver<'a> {
    root: &'a Value,
    base_uri: Option<&'a str>,
}

impl<'a> DocumentPointerResolver<'a> {
    /// Creates a resolver over `root`, using its `$self` field as base URI when present.
    pub fn new(root: &'a Value) -> Self {
        Self {
            root,
            base_uri: root.get("$self").and_then(Value::as_str),
        }
    }

    /// Creates a resolver with an explicit base (retrieval) URI.
    pub fn with_base_uri(root: &'a Value, base_uri: &'a str) -> Self {
        Self {
            root,
            base_uri: Some(base_uri),
        }
    }

    /// The document this resolver reads from.
    pub fn root(&self) -> &'a Value {
        self.root
    }
}

impl PointerResolver for DocumentPointerResolver<'_> {
    fn resolve(&self, pointer: &str) -> Option<&Value> {
        let local = normalize_ref_to_local(pointer, self.base_uri)?;
        let mut current = self.root;
        for segment in pointer_segments(&local) {
            current = match current {
                Value::Object(map) => map.get(&segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Local references stay as written; references qualified with the base
    /// URI collapse to their local `#/...` form.
    fn canonical(&self, pointer: &str) -> String {
        normalize_ref_to_local(pointer, self.base_uri).unwrap_or_else(|| pointer.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> Value {
        json!({
            "$self": "https://example.com/openapi.yaml",
            "components": {
                "schemas": {
                    "User": {"type": "object"},
                    "a/b": {"type": "string"}
                },
                "parameters": {
                    "list": [{"name": "first"}, {"name": "second"}]
                }
            }
        })
    }

    #[test]
    fn test_resolves_local_pointer() {
        let raw = doc();
        let resolver = DocumentPointerResolver::new(&raw);
        let user = resolver.resolve("#/components/schemas/User").unwrap();
        assert_eq!(user["type"], "object");
    }

    #[test]
    fn test_resolves_escaped_and_indexed_segments() {
        let raw = doc();
        let resolver = DocumentPointerResolver::new(&raw);
        assert_eq!(
            resolver.resolve("#/components/schemas/a~1b").unwrap()["type"],
            "string"
        );
        assert_eq!(
            resolver.resolve("#/components/parameters/list/1").unwrap()["name"],
            "second"
        );
    }

    #[test]
    fn test_resolves_self_qualified_reference() {
        let raw = doc();
        let resolver = DocumentPointerResolver::new(&raw);
        let target = resolver
            .resolve("https://example.com/openapi.yaml#/components/schemas/User")
            .unwrap();
        assert_eq!(target["type"], "object");
    }

    #[test]
    fn test_canonical_collapses_base_uri() {
        let raw = json!({"components": {"schemas": {"User": {"type": "object"}}}});
        let resolver = DocumentPointerResolver::with_base_uri(&raw, "https://api.test/spec.json");
        assert_eq!(
            resolver.canonical("https://api.test/spec.json#/components/schemas/User"),
            "#/components/schemas/User"
        );
        assert_eq!(
            resolver.canonical("#/components/schemas/User"),
            "#/components/schemas/User"
        );
        assert_eq!(
            resolver.canonical("other.json#/components/schemas/User"),
            "other.json#/components/schemas/User"
        );
        assert!(resolver
            .resolve("https://api.test/spec.json#/components/schemas/User")
            .is_some());
    }

    #[test]
    fn test_missing_and_external_pointers_are_none() {
        let raw = doc();
        let resolver = DocumentPointerResolver::new(&raw);
        assert!(resolver.resolve("#/components/schemas/Missing").is_none());
        assert!(resolver.resolve("common.yaml#/components/schemas/User").is_none());
        assert!(resolver.resolve("#/components/parameters/list/9").is_none());
    }
}
