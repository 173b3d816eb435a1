#![deny(missing_docs)]

//! # Reference Utilities
//!
//! Shared helpers for interpreting `$ref` strings.
//!
//! These utilities never fetch external documents. Absolute or relative
//! references are treated as local when their document part matches the
//! current document's `$self` / retrieval URI.

use percent_encoding::percent_decode_str;
use std::path::Path;
use url::Url;

/// Splits a reference into its document part and its fragment (without `#`).
pub(crate) fn split_reference(ref_str: &str) -> (&str, Option<&str>) {
    match ref_str.split_once('#') {
        Some((doc, frag)) => (doc, Some(frag)),
        None => (ref_str, None),
    }
}

/// Normalizes a `$ref` to a local JSON Pointer (e.g. `#/components/...`) if it targets the
/// current document as identified by `self_uri`.
///
/// Returns `None` if the reference is external or lacks a fragment.
pub(crate) fn normalize_ref_to_local(ref_str: &str, self_uri: Option<&str>) -> Option<String> {
    if ref_str.starts_with("#/") || ref_str == "#" {
        return Some(ref_str.to_string());
    }

    let (document, fragment) = split_reference(ref_str);
    let fragment = fragment?;
    if document.is_empty() {
        return Some(format!("#{}", fragment));
    }
    let self_uri = self_uri?;
    if ref_doc_matches_self(document, self_uri) {
        return Some(format!("#{}", fragment));
    }
    None
}

/// Extracts a component name from a `$ref` if it points to `#/components/{section}/{name}`.
pub(crate) fn extract_component_name(
    ref_str: &str,
    self_uri: Option<&str>,
    section: &str,
) -> Option<String> {
    let local = normalize_ref_to_local(ref_str, self_uri)?;
    let segments = pointer_segments(&local);

    if segments.len() != 3 {
        return None;
    }
    if segments[0] != "components" || segments[1] != section {
        return None;
    }

    let name = segments[2].clone();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// A short human label for a reference: the component name when it is one,
/// otherwise the last decoded pointer segment.
pub(crate) fn ref_label(ref_str: &str) -> String {
    if let Some(name) = extract_component_name(ref_str, None, "schemas") {
        return name;
    }
    let (_, fragment) = split_reference(ref_str);
    let source = fragment.unwrap_or(ref_str);
    source
        .rsplit('/')
        .find(|s| !s.is_empty())
        .map(decode_pointer_segment)
        .unwrap_or_else(|| ref_str.to_string())
}

/// Splits a local pointer (`#/a/b` or `/a/b`) into decoded segments.
pub(crate) fn pointer_segments(pointer: &str) -> Vec<String> {
    let trimmed = pointer.trim_start_matches('#');
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed
        .trim_start_matches('/')
        .split('/')
        .map(decode_pointer_segment)
        .collect()
}

/// Decodes a JSON Pointer segment (handles `~1` and `~0`, then percent-encoding).
pub(crate) fn decode_pointer_segment(segment: &str) -> String {
    let decoded = segment.replace("~1", "/").replace("~0", "~");
    percent_decode_str(&decoded)
        .decode_utf8_lossy()
        .into_owned()
}

/// Escapes a name for use as one JSON Pointer segment (`~` -> `~0`, `/` -> `~1`).
pub(crate) fn escape_pointer_segment(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

fn ref_doc_matches_self(ref_doc: &str, self_uri: &str) -> bool {
    if ref_doc == self_uri {
        return true;
    }

    if let (Ok(ref_url), Ok(self_url)) = (Url::parse(ref_doc), Url::parse(self_uri)) {
        return ref_url.scheme() == self_url.scheme()
            && ref_url.host() == self_url.host()
            && ref_url.port() == self_url.port()
            && ref_url.path() == self_url.path();
    }

    // If `$self` is an absolute-path reference (e.g. "/api/openapi"), compare path.
    if self_uri.starts_with('/') {
        if let Ok(ref_url) = Url::parse(ref_doc) {
            return ref_url.path() == self_uri;
        }
    }

    // Fallback: compare raw relative paths.
    if !self_uri.contains("://") && !ref_doc.contains("://") {
        return Path::new(ref_doc) == Path::new(self_uri);
    }

    false
}
