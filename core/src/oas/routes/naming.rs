#![deny(missing_docs)]

//! # Naming Utilities
//!
//! Path normalization for endpoint identifiers, template variable extraction,
//! and stable machine names derived from operations.

use crate::oas::models::{EndpointId, HttpMethod};
use regex::Regex;
use std::sync::OnceLock;

fn template_regex() -> &'static Regex {
    static TEMPLATE_RE: OnceLock<Regex> = OnceLock::new();
    TEMPLATE_RE.get_or_init(|| Regex::new(r"\{([^{}/]+)\}").expect("Invalid regex constant"))
}

/// Canonical form of a path template.
///
/// Surrounding whitespace is trimmed, a leading `/` ensured, repeated slashes
/// collapsed and a trailing slash removed (the root path stays `/`).
pub fn normalize_path(path: &str) -> String {
    let mut normalized = String::with_capacity(path.len() + 1);
    normalized.push('/');
    for segment in path.trim().split('/').filter(|s| !s.is_empty()) {
        if !normalized.ends_with('/') {
            normalized.push('/');
        }
        normalized.push_str(segment);
    }
    normalized
}

/// The identifier of the endpoint declared under `path` with `method`.
pub fn endpoint_id(method: HttpMethod, path: &str) -> EndpointId {
    EndpointId::new(method, &normalize_path(path))
}

/// Variable names of a path template in order of appearance (`/a/{x}/{y}` -> `[x, y]`).
pub fn template_variables(path: &str) -> Vec<String> {
    template_regex()
        .captures_iter(path)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Replaces each `{name}` of a template with `substitute(name)`.
pub fn fill_template(path: &str, mut substitute: impl FnMut(&str) -> String) -> String {
    template_regex()
        .replace_all(path, |caps: &regex::Captures| substitute(&caps[1]))
        .into_owned()
}

/// Converts a mixed-case string (CamelCase or camelCase) to snake_case.
/// Used for turning `operationId` into a stable machine name.
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 && !result.ends_with('_') {
                result.push('_');
            }
            for lc in c.to_lowercase() {
                result.push(lc);
            }
        } else if c.is_alphanumeric() {
            result.push(c);
        } else if !result.is_empty() && !result.ends_with('_') {
            result.push('_');
        }
    }
    result.trim_end_matches('_').to_string()
}

/// Derives a machine name from the HTTP Method and URL path when `operationId` is missing.
///
/// e.g. `GET /users/{id}` -> `get_users_id`
pub fn derive_operation_name(method: HttpMethod, path: &str) -> String {
    let clean_path = path.replace(['{', '}'], "").replace(['/', '-', '.'], "_");
    let name = format!(
        "{}_{}",
        method.as_str().to_lowercase(),
        clean_path.trim_matches('_')
    );
    name.trim_end_matches('_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/users/{id}/"), "/users/{id}");
        assert_eq!(normalize_path("  //users///{id}"), "/users/{id}");
        assert_eq!(normalize_path("users"), "/users");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path(""), "/");
    }

    #[test]
    fn test_endpoint_id_is_stable_for_equivalent_paths() {
        assert_eq!(
            endpoint_id(HttpMethod::Get, "/users/{id}/"),
            endpoint_id(HttpMethod::Get, "/users/{id}")
        );
        assert_eq!(endpoint_id(HttpMethod::Post, "/").as_str(), "POST /");
    }

    #[test]
    fn test_template_variables_and_fill() {
        assert_eq!(
            template_variables("/orgs/{org}/repos/{repo_id}"),
            vec!["org", "repo_id"]
        );
        assert_eq!(
            fill_template("/orgs/{org}/repos/{repo}", |name| name.to_uppercase()),
            "/orgs/ORG/repos/REPO"
        );
    }

    #[test]
    fn test_snake_case_conversion() {
        assert_eq!(to_snake_case("userId"), "user_id");
        assert_eq!(to_snake_case("id"), "id");
        assert_eq!(to_snake_case("camelCaseTemp"), "camel_case_temp");
        assert_eq!(to_snake_case("GetUsers"), "get_users");
        assert_eq!(to_snake_case("list-pets.v2"), "list_pets_v2");
    }

    #[test]
    fn test_derive_operation_name() {
        assert_eq!(derive_operation_name(HttpMethod::Get, "/users"), "get_users");
        assert_eq!(
            derive_operation_name(HttpMethod::Post, "/users/{id}/activate"),
            "post_users_id_activate"
        );
        assert_eq!(derive_operation_name(HttpMethod::Get, "/"), "get");
    }
}
