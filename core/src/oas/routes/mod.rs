#![deny(missing_docs)]

//! # Routes Module
//!
//! Entry point for walking OpenAPI `paths`.
//! Orchestrates Path Items -> Builder -> [`Endpoint`] records.
//!
//! Paths are visited in declaration order and, within a path item, operations
//! in key order. Identifiers are built from normalized paths, so two raw
//! entries that differ only in trailing or repeated slashes (or in method key
//! case) collide and fail the run.

pub mod builder;
pub mod naming;

use crate::error::{AppError, AppResult};
use crate::oas::models::{Endpoint, HttpMethod};
use crate::oas::resolver::resolve_parameter_list;
use crate::oas::routes::builder::{build_endpoint, EndpointContext, RawOperation};
use crate::oas::routes::naming::normalize_path;
use serde_json::Value;
use std::collections::HashSet;

/// Builds every endpoint declared under `paths`.
pub fn collect_endpoints<'a>(
    ctx: &mut EndpointContext<'_, 'a>,
    paths: Option<&'a Value>,
) -> AppResult<Vec<Endpoint>> {
    let Some(Value::Object(paths)) = paths else {
        return Ok(Vec::new());
    };

    let mut endpoints = Vec::new();
    let mut seen = HashSet::new();

    for (raw_path, raw_item) in paths {
        if raw_path.starts_with("x-") {
            continue;
        }
        let path = normalize_path(raw_path);
        let item_location = format!("paths {}", raw_path);
        let Some((path_item, _)) = ctx.resolver.follow(raw_item, &item_location)? else {
            continue;
        };
        let Value::Object(entries) = path_item else {
            ctx.resolver
                .malformed(&item_location, "path item must be an object".to_string())?;
            continue;
        };

        let path_params =
            resolve_parameter_list(ctx.resolver, path_item.get("parameters"), &item_location)?;

        for (key, operation) in entries {
            let Some(method) = HttpMethod::from_key(key) else {
                continue;
            };
            if !operation.is_object() {
                ctx.resolver.malformed(
                    &format!("{} {}", method, path),
                    "operation must be an object".to_string(),
                )?;
                continue;
            }

            let endpoint = build_endpoint(
                ctx,
                RawOperation {
                    method,
                    path: &path,
                    operation,
                    path_item,
                },
                &path_params,
            )?;
            if !seen.insert(endpoint.id.clone()) {
                return Err(AppError::DuplicateEndpoint {
                    id: endpoint.id.to_string(),
                });
            }
            tracing::debug!(endpoint = %endpoint.id, "Endpoint normalized");
            endpoints.push(endpoint);
        }
    }

    Ok(endpoints)
}
