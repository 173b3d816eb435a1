#![deny(missing_docs)]

//! # Pagination Analysis
//!
//! Detects common pagination conventions from query parameter names and
//! recommends a client loop for the first style found.

use crate::error::{AppError, AppResult};
use crate::oas::models::{ApiSpecModel, Endpoint, EndpointId, HttpMethod, ParamLocation, Parameter};
use serde::Serialize;
use std::fmt;

/// A pagination convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaginationStyle {
    /// `page` / `page_number`, with optional page size.
    PageBased,
    /// `offset` / `skip`, with optional limit.
    OffsetBased,
    /// `cursor` / `next_token`.
    CursorBased,
}

impl PaginationStyle {
    /// Parameter names that signal this style.
    fn triggers(&self) -> &'static [&'static str] {
        match self {
            PaginationStyle::PageBased => &["page", "page_number"],
            PaginationStyle::OffsetBased => &["offset", "skip"],
            PaginationStyle::CursorBased => &["cursor", "next_token"],
        }
    }

    /// Parameter names reported as part of this style.
    fn related(&self) -> &'static [&'static str] {
        match self {
            PaginationStyle::PageBased => &["page", "page_number", "per_page", "page_size", "limit"],
            PaginationStyle::OffsetBased => &["offset", "skip", "limit", "take"],
            PaginationStyle::CursorBased => &["cursor", "next_token", "page_token"],
        }
    }

    fn recommendation(&self) -> &'static str {
        match self {
            PaginationStyle::PageBased => {
                "Implement page-based pagination by incrementing the page parameter until no more results are returned."
            }
            PaginationStyle::OffsetBased => {
                "Implement offset-based pagination by incrementing the offset by the limit value on each request."
            }
            PaginationStyle::CursorBased => {
                "Implement cursor-based pagination by using the cursor/token from the previous response in the next request."
            }
        }
    }

    const ALL: [PaginationStyle; 3] = [
        PaginationStyle::PageBased,
        PaginationStyle::OffsetBased,
        PaginationStyle::CursorBased,
    ];
}

impl fmt::Display for PaginationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PaginationStyle::PageBased => "page-based",
            PaginationStyle::OffsetBased => "offset-based",
            PaginationStyle::CursorBased => "cursor-based",
        };
        f.write_str(s)
    }
}

/// Recommendation when no convention is found.
pub const NO_PAGINATION_RECOMMENDATION: &str =
    "No standard pagination pattern detected. Check the response schema for links or metadata indicating pagination.";

/// One endpoint using one convention.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationPattern {
    /// The endpoint.
    pub endpoint: EndpointId,
    /// Detected style.
    #[serde(rename = "type")]
    pub style: PaginationStyle,
    /// Query parameters taking part in it.
    pub parameters: Vec<Parameter>,
}

/// Result of [`detect_pagination`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationReport {
    /// Detections in endpoint order.
    pub detected: Vec<PaginationPattern>,
    /// Advice for the first detected style.
    pub recommendations: Vec<String>,
}

/// Detects pagination on one endpoint, or on every GET endpoint when `id` is `None`.
pub fn detect_pagination(model: &ApiSpecModel, id: Option<&str>) -> AppResult<PaginationReport> {
    let endpoints: Vec<&Endpoint> = match id {
        Some(id) => vec![model
            .endpoint(id)
            .ok_or_else(|| AppError::EndpointNotFound(id.to_string()))?],
        None => model
            .endpoints
            .iter()
            .filter(|e| e.method == HttpMethod::Get)
            .collect(),
    };

    let mut detected = Vec::new();
    for endpoint in endpoints {
        let query: Vec<&Parameter> = endpoint.parameters_in(ParamLocation::Query).collect();
        let names: Vec<String> = query.iter().map(|p| p.name.to_lowercase()).collect();
        for style in PaginationStyle::ALL {
            if !style.triggers().iter().any(|t| names.iter().any(|n| n == t)) {
                continue;
            }
            detected.push(PaginationPattern {
                endpoint: endpoint.id.clone(),
                style,
                parameters: query
                    .iter()
                    .filter(|p| style.related().contains(&p.name.to_lowercase().as_str()))
                    .map(|p| (*p).clone())
                    .collect(),
            });
        }
    }

    let recommendation = detected
        .first()
        .map(|p| p.style.recommendation())
        .unwrap_or(NO_PAGINATION_RECOMMENDATION);
    tracing::debug!(detected = detected.len(), "Pagination analyzed");

    Ok(PaginationReport {
        detected,
        recommendations: vec![recommendation.to_string()],
    })
}
