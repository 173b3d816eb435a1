#![deny(missing_docs)]

//! # Summary Aggregation
//!
//! Pure reductions over an endpoint list: per-method counts, security kinds in
//! use, content types, distinct security configurations and the tag index.
//! Output depends only on the input order, never on hash iteration order.

use crate::oas::models::{AuthVariation, Endpoint, SecurityType, Summary, TagGroup};
use indexmap::{IndexMap, IndexSet};
use std::collections::BTreeSet;

/// Computes corpus statistics for `endpoints`.
pub fn summarize(endpoints: &[Endpoint]) -> Summary {
    let mut endpoints_by_method = IndexMap::new();
    let mut authentication_types = BTreeSet::new();
    let mut content_types: IndexSet<String> = IndexSet::new();

    for endpoint in endpoints {
        *endpoints_by_method.entry(endpoint.method).or_insert(0) += 1;

        for alternative in &endpoint.security {
            for requirement in &alternative.requirements {
                authentication_types.insert(requirement.security_type());
            }
        }

        if let Some(body) = &endpoint.request_body {
            content_types.extend(body.content_types.iter().cloned());
        }
        for response in &endpoint.responses {
            content_types.extend(response.content_types.iter().cloned());
        }
    }

    Summary {
        total_endpoints: endpoints.len(),
        endpoints_by_method,
        authentication_types: authentication_types.into_iter().collect::<Vec<SecurityType>>(),
        common_content_types: content_types.into_iter().collect(),
        auth_variations: auth_variations(endpoints),
    }
}

/// Distinct security configurations with the number of endpoints using each,
/// in first-use order.
pub fn auth_variations(endpoints: &[Endpoint]) -> Vec<AuthVariation> {
    let mut variations: Vec<AuthVariation> = Vec::new();
    for endpoint in endpoints {
        match variations
            .iter_mut()
            .find(|v| v.security == endpoint.security)
        {
            Some(existing) => existing.endpoint_count += 1,
            None => variations.push(AuthVariation {
                security: endpoint.security.clone(),
                endpoint_count: 1,
            }),
        }
    }
    variations
}

/// Groups endpoint identifiers by tag.
///
/// Document-level tags come first, in declaration order and with their
/// descriptions (even when no endpoint uses them); tags only found on
/// endpoints follow in first-use order. Untagged endpoints are not listed.
pub fn group_by_tag(declared: &[(String, Option<String>)], endpoints: &[Endpoint]) -> Vec<TagGroup> {
    let mut groups: IndexMap<&str, TagGroup> = declared
        .iter()
        .map(|(name, description)| {
            (
                name.as_str(),
                TagGroup {
                    name: name.clone(),
                    description: description.clone(),
                    endpoints: Vec::new(),
                },
            )
        })
        .collect();

    for endpoint in endpoints {
        for tag in &endpoint.tags {
            groups
                .entry(tag.as_str())
                .or_insert_with(|| TagGroup {
                    name: tag.clone(),
                    description: None,
                    endpoints: Vec::new(),
                })
                .endpoints
                .push(endpoint.id.clone());
        }
    }

    groups.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::models::{
        EndpointId, HttpMethod, RequestBody, Response, SchemaNode, SecurityAlternative,
        SecurityRequirement,
    };
    use pretty_assertions::assert_eq;

    fn endpoint(method: HttpMethod, path: &str, tags: &[&str]) -> Endpoint {
        Endpoint {
            id: EndpointId::new(method, path),
            method,
            path: path.to_string(),
            operation_id: None,
            summary: None,
            description: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            deprecated: false,
            security: Vec::new(),
            parameters: Vec::new(),
            request_body: None,
            responses: Vec::new(),
            servers: Vec::new(),
        }
    }

    fn bearer() -> SecurityAlternative {
        SecurityAlternative {
            requirements: vec![SecurityRequirement::Http {
                scheme_name: "Bearer".into(),
                scheme: "bearer".into(),
                bearer_format: None,
                description: None,
                instruction: "token".into(),
            }],
        }
    }

    #[test]
    fn test_summarize_counts_and_content_types() {
        let mut list = endpoint(HttpMethod::Get, "/pets", &[]);
        list.security = vec![bearer()];
        list.responses = vec![Response {
            status_code: "200".into(),
            description: "OK".into(),
            content_types: vec!["application/json".into()],
            schema: None,
            examples: Default::default(),
        }];
        let mut create = endpoint(HttpMethod::Post, "/pets", &[]);
        create.security = vec![SecurityAlternative::unauthenticated()];
        create.request_body = Some(RequestBody {
            required: true,
            content_types: vec!["application/xml".into(), "application/json".into()],
            schema: SchemaNode::any(),
            description: None,
            examples: Default::default(),
        });
        let get_one = endpoint(HttpMethod::Get, "/pets/{id}", &[]);

        let summary = summarize(&[list, create, get_one]);
        assert_eq!(summary.total_endpoints, 3);
        assert_eq!(summary.endpoints_by_method[&HttpMethod::Get], 2);
        assert_eq!(summary.endpoints_by_method[&HttpMethod::Post], 1);
        assert_eq!(
            summary.authentication_types,
            vec![SecurityType::Http, SecurityType::None]
        );
        assert_eq!(
            summary.common_content_types,
            vec!["application/json", "application/xml"]
        );
        assert_eq!(summary.auth_variations.len(), 3);
        assert!(summary.auth_variations.iter().all(|v| v.endpoint_count == 1));
    }

    #[test]
    fn test_auth_variations_group_equal_configurations() {
        let mut a = endpoint(HttpMethod::Get, "/a", &[]);
        a.security = vec![bearer()];
        let mut b = endpoint(HttpMethod::Get, "/b", &[]);
        b.security = vec![bearer()];
        let c = endpoint(HttpMethod::Get, "/c", &[]);

        let variations = auth_variations(&[a, b, c]);
        assert_eq!(variations.len(), 2);
        assert_eq!(variations[0].endpoint_count, 2);
        assert_eq!(variations[1].endpoint_count, 1);
        assert!(variations[1].security.is_empty());
    }

    #[test]
    fn test_group_by_tag_orders_declared_first() {
        let declared = vec![
            ("pets".to_string(), Some("Pet operations".to_string())),
            ("admin".to_string(), None),
        ];
        let endpoints = vec![
            endpoint(HttpMethod::Get, "/store", &["store"]),
            endpoint(HttpMethod::Get, "/pets", &["pets", "store"]),
            endpoint(HttpMethod::Get, "/health", &[]),
        ];
        let groups = group_by_tag(&declared, &endpoints);
        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["pets", "admin", "store"]);
        assert_eq!(groups[0].description.as_deref(), Some("Pet operations"));
        assert!(groups[1].endpoints.is_empty());
        assert_eq!(
            groups[2].endpoints,
            vec![
                EndpointId::new(HttpMethod::Get, "/store"),
                EndpointId::new(HttpMethod::Get, "/pets")
            ]
        );
    }
}
