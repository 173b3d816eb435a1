#![deny(missing_docs)]

//! # OpenAPI Document Normalization
//!
//! Runs the whole engine over one raw document:
//! schemas -> security -> endpoints -> summary, producing an [`ApiSpecModel`].
//!
//! A run either fully succeeds or returns the first fatal error; no partial
//! model is ever produced.

use crate::config::NormalizeOptions;
use crate::error::{AppError, AppResult};
use crate::oas::models::{ApiSpecModel, Contact, Server};
use crate::oas::pointer::{DocumentPointerResolver, PointerResolver, RawDocument};
use crate::oas::ref_utils::escape_pointer_segment;
use crate::oas::resolver::SchemaResolver;
use crate::oas::routes::builder::{read_servers, EndpointContext};
use crate::oas::routes::collect_endpoints;
use crate::oas::security::SecurityClassifier;
use crate::summary::{group_by_tag, summarize};
use indexmap::IndexMap;
use serde_json::Value;

/// Normalizes a document whose references are all local to it.
pub fn normalize(raw: &RawDocument, options: &NormalizeOptions) -> AppResult<ApiSpecModel> {
    let pointers = DocumentPointerResolver::new(raw);
    normalize_document(raw, &pointers, options)
}

/// Normalizes `raw`, looking `$ref` targets up through `pointers`.
pub fn normalize_document<'a>(
    raw: &'a RawDocument,
    pointers: &'a dyn PointerResolver,
    options: &'a NormalizeOptions,
) -> AppResult<ApiSpecModel> {
    let Value::Object(root) = raw else {
        return Err(AppError::InvalidDocument(
            "document root must be a mapping".to_string(),
        ));
    };
    check_version(root.get("openapi"), root.get("swagger"))?;
    let Some(info) = root.get("info").filter(|i| i.is_object()) else {
        return Err(AppError::InvalidDocument(
            "missing 'info' object".to_string(),
        ));
    };

    let mut resolver = SchemaResolver::new(pointers, options);

    let mut schemas = IndexMap::new();
    if let Some(Value::Object(declared)) = raw.pointer("/components/schemas") {
        for name in declared.keys() {
            let pointer = format!("#/components/schemas/{}", escape_pointer_segment(name));
            let node = resolver.resolve_pointer(&pointer)?;
            schemas.insert(name.clone(), node);
        }
    }

    let mut classifier =
        SecurityClassifier::new(raw.pointer("/components/securitySchemes"), &mut resolver);
    let default_security = match root.get("security") {
        Some(Value::Array(entries)) => classifier.resolve_requirements(entries),
        _ => Vec::new(),
    };

    let endpoints = {
        let mut ctx = EndpointContext {
            resolver: &mut resolver,
            classifier: &mut classifier,
            default_security: &default_security,
        };
        collect_endpoints(&mut ctx, root.get("paths"))?
    };

    let mut servers = read_servers(root.get("servers"));
    if servers.is_empty() {
        servers.push(Server {
            url: options.default_server_url.clone(),
            description: Some("Default server (none declared)".to_string()),
            variables: IndexMap::new(),
        });
    }

    let declared_tags: Vec<(String, Option<String>)> = root
        .get("tags")
        .and_then(Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter_map(|tag| {
                    let name = tag.get("name").and_then(Value::as_str)?;
                    let description = tag
                        .get("description")
                        .and_then(Value::as_str)
                        .map(str::to_string);
                    Some((name.to_string(), description))
                })
                .collect()
        })
        .unwrap_or_default();

    let mut diagnostics = resolver.take_diagnostics();
    diagnostics.extend(classifier.take_diagnostics());

    let text = |key: &str| info.get(key).and_then(Value::as_str).map(str::to_string);
    let model = ApiSpecModel {
        title: text("title").unwrap_or_default(),
        version: text("version").unwrap_or_default(),
        description: text("description"),
        terms_of_service: text("termsOfService"),
        contact: info.get("contact").map(read_contact),
        servers,
        default_security,
        tags: group_by_tag(&declared_tags, &endpoints),
        summary: summarize(&endpoints),
        endpoints,
        schemas,
        diagnostics,
        options: options.clone(),
    };

    tracing::info!(
        title = %model.title,
        endpoints = model.endpoints.len(),
        schemas = model.schemas.len(),
        diagnostics = model.diagnostics.len(),
        "Document normalized"
    );
    Ok(model)
}

fn check_version(openapi: Option<&Value>, swagger: Option<&Value>) -> AppResult<()> {
    // Unquoted YAML versions such as `3.0` arrive as numbers.
    let version = openapi.map(|v| match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    });
    match (version.as_deref(), swagger) {
        (Some(version), _) if version.starts_with("3.") => Ok(()),
        (Some(version), _) => Err(AppError::InvalidDocument(format!(
            "Unsupported OpenAPI version: {}. Only 3.x is supported.",
            version
        ))),
        (None, Some(_)) => Err(AppError::InvalidDocument(
            "Swagger 2.0 documents are not supported; convert to OpenAPI 3.x first".to_string(),
        )),
        (None, None) => Err(AppError::InvalidDocument(
            "missing 'openapi' version field".to_string(),
        )),
    }
}

fn read_contact(raw: &Value) -> Contact {
    let text = |key: &str| raw.get(key).and_then(Value::as_str).map(str::to_string);
    Contact {
        name: text("name"),
        email: text("email"),
        url: text("url"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolutionMode;
    use crate::oas::models::{DiagnosticKind, SecurityType};

    fn parse(yaml: &str) -> Value {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_rejects_non_3x_and_missing_info() {
        let options = NormalizeOptions::default();
        let swagger = parse("swagger: '2.0'\ninfo: {title: t, version: '1'}\n");
        assert!(matches!(
            normalize(&swagger, &options),
            Err(AppError::InvalidDocument(_))
        ));
        let no_info = parse("openapi: 3.0.3\npaths: {}\n");
        assert!(matches!(
            normalize(&no_info, &options),
            Err(AppError::InvalidDocument(_))
        ));
        assert!(matches!(
            normalize(&Value::Null, &options),
            Err(AppError::InvalidDocument(_))
        ));
    }

    #[test]
    fn test_metadata_servers_and_default_security() {
        let raw = parse(
            r#"
openapi: 3.1.0
info:
  title: Pets
  version: 1.0.0
  contact:
    email: team@example.com
tags:
  - name: pets
    description: Everything about pets
security:
  - KeyAuth: []
components:
  securitySchemes:
    KeyAuth:
      type: apiKey
      in: header
      name: X-API-Key
paths:
  /pets:
    get:
      tags: [pets]
      responses:
        '200':
          description: OK
  /health:
    get:
      security: []
      responses:
        '200':
          description: OK
"#,
        );
        let model = normalize(&raw, &NormalizeOptions::default()).unwrap();
        assert_eq!(model.title, "Pets");
        assert_eq!(
            model.contact.as_ref().and_then(|c| c.email.as_deref()),
            Some("team@example.com")
        );
        assert_eq!(model.servers.len(), 1);
        assert_eq!(model.servers[0].url, "https://api.example.com");
        assert_eq!(model.default_security.len(), 1);

        let pets = model.endpoint("GET /pets").unwrap();
        assert!(pets.requires_auth());
        assert_eq!(model.endpoint("get  //pets/").map(|e| &e.id), Some(&pets.id));
        assert!(model.endpoint("FETCH /pets").is_none());
        assert!(model.endpoint("GET").is_none());
        let health = model.endpoint("GET /health").unwrap();
        assert!(!health.requires_auth());
        assert_eq!(
            model.summary.authentication_types,
            vec![SecurityType::ApiKey, SecurityType::None]
        );
        assert_eq!(model.tags[0].endpoints.len(), 1);
    }

    #[test]
    fn test_best_effort_collects_diagnostics() {
        let raw = parse(
            r#"
openapi: 3.0.0
info: {title: Broken, version: '0'}
components:
  schemas:
    User:
      type: object
      properties:
        org:
          $ref: '#/components/schemas/Missing'
paths:
  /me:
    get:
      security:
        - Undeclared: []
      responses:
        '200':
          description: OK
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/User'
"#,
        );
        let strict = NormalizeOptions::default();
        assert!(matches!(
            normalize(&raw, &strict),
            Err(AppError::ReferenceResolution { .. })
        ));

        let relaxed = NormalizeOptions {
            mode: ResolutionMode::BestEffort,
            ..NormalizeOptions::default()
        };
        let model = normalize(&raw, &relaxed).unwrap();
        let kinds: Vec<DiagnosticKind> = model.diagnostics.iter().map(|d| d.kind).collect();
        assert!(kinds.contains(&DiagnosticKind::Downgrade));
        assert!(kinds.contains(&DiagnosticKind::UnknownSecurityScheme));
    }

    #[test]
    fn test_dangling_security_scheme_ref_does_not_fail_strict_run() {
        let raw = parse(
            r#"
openapi: 3.0.0
info: {title: Keys, version: '1'}
security:
  - Key: []
components:
  securitySchemes:
    Key:
      $ref: '#/components/x-missing/Key'
paths:
  /items:
    get:
      responses:
        '200':
          description: OK
"#,
        );
        let model = normalize(&raw, &NormalizeOptions::default()).unwrap();
        let items = model.endpoint("GET /items").unwrap();
        let requirement = &items.security[0].requirements[0];
        assert!(requirement.is_none());
        assert_eq!(requirement.scheme_name(), Some("Key"));
        assert!(model
            .diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::UnknownSecurityScheme));
    }
}
