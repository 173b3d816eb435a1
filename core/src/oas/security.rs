#![deny(missing_docs)]

//! # Security Classification
//!
//! Maps `components.securitySchemes` declarations onto [`SecurityRequirement`]
//! variants and resolves security requirement lists (OR of ANDs) into
//! [`SecurityAlternative`]s.
//!
//! Unknown scheme names and unsupported scheme types never fail a run: they
//! become `None` requirements carrying a note, plus a diagnostic.

use crate::error::AppError;
use crate::oas::models::{
    ApiKeyLocation, Diagnostic, DiagnosticKind, OAuthFlow, OAuthFlowKind, SecurityAlternative,
    SecurityRequirement, NO_AUTH_INSTRUCTION,
};
use crate::oas::resolver::SchemaResolver;
use indexmap::IndexMap;
use serde_json::Value;

/// A scheme declaration, read once, before scopes are known.
#[derive(Debug, Clone, PartialEq)]
enum DeclaredScheme {
    ApiKey {
        name: String,
        location: ApiKeyLocation,
        description: Option<String>,
    },
    Http {
        scheme: String,
        bearer_format: Option<String>,
        description: Option<String>,
    },
    OAuth2 {
        flows: Vec<OAuthFlow>,
        description: Option<String>,
    },
    OpenIdConnect {
        url: String,
        description: Option<String>,
    },
    Unsupported {
        note: String,
    },
}

/// Classifies security schemes and requirement lists for one document.
#[derive(Debug, Clone, Default)]
pub struct SecurityClassifier {
    schemes: IndexMap<String, DeclaredScheme>,
    diagnostics: Vec<Diagnostic>,
}

impl SecurityClassifier {
    /// Reads every declaration of `components.securitySchemes`, following `$ref`s.
    ///
    /// A declaration whose `$ref` cannot be followed is kept as unsupported,
    /// so requirements naming it degrade to `None` instead of failing the run.
    pub fn new<'a>(security_schemes: Option<&'a Value>, resolver: &mut SchemaResolver<'a>) -> Self {
        let mut classifier = Self::default();
        let Some(Value::Object(declared)) = security_schemes else {
            return classifier;
        };
        for (name, raw) in declared {
            let location = format!("#/components/securitySchemes/{}", name);
            let declaration = match resolver.follow(raw, &location) {
                Ok(Some((scheme, _))) => read_declaration(scheme),
                Ok(None) => DeclaredScheme::Unsupported {
                    note: "scheme reference could not be resolved".to_string(),
                },
                Err(err) => {
                    let note = err.to_string();
                    tracing::warn!("Security scheme {} is unusable: {}", name, note);
                    classifier.record(DiagnosticKind::UnknownSecurityScheme, location, note.clone());
                    DeclaredScheme::Unsupported { note }
                }
            };
            classifier.schemes.insert(name.clone(), declaration);
        }
        tracing::debug!(count = classifier.schemes.len(), "Security schemes read");
        classifier
    }

    /// Builds the requirement for one scheme name with the given scopes.
    pub fn classify(&mut self, name: &str, scopes: &[String]) -> SecurityRequirement {
        let declared = match self.schemes.get(name) {
            Some(DeclaredScheme::Unsupported { note }) => Err(note.clone()),
            Some(declared) => Ok(declared.clone()),
            None => Err("scheme is not declared in components.securitySchemes".to_string()),
        };
        match declared {
            Ok(declared) => build_requirement(name, declared, scopes),
            Err(note) => self.unknown(name, note),
        }
    }

    /// Resolves a raw requirement list (`[{scheme: [scopes]}, ...]`).
    ///
    /// Each list element is one alternative; an empty element `{}` is an
    /// alternative needing no credentials.
    pub fn resolve_requirements(&mut self, requirements: &[Value]) -> Vec<SecurityAlternative> {
        let mut alternatives = Vec::with_capacity(requirements.len());
        for entry in requirements {
            let Value::Object(schemes) = entry else {
                self.record(
                    DiagnosticKind::Coercion,
                    "security",
                    "security requirement entry is not an object; skipped",
                );
                continue;
            };
            if schemes.is_empty() {
                alternatives.push(SecurityAlternative::unauthenticated());
                continue;
            }
            let requirements = schemes
                .iter()
                .map(|(name, scopes)| {
                    let scopes: Vec<String> = scopes
                        .as_array()
                        .map(|s| s.iter().filter_map(Value::as_str).map(str::to_string).collect())
                        .unwrap_or_default();
                    self.classify(name, &scopes)
                })
                .collect();
            alternatives.push(SecurityAlternative { requirements });
        }
        alternatives
    }

    /// The security that applies to an operation.
    ///
    /// Absent `security` inherits `default`; an explicit empty array means
    /// "no authentication" regardless of the default.
    pub fn effective_security(
        &mut self,
        operation_security: Option<&Value>,
        default: &[SecurityAlternative],
    ) -> Vec<SecurityAlternative> {
        match operation_security {
            None | Some(Value::Null) => default.to_vec(),
            Some(Value::Array(entries)) if entries.is_empty() => {
                vec![SecurityAlternative::unauthenticated()]
            }
            Some(Value::Array(entries)) => self.resolve_requirements(entries),
            Some(_) => {
                self.record(
                    DiagnosticKind::Coercion,
                    "security",
                    "operation security is not an array; inheriting the document default",
                );
                default.to_vec()
            }
        }
    }

    /// Drains the collected findings.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    fn unknown(&mut self, name: &str, note: String) -> SecurityRequirement {
        let err = AppError::UnknownSecurityScheme {
            scheme: name.to_string(),
            note: note.clone(),
        };
        tracing::warn!("{}", err);
        self.record(
            DiagnosticKind::UnknownSecurityScheme,
            format!("#/components/securitySchemes/{}", name),
            err.to_string(),
        );
        SecurityRequirement::None {
            scheme_name: Some(name.to_string()),
            note: Some(note),
            instruction: NO_AUTH_INSTRUCTION.to_string(),
        }
    }

    fn record(&mut self, kind: DiagnosticKind, location: impl Into<String>, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::new(kind, location, message));
    }
}

fn read_declaration(scheme: &Value) -> DeclaredScheme {
    let text = |key: &str| scheme.get(key).and_then(Value::as_str).map(str::to_string);
    let description = text("description");
    match scheme.get("type").and_then(Value::as_str) {
        Some("apiKey") => {
            let location = text("in")
                .as_deref()
                .and_then(ApiKeyLocation::from_keyword);
            match (text("name"), location) {
                (Some(name), Some(location)) => DeclaredScheme::ApiKey {
                    name,
                    location,
                    description,
                },
                _ => DeclaredScheme::Unsupported {
                    note: "apiKey scheme lacks a valid 'name' or 'in'".to_string(),
                },
            }
        }
        Some("http") => DeclaredScheme::Http {
            scheme: text("scheme")
                .map(|s| s.to_ascii_lowercase())
                .unwrap_or_else(|| "bearer".to_string()),
            bearer_format: text("bearerFormat"),
            description,
        },
        Some("oauth2") => DeclaredScheme::OAuth2 {
            flows: read_flows(scheme.get("flows")),
            description,
        },
        Some("openIdConnect") => DeclaredScheme::OpenIdConnect {
            url: text("openIdConnectUrl").unwrap_or_default(),
            description,
        },
        Some("mutualTLS") => DeclaredScheme::Unsupported {
            note: "mutualTLS is negotiated by the TLS layer, not sent with the request".to_string(),
        },
        Some(other) => DeclaredScheme::Unsupported {
            note: format!("unsupported scheme type '{}'", other),
        },
        None => DeclaredScheme::Unsupported {
            note: "scheme declares no type".to_string(),
        },
    }
}

fn read_flows(raw: Option<&Value>) -> Vec<OAuthFlow> {
    let Some(flows) = raw else {
        return Vec::new();
    };
    OAuthFlowKind::ALL
        .iter()
        .filter_map(|kind| {
            let flow = flows.get(kind.key())?;
            let url = |key: &str| flow.get(key).and_then(Value::as_str).map(str::to_string);
            Some(OAuthFlow {
                kind: *kind,
                authorization_url: url("authorizationUrl"),
                token_url: url("tokenUrl"),
                refresh_url: url("refreshUrl"),
                available_scopes: flow
                    .get("scopes")
                    .and_then(Value::as_object)
                    .map(|s| s.keys().cloned().collect())
                    .unwrap_or_default(),
            })
        })
        .collect()
}

fn build_requirement(name: &str, declared: DeclaredScheme, scopes: &[String]) -> SecurityRequirement {
    let scheme_name = name.to_string();
    match declared {
        DeclaredScheme::ApiKey {
            name,
            location,
            description,
        } => {
            let instruction = format!("Send the API key as {} '{}'", location_phrase(location), name);
            SecurityRequirement::ApiKey {
                scheme_name,
                name,
                location,
                description,
                instruction,
            }
        }
        DeclaredScheme::Http {
            scheme,
            bearer_format,
            description,
        } => {
            let instruction = match scheme.as_str() {
                "bearer" => {
                    let mut text =
                        "Include bearer token in Authorization header: \"Bearer <token>\"".to_string();
                    if let Some(format) = &bearer_format {
                        text.push_str(&format!(" ({} token)", format));
                    }
                    text
                }
                "basic" => "Include basic auth in Authorization header: \"Basic <base64(username:password)>\""
                    .to_string(),
                other => format!("Use HTTP {} authentication", other),
            };
            SecurityRequirement::Http {
                scheme_name,
                scheme,
                bearer_format,
                description,
                instruction,
            }
        }
        DeclaredScheme::OAuth2 { flows, description } => {
            let instruction = oauth_instruction(&flows, scopes);
            SecurityRequirement::OAuth2 {
                scheme_name,
                flows,
                scopes: scopes.to_vec(),
                description,
                instruction,
            }
        }
        DeclaredScheme::OpenIdConnect { url, description } => {
            let mut instruction = "OpenID Connect authentication required".to_string();
            if !url.is_empty() {
                instruction.push_str(&format!(" (discovery document: {})", url));
            }
            if !scopes.is_empty() {
                instruction.push_str(&format!(". Scopes: {}", scopes.join(", ")));
            }
            SecurityRequirement::OpenIdConnect {
                scheme_name,
                url,
                scopes: scopes.to_vec(),
                description,
                instruction,
            }
        }
        DeclaredScheme::Unsupported { note } => SecurityRequirement::None {
            scheme_name: Some(scheme_name),
            note: Some(note),
            instruction: NO_AUTH_INSTRUCTION.to_string(),
        },
    }
}

fn location_phrase(location: ApiKeyLocation) -> &'static str {
    match location {
        ApiKeyLocation::Header => "header",
        ApiKeyLocation::Query => "query parameter",
        ApiKeyLocation::Cookie => "cookie",
    }
}

fn oauth_instruction(flows: &[OAuthFlow], scopes: &[String]) -> String {
    let mut text = "OAuth2 authentication required".to_string();
    let described: Vec<String> = flows
        .iter()
        .map(|flow| match flow.token_url.as_ref().or(flow.authorization_url.as_ref()) {
            Some(url) => format!("{} via {}", flow.kind.key(), url),
            None => flow.kind.key().to_string(),
        })
        .collect();
    if !described.is_empty() {
        text.push_str(&format!(" ({})", described.join("; ")));
    }
    if !scopes.is_empty() {
        text.push_str(&format!(". Scopes: {}", scopes.join(", ")));
    }
    text
}
