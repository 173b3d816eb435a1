#![deny(missing_docs)]

//! # Security Models
//!
//! Closed set of authentication requirements an endpoint may demand.

use serde::Serialize;
use std::fmt;

/// Tag-only projection of [`SecurityRequirement`], used for summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SecurityType {
    /// API key in header, query or cookie.
    #[serde(rename = "apiKey")]
    ApiKey,
    /// HTTP authentication scheme (basic, bearer, ...).
    #[serde(rename = "http")]
    Http,
    /// OAuth2 flows.
    #[serde(rename = "oauth2")]
    OAuth2,
    /// OpenID Connect discovery.
    #[serde(rename = "openIdConnect")]
    OpenIdConnect,
    /// No authentication.
    #[serde(rename = "none")]
    None,
}

impl fmt::Display for SecurityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SecurityType::ApiKey => "apiKey",
            SecurityType::Http => "http",
            SecurityType::OAuth2 => "oauth2",
            SecurityType::OpenIdConnect => "openIdConnect",
            SecurityType::None => "none",
        };
        f.write_str(s)
    }
}

/// Where an API key is transmitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiKeyLocation {
    /// Request header.
    Header,
    /// Query string.
    Query,
    /// Cookie.
    Cookie,
}

impl ApiKeyLocation {
    /// Parses the `in` keyword of an apiKey scheme.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "header" => Some(Self::Header),
            "query" => Some(Self::Query),
            "cookie" => Some(Self::Cookie),
            _ => None,
        }
    }
}

impl fmt::Display for ApiKeyLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ApiKeyLocation::Header => "header",
            ApiKeyLocation::Query => "query",
            ApiKeyLocation::Cookie => "cookie",
        };
        f.write_str(s)
    }
}

/// OAuth2 grant type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OAuthFlowKind {
    /// Implicit grant.
    Implicit,
    /// Resource owner password grant.
    Password,
    /// Client credentials grant.
    ClientCredentials,
    /// Authorization code grant.
    AuthorizationCode,
}

impl OAuthFlowKind {
    /// Flow keys in the order they are reported.
    pub const ALL: [OAuthFlowKind; 4] = [
        OAuthFlowKind::Implicit,
        OAuthFlowKind::Password,
        OAuthFlowKind::ClientCredentials,
        OAuthFlowKind::AuthorizationCode,
    ];

    /// The key used in the `flows` object.
    pub fn key(&self) -> &'static str {
        match self {
            OAuthFlowKind::Implicit => "implicit",
            OAuthFlowKind::Password => "password",
            OAuthFlowKind::ClientCredentials => "clientCredentials",
            OAuthFlowKind::AuthorizationCode => "authorizationCode",
        }
    }
}

/// One declared OAuth2 flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthFlow {
    /// Grant type.
    #[serde(rename = "type")]
    pub kind: OAuthFlowKind,
    /// Authorization endpoint (implicit, authorizationCode).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_url: Option<String>,
    /// Token endpoint (password, clientCredentials, authorizationCode).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_url: Option<String>,
    /// Refresh endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_url: Option<String>,
    /// Scopes the flow offers.
    pub available_scopes: Vec<String>,
}

/// A single authentication method and what is needed to apply it.
///
/// Each variant only carries the fields meaningful for its kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum SecurityRequirement {
    /// API key authentication.
    #[serde(rename = "apiKey")]
    ApiKey {
        /// Name of the scheme in `components.securitySchemes`.
        scheme_name: String,
        /// Header / query / cookie name carrying the key.
        name: String,
        /// Where the key is sent.
        location: ApiKeyLocation,
        /// Scheme description.
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        /// How to authenticate.
        instruction: String,
    },
    /// HTTP authentication (`Authorization` header).
    #[serde(rename = "http")]
    Http {
        /// Name of the scheme in `components.securitySchemes`.
        scheme_name: String,
        /// HTTP scheme, lower-cased (`bearer`, `basic`, `digest`, ...).
        scheme: String,
        /// Bearer token format hint (e.g. `JWT`).
        #[serde(skip_serializing_if = "Option::is_none")]
        bearer_format: Option<String>,
        /// Scheme description.
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        /// How to authenticate.
        instruction: String,
    },
    /// OAuth2.
    #[serde(rename = "oauth2")]
    OAuth2 {
        /// Name of the scheme in `components.securitySchemes`.
        scheme_name: String,
        /// Declared flows.
        flows: Vec<OAuthFlow>,
        /// Scopes required by this requirement.
        scopes: Vec<String>,
        /// Scheme description.
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        /// How to authenticate.
        instruction: String,
    },
    /// OpenID Connect.
    #[serde(rename = "openIdConnect")]
    OpenIdConnect {
        /// Name of the scheme in `components.securitySchemes`.
        scheme_name: String,
        /// Discovery document URL.
        url: String,
        /// Scopes required by this requirement.
        scopes: Vec<String>,
        /// Scheme description.
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        /// How to authenticate.
        instruction: String,
    },
    /// No authentication (explicitly unauthenticated, optional auth, or an unclassifiable scheme).
    #[serde(rename = "none")]
    None {
        /// Scheme this stands in for, if any.
        #[serde(skip_serializing_if = "Option::is_none")]
        scheme_name: Option<String>,
        /// Why this was classified as none.
        #[serde(skip_serializing_if = "Option::is_none")]
        note: Option<String>,
        /// How to authenticate.
        instruction: String,
    },
}

/// Instruction used for unauthenticated requirements.
pub const NO_AUTH_INSTRUCTION: &str = "No authentication required";

impl SecurityRequirement {
    /// A plain unauthenticated requirement.
    pub fn unauthenticated() -> Self {
        SecurityRequirement::None {
            scheme_name: None,
            note: None,
            instruction: NO_AUTH_INSTRUCTION.to_string(),
        }
    }

    /// The variant tag.
    pub fn security_type(&self) -> SecurityType {
        match self {
            SecurityRequirement::ApiKey { .. } => SecurityType::ApiKey,
            SecurityRequirement::Http { .. } => SecurityType::Http,
            SecurityRequirement::OAuth2 { .. } => SecurityType::OAuth2,
            SecurityRequirement::OpenIdConnect { .. } => SecurityType::OpenIdConnect,
            SecurityRequirement::None { .. } => SecurityType::None,
        }
    }

    /// The human-readable instruction.
    pub fn instruction(&self) -> &str {
        match self {
            SecurityRequirement::ApiKey { instruction, .. }
            | SecurityRequirement::Http { instruction, .. }
            | SecurityRequirement::OAuth2 { instruction, .. }
            | SecurityRequirement::OpenIdConnect { instruction, .. }
            | SecurityRequirement::None { instruction, .. } => instruction,
        }
    }

    /// The scheme name this requirement was derived from.
    pub fn scheme_name(&self) -> Option<&str> {
        match self {
            SecurityRequirement::ApiKey { scheme_name, .. }
            | SecurityRequirement::Http { scheme_name, .. }
            | SecurityRequirement::OAuth2 { scheme_name, .. }
            | SecurityRequirement::OpenIdConnect { scheme_name, .. } => Some(scheme_name),
            SecurityRequirement::None { scheme_name, .. } => scheme_name.as_deref(),
        }
    }

    /// True for the `None` variant.
    pub fn is_none(&self) -> bool {
        matches!(self, SecurityRequirement::None { .. })
    }
}

/// One satisfiable option of a security requirement list.
///
/// All requirements inside an alternative must be satisfied together;
/// any one alternative of a list suffices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityAlternative {
    /// Requirements combined with AND.
    pub requirements: Vec<SecurityRequirement>,
}

impl SecurityAlternative {
    /// An alternative that needs no credentials.
    pub fn unauthenticated() -> Self {
        Self {
            requirements: vec![SecurityRequirement::unauthenticated()],
        }
    }

    /// True when nothing in this alternative demands credentials.
    pub fn is_anonymous(&self) -> bool {
        self.requirements.iter().all(SecurityRequirement::is_none)
    }
}
