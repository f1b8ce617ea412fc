//! The pre-parsed options object the session is built from.
//!
//! The CLI layer parses flags and environment variables and fills this
//! in explicitly during startup; nothing here is populated by
//! import-order side effects, and the core never touches the argument
//! parser itself.

use std::collections::HashMap;
use std::path::PathBuf;

use stratus_api::ServiceKind;

/// TLS verification policy, in the form the HTTP client understands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Verify {
    /// Verify server certificates against the system roots.
    #[default]
    Enabled,
    /// Skip certificate verification entirely.
    Disabled,
    /// Verify against a specific CA bundle.
    CaBundle(PathBuf),
}

/// Environment-derived configuration consumed by the session layer.
///
/// Exactly one of the token+endpoint, token, or password credential
/// sets must be present; [`crate::Session::new`] picks the strategy.
#[derive(Debug, Clone, Default)]
pub struct CloudOptions {
    /// Identity service URL used for authentication and discovery.
    pub auth_url: Option<String>,
    /// User name for password authentication.
    pub username: Option<String>,
    /// Password for password authentication.
    pub password: Option<String>,
    /// Project to scope the token to.
    pub project_name: Option<String>,
    /// Pre-acquired token.
    pub token: Option<String>,
    /// Fixed service endpoint for the token+endpoint flow.
    pub service_url: Option<String>,
    /// Per-service endpoint overrides; these win over the catalog.
    pub endpoint_overrides: HashMap<ServiceKind, String>,
    /// Per-service requested API versions.
    pub version_overrides: HashMap<ServiceKind, String>,
    /// TLS verification policy.
    pub verify: Verify,
}

impl CloudOptions {
    /// Options with only an auth URL set.
    #[must_use]
    pub fn with_auth_url(auth_url: impl Into<String>) -> Self {
        Self {
            auth_url: Some(auth_url.into()),
            ..Self::default()
        }
    }

    /// The endpoint override for a service, if configured.
    #[must_use]
    pub fn endpoint_override(&self, service: ServiceKind) -> Option<&str> {
        self.endpoint_overrides.get(&service).map(String::as_str)
    }

    /// The requested API version for a service, if configured.
    #[must_use]
    pub fn version_override(&self, service: ServiceKind) -> Option<&str> {
        self.version_overrides.get(&service).map(String::as_str)
    }
}
