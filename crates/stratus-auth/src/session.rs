//! The per-invocation session: one auth strategy, one HTTP client,
//! one token.

use std::sync::OnceLock;

use futures::future::BoxFuture;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Certificate, Request, Response};
use serde_json::{Value, json};
use tracing::{debug, warn};

use stratus_api::{ServiceKind, Transport};

use crate::catalog::ServiceCatalog;
use crate::error::{Error, Result};
use crate::options::{CloudOptions, Verify};

/// User agent sent with every request.
static USER_AGENT: &str = concat!("stratus/", env!("CARGO_PKG_VERSION"));

/// Header carrying the auth token.
static AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// The active authentication strategy. Exactly one per session.
#[derive(Debug, Clone)]
pub enum AuthStrategy {
    /// A pre-acquired token presented to the identity service.
    Token {
        /// Identity service URL.
        auth_url: String,
        /// The token.
        token: String,
    },
    /// Username/password authentication against the identity service.
    Password {
        /// Identity service URL.
        auth_url: String,
        /// User name.
        username: String,
        /// Password.
        password: String,
        /// Project to scope to, when given.
        project: Option<String>,
    },
    /// A pre-acquired token used directly against one fixed endpoint,
    /// bypassing the catalog entirely.
    TokenEndpoint {
        /// The fixed service endpoint.
        endpoint: String,
        /// The token.
        token: String,
    },
}

impl AuthStrategy {
    /// Select the strategy the options describe. Token+endpoint wins
    /// when both pieces are present, then token, then password.
    pub fn from_options(options: &CloudOptions) -> Result<Self> {
        if let (Some(endpoint), Some(token)) = (&options.service_url, &options.token) {
            debug!("using token+endpoint auth");
            return Ok(AuthStrategy::TokenEndpoint {
                endpoint: endpoint.clone(),
                token: token.clone(),
            });
        }
        if let (Some(auth_url), Some(token)) = (&options.auth_url, &options.token) {
            debug!("using token auth");
            return Ok(AuthStrategy::Token {
                auth_url: auth_url.clone(),
                token: token.clone(),
            });
        }
        if let (Some(auth_url), Some(username), Some(password)) =
            (&options.auth_url, &options.username, &options.password)
        {
            debug!("using password auth");
            return Ok(AuthStrategy::Password {
                auth_url: auth_url.clone(),
                username: username.clone(),
                password: password.clone(),
                project: options.project_name.clone(),
            });
        }
        Err(Error::IncompleteCredentials {
            reason: "need token+endpoint, token+auth-url, or username+password+auth-url"
                .to_string(),
        })
    }
}

/// State acquired by the one-shot authentication call.
#[derive(Debug)]
struct AuthState {
    token: Option<String>,
    catalog: ServiceCatalog,
}

/// An authenticated session, shared by every gateway of the process.
///
/// Built once from [`CloudOptions`] and immutable afterwards; token
/// acquisition happens at most once, on the first
/// [`Session::authenticate`] call.
#[derive(Debug)]
pub struct Session {
    http: reqwest::Client,
    strategy: AuthStrategy,
    endpoint_overrides: std::collections::HashMap<ServiceKind, String>,
    state: OnceLock<AuthState>,
}

impl Session {
    /// Build a session from options: pick the strategy and construct
    /// the HTTP client with the requested verification policy.
    pub fn new(options: &CloudOptions) -> Result<Self> {
        let strategy = AuthStrategy::from_options(options)?;
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        match &options.verify {
            Verify::Enabled => {}
            Verify::Disabled => {
                warn!("TLS certificate verification disabled");
                builder = builder.danger_accept_invalid_certs(true);
            }
            Verify::CaBundle(path) => {
                let pem = std::fs::read(path).map_err(|err| Error::CaBundle {
                    path: path.clone(),
                    reason: err.to_string(),
                })?;
                let cert = Certificate::from_pem(&pem).map_err(|err| Error::CaBundle {
                    path: path.clone(),
                    reason: err.to_string(),
                })?;
                builder = builder.add_root_certificate(cert);
            }
        }
        Ok(Self {
            http: builder.build()?,
            strategy,
            endpoint_overrides: options.endpoint_overrides.clone(),
            state: OnceLock::new(),
        })
    }

    /// The auth strategy in effect.
    #[must_use]
    pub fn strategy(&self) -> &AuthStrategy {
        &self.strategy
    }

    /// The identity service URL, when the strategy has one.
    #[must_use]
    pub fn auth_url(&self) -> Option<&str> {
        match &self.strategy {
            AuthStrategy::Token { auth_url, .. } | AuthStrategy::Password { auth_url, .. } => {
                Some(auth_url)
            }
            AuthStrategy::TokenEndpoint { .. } => None,
        }
    }

    /// The current token: the acquired one after authentication, else
    /// the pre-supplied one for the token flows.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        if let Some(token) = self.state.get().and_then(|state| state.token.as_deref()) {
            return Some(token);
        }
        match &self.strategy {
            AuthStrategy::Token { token, .. } | AuthStrategy::TokenEndpoint { token, .. } => {
                Some(token)
            }
            AuthStrategy::Password { .. } => None,
        }
    }

    /// Acquire a token and service catalog. Idempotent: the first call
    /// does the work, later calls return immediately.
    ///
    /// `identity_major` is the negotiated identity API major version
    /// and selects between the v2 (`/tokens`) and v3 (`/auth/tokens`)
    /// request shapes for the password flow.
    pub async fn authenticate(&self, identity_major: u64) -> Result<()> {
        if self.state.get().is_some() {
            return Ok(());
        }
        let state = match &self.strategy {
            AuthStrategy::Token { .. } | AuthStrategy::TokenEndpoint { .. } => AuthState {
                token: None,
                catalog: ServiceCatalog::default(),
            },
            AuthStrategy::Password {
                auth_url,
                username,
                password,
                project,
            } => match identity_major {
                2 => {
                    self.password_auth_v2(auth_url, username, password, project.as_deref())
                        .await?
                }
                3 => {
                    self.password_auth_v3(auth_url, username, password, project.as_deref())
                        .await?
                }
                major => return Err(Error::UnsupportedIdentityVersion { major }),
            },
        };
        let _ = self.state.set(state);
        Ok(())
    }

    /// The endpoint to use for a service: an explicit override wins,
    /// then the catalog, then the flow-specific fallback (the fixed
    /// endpoint for token+endpoint, the auth URL for identity).
    #[must_use]
    pub fn endpoint_for(&self, service: ServiceKind) -> Option<String> {
        if let Some(url) = self.endpoint_overrides.get(&service) {
            return Some(url.clone());
        }
        if let Some(url) = self
            .state
            .get()
            .and_then(|state| state.catalog.url_for(service))
        {
            return Some(url.to_string());
        }
        match &self.strategy {
            AuthStrategy::TokenEndpoint { endpoint, .. } => Some(endpoint.clone()),
            _ if service == ServiceKind::Identity => self.auth_url().map(str::to_string),
            _ => None,
        }
    }

    /// v2 password flow: `POST {auth_url}/tokens`, token and catalog
    /// in the body.
    async fn password_auth_v2(
        &self,
        auth_url: &str,
        username: &str,
        password: &str,
        project: Option<&str>,
    ) -> Result<AuthState> {
        let mut credentials = json!({
            "auth": {
                "passwordCredentials": {
                    "username": username,
                    "password": password,
                }
            }
        });
        if let Some(project) = project {
            credentials["auth"]["tenantName"] = json!(project);
        }
        let url = format!("{}/tokens", auth_url.trim_end_matches('/'));
        debug!(%url, "requesting v2 token");
        let response = self.http.post(&url).json(&credentials).send().await?;
        if !response.status().is_success() {
            return Err(Error::AuthFailed {
                status: response.status().as_u16(),
            });
        }
        let body: Value = response.json().await.map_err(|err| Error::InvalidAuthResponse {
            reason: err.to_string(),
        })?;
        let token = body["access"]["token"]["id"]
            .as_str()
            .ok_or_else(|| Error::InvalidAuthResponse {
                reason: "missing access.token.id".to_string(),
            })?
            .to_string();
        let catalog = ServiceCatalog::from_v2(&body["access"]["serviceCatalog"]);
        Ok(AuthState {
            token: Some(token),
            catalog,
        })
    }

    /// v3 password flow: `POST {auth_url}/auth/tokens`, token in the
    /// `X-Subject-Token` header, catalog in the body.
    async fn password_auth_v3(
        &self,
        auth_url: &str,
        username: &str,
        password: &str,
        project: Option<&str>,
    ) -> Result<AuthState> {
        let mut credentials = json!({
            "auth": {
                "identity": {
                    "methods": ["password"],
                    "password": {
                        "user": {
                            "name": username,
                            "domain": {"id": "default"},
                            "password": password,
                        }
                    }
                }
            }
        });
        if let Some(project) = project {
            credentials["auth"]["scope"] = json!({
                "project": {"name": project, "domain": {"id": "default"}}
            });
        }
        let url = format!("{}/auth/tokens", auth_url.trim_end_matches('/'));
        debug!(%url, "requesting v3 token");
        let response = self.http.post(&url).json(&credentials).send().await?;
        if !response.status().is_success() {
            return Err(Error::AuthFailed {
                status: response.status().as_u16(),
            });
        }
        let token = response
            .headers()
            .get("X-Subject-Token")
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| Error::InvalidAuthResponse {
                reason: "missing X-Subject-Token header".to_string(),
            })?
            .to_string();
        let body: Value = response.json().await.map_err(|err| Error::InvalidAuthResponse {
            reason: err.to_string(),
        })?;
        let catalog = ServiceCatalog::from_v3(&body["token"]["catalog"]);
        Ok(AuthState {
            token: Some(token),
            catalog,
        })
    }
}

impl Transport for Session {
    fn http(&self) -> &reqwest::Client {
        &self.http
    }

    fn send(&self, mut request: Request) -> BoxFuture<'_, reqwest::Result<Response>> {
        if let Some(token) = self.token() {
            match HeaderValue::from_str(token) {
                Ok(value) => {
                    request.headers_mut().insert(AUTH_TOKEN_HEADER, value);
                }
                Err(_) => warn!("token is not a valid header value; sending unauthenticated"),
            }
        }
        if request.headers().get(CONTENT_TYPE).is_none() && request.body().is_some() {
            request
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        Box::pin(self.http.execute(request))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn password_options(auth_url: &str) -> CloudOptions {
        CloudOptions {
            auth_url: Some(auth_url.to_string()),
            username: Some("admin".to_string()),
            password: Some("secret".to_string()),
            project_name: Some("demo".to_string()),
            ..CloudOptions::default()
        }
    }

    #[test]
    fn token_endpoint_wins_over_other_strategies() {
        let options = CloudOptions {
            auth_url: Some("http://keystone:5000".to_string()),
            token: Some("tok".to_string()),
            service_url: Some("http://swift:8080/v1/acct".to_string()),
            username: Some("admin".to_string()),
            password: Some("secret".to_string()),
            ..CloudOptions::default()
        };
        let strategy = AuthStrategy::from_options(&options).unwrap();
        assert!(matches!(strategy, AuthStrategy::TokenEndpoint { .. }));
    }

    #[test]
    fn token_beats_password() {
        let options = CloudOptions {
            auth_url: Some("http://keystone:5000".to_string()),
            token: Some("tok".to_string()),
            username: Some("admin".to_string()),
            password: Some("secret".to_string()),
            ..CloudOptions::default()
        };
        let strategy = AuthStrategy::from_options(&options).unwrap();
        assert!(matches!(strategy, AuthStrategy::Token { .. }));
    }

    #[test]
    fn no_credentials_is_an_error() {
        let err = AuthStrategy::from_options(&CloudOptions::default()).unwrap_err();
        assert!(matches!(err, Error::IncompleteCredentials { .. }));
    }

    #[tokio::test]
    async fn v2_password_auth_parses_token_and_catalog() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2.0/tokens"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access": {
                    "token": {"id": "tok-123"},
                    "serviceCatalog": [
                        {"type": "compute",
                         "endpoints": [{"publicURL": "http://nova:8774/v2"}]},
                    ]
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let auth_url = format!("{}/v2.0", server.uri());
        let session = Session::new(&password_options(&auth_url)).unwrap();
        session.authenticate(2).await.unwrap();
        assert_eq!(session.token(), Some("tok-123"));
        assert_eq!(
            session.endpoint_for(ServiceKind::Compute),
            Some("http://nova:8774/v2".to_string())
        );

        // Second call is a no-op; the mock expects exactly one request.
        session.authenticate(2).await.unwrap();
    }

    #[tokio::test]
    async fn v3_password_auth_reads_the_subject_token_header() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/tokens"))
            .respond_with(
                ResponseTemplate::new(201)
                    .insert_header("X-Subject-Token", "tok-v3")
                    .set_body_json(json!({
                        "token": {"catalog": [
                            {"type": "network", "endpoints": [
                                {"interface": "public", "url": "http://neutron:9696"},
                            ]},
                        ]}
                    })),
            )
            .mount(&server)
            .await;

        let session = Session::new(&password_options(&server.uri())).unwrap();
        session.authenticate(3).await.unwrap();
        assert_eq!(session.token(), Some("tok-v3"));
        assert_eq!(
            session.endpoint_for(ServiceKind::Network),
            Some("http://neutron:9696".to_string())
        );
    }

    #[tokio::test]
    async fn rejected_credentials_surface_the_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/tokens"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let session = Session::new(&password_options(&server.uri())).unwrap();
        let err = session.authenticate(2).await.unwrap_err();
        assert!(matches!(err, Error::AuthFailed { status: 401 }));
    }

    #[tokio::test]
    async fn unsupported_identity_major_is_an_error() {
        let session = Session::new(&password_options("http://keystone:5000")).unwrap();
        let err = session.authenticate(4).await.unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedIdentityVersion { major: 4 }
        ));
    }

    #[test]
    fn endpoint_override_wins_over_fallbacks() {
        let mut options = CloudOptions {
            service_url: Some("http://fixed:8080/v1".to_string()),
            token: Some("tok".to_string()),
            ..CloudOptions::default()
        };
        options
            .endpoint_overrides
            .insert(ServiceKind::ObjectStore, "http://other:8080/v1".to_string());
        let session = Session::new(&options).unwrap();
        assert_eq!(
            session.endpoint_for(ServiceKind::ObjectStore),
            Some("http://other:8080/v1".to_string())
        );
        // Unlisted services fall back to the fixed endpoint.
        assert_eq!(
            session.endpoint_for(ServiceKind::Volume),
            Some("http://fixed:8080/v1".to_string())
        );
    }

    #[tokio::test]
    async fn transport_injects_the_auth_token_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/ping"))
            .and(header("X-Auth-Token", "tok"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let options = CloudOptions {
            service_url: Some(format!("{}/v1", server.uri())),
            token: Some("tok".to_string()),
            ..CloudOptions::default()
        };
        let session = Session::new(&options).unwrap();
        let request = session
            .http()
            .get(format!("{}/v1/ping", server.uri()))
            .build()
            .unwrap();
        let response = session.send(request).await.unwrap();
        assert_eq!(response.status(), 204);
    }
}
