//! The authenticated low-level request funnel.
//!
//! Every API call goes through [`Gateway::request`] so there is one
//! place that resolves the effective session, finalizes the URL against
//! the bound endpoint prefix, and logs the outgoing request.

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::{Method, Request, Response, Url};
use tracing::{debug, trace};

use crate::error::{Error, Result};

/// The transport a session exposes to the request layer.
///
/// Implementations apply whatever credentials the session holds (a
/// bearer token header) before handing the request to the HTTP client.
pub trait Transport: Send + Sync + fmt::Debug {
    /// The HTTP client requests are built with.
    fn http(&self) -> &reqwest::Client;

    /// Send a prepared request, injecting session credentials.
    fn send(&self, request: Request) -> BoxFuture<'_, reqwest::Result<Response>>;
}

/// Options carried alongside a single request.
#[derive(Default)]
pub struct RequestOptions {
    /// Session override; takes precedence over the gateway's bound
    /// session for this one request.
    pub session: Option<Arc<dyn Transport>>,
    /// Query string parameters.
    pub query: Vec<(String, String)>,
    /// JSON request body.
    pub json: Option<serde_json::Value>,
    /// Extra headers.
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    /// Empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Set the JSON body.
    #[must_use]
    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.json = Some(body);
        self
    }

    /// Add a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

impl fmt::Debug for RequestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestOptions")
            .field("session", &self.session.is_some())
            .field("query", &self.query)
            .field("json", &self.json.is_some())
            .field("headers", &self.headers)
            .finish()
    }
}

/// A request function bound to a session and an endpoint prefix.
#[derive(Debug, Clone, Default)]
pub struct Gateway {
    session: Option<Arc<dyn Transport>>,
    endpoint: Option<String>,
}

impl Gateway {
    /// An unbound gateway; a session must be bound or supplied per
    /// request before any call succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the default session.
    #[must_use]
    pub fn with_session(mut self, session: Arc<dyn Transport>) -> Self {
        self.session = Some(session);
        self
    }

    /// Bind the endpoint prefix all paths are joined against.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// The bound endpoint prefix, if any.
    #[must_use]
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// Issue a request and return the raw response.
    ///
    /// The effective session is the per-request override if supplied,
    /// else the bound default; with neither, this fails before any I/O.
    /// Status codes are not interpreted here; callers inspect the
    /// response themselves.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        opts: RequestOptions,
    ) -> Result<Response> {
        let session = opts
            .session
            .as_ref()
            .or(self.session.as_ref())
            .ok_or(Error::MissingSession)?;

        let target = self.join(path);
        let url = Url::parse(&target).map_err(|err| Error::InvalidUrl {
            url: target.clone(),
            reason: err.to_string(),
        })?;

        let mut builder = session.http().request(method, url);
        if !opts.query.is_empty() {
            builder = builder.query(&opts.query);
        }
        if let Some(body) = &opts.json {
            builder = builder.json(body);
        }
        for (name, value) in &opts.headers {
            builder = builder.header(name, value);
        }

        let request = builder.build()?;
        log_request(&request);
        let response = session.send(request).await?;
        trace!(status = %response.status(), "RESP");
        Ok(response)
    }

    /// Join the bound endpoint prefix with `path`: exactly one trailing
    /// slash is stripped from the prefix and one leading slash from the
    /// path, so the result has a single separator regardless of what
    /// callers pass. Without a bound endpoint, `path` is used as-is.
    fn join(&self, path: &str) -> String {
        match &self.endpoint {
            Some(endpoint) => {
                let prefix = endpoint.strip_suffix('/').unwrap_or(endpoint);
                let suffix = path.strip_prefix('/').unwrap_or(path);
                format!("{prefix}/{suffix}")
            }
            None => path.to_string(),
        }
    }
}

/// Log the outgoing request in curl form at debug level.
fn log_request(request: &Request) {
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return;
    }
    let mut parts = vec![
        "curl -i".to_string(),
        format!("-X '{}'", request.method()),
        format!("'{}'", request.url()),
    ];
    for (name, value) in request.headers() {
        parts.push(format!("-H '{}: {}'", name, value.to_str().unwrap_or("?")));
    }
    debug!("REQ: {}", parts.join(" "));
}
