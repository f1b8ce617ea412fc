//! Service-root probing for API version discovery.
//!
//! Services report the versions they expose at their root URL, but the
//! response shape varies: compute wraps the list as `{"versions":
//! [...]}`, identity wraps it once more as `{"versions": {"values":
//! [...]}}`, and a versioned endpoint reports just itself as
//! `{"version": {...}}`. All of them are normalized here into a flat
//! list of [`ApiVersion`] tags.

use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::service::ServiceKind;
use crate::version::{ApiVersion, DEFAULT_COMPONENT_COUNT, VersionLink};

/// A server-supplied version record. Fields the client does not
/// interpret land in `extra` instead of being mirrored blindly.
#[derive(Debug, Deserialize)]
struct VersionRecord {
    id: Option<String>,
    status: Option<String>,
    #[serde(default)]
    links: Vec<VersionLink>,
    #[serde(flatten)]
    extra: serde_json::Map<String, Value>,
}

/// Probes service roots for the API versions they advertise.
#[derive(Debug, Clone)]
pub struct Discovery {
    http: reqwest::Client,
    url_host_hack: bool,
}

impl Discovery {
    /// A discovery client using the given HTTP client (so the TLS
    /// verification policy of the session carries over).
    #[must_use]
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            url_host_hack: false,
        }
    }

    /// Rewrite discovered `localhost` self links to the probed host.
    ///
    /// Dev deployments self-report loopback addresses that are
    /// unreachable from the client; with this enabled, a discovered
    /// link whose host is exactly `localhost` gets the probed
    /// endpoint's host and port instead. Any other host is left alone.
    #[must_use]
    pub fn with_url_host_hack(mut self, enabled: bool) -> Self {
        self.url_host_hack = enabled;
        self
    }

    /// Probe a service root and return the versions it advertises.
    ///
    /// With `strict` false, a legacy version suffix (`/v2.0`) on the
    /// endpoint path is stripped once before probing, recovering the
    /// true service root from an old-style auth URL.
    ///
    /// Connection failures propagate as [`Error::Transport`]; a
    /// malformed or unexpected body degrades to an empty list, which
    /// drives the no-match path through negotiation rather than adding
    /// a second error path.
    pub async fn probe_root(
        &self,
        service: ServiceKind,
        endpoint: &str,
        strict: bool,
    ) -> Result<Vec<ApiVersion>> {
        let mut url = Url::parse(endpoint).map_err(|err| Error::InvalidUrl {
            url: endpoint.to_string(),
            reason: err.to_string(),
        })?;
        if !strict {
            strip_version_suffix(&mut url);
        }

        debug!(%service, %url, "probing service root");
        let response = self.http.get(url.clone()).send().await?;
        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(err) => {
                warn!(%service, %err, "service root returned an undecodable body");
                return Ok(Vec::new());
            }
        };

        let mut versions = Vec::new();
        for value in flatten_version_body(&body) {
            let record: VersionRecord = match serde_json::from_value(value) {
                Ok(record) => record,
                Err(err) => {
                    warn!(%service, %err, "skipping malformed version record");
                    continue;
                }
            };
            let Some(id) = record.id else {
                warn!(%service, "skipping version record without an id");
                continue;
            };
            let mut tag = ApiVersion {
                service,
                id,
                status: record.status,
                url: None,
                links: record.links,
                extra: record.extra,
                components: DEFAULT_COMPONENT_COUNT,
            };
            tag.url = self.resolve_self_link(&tag, &url);
            versions.push(tag);
        }
        Ok(versions)
    }

    /// The canonical self link for a version record, host-corrected
    /// when the hack is enabled and the link points at `localhost`.
    fn resolve_self_link(&self, tag: &ApiVersion, probed: &Url) -> Option<String> {
        let href = tag.self_link()?;
        if !self.url_host_hack {
            return Some(href.to_string());
        }
        let Ok(mut link) = Url::parse(href) else {
            return Some(href.to_string());
        };
        if link.host_str() == Some("localhost") {
            if link.set_host(probed.host_str()).is_err() {
                return Some(href.to_string());
            }
            let _ = link.set_port(probed.port());
            return Some(link.to_string());
        }
        Some(href.to_string())
    }
}

/// Normalize the three known body shapes into a flat record list.
/// Anything unrecognized yields an empty list.
fn flatten_version_body(body: &Value) -> Vec<Value> {
    if let Some(single) = body.get("version") {
        return vec![single.clone()];
    }
    match body.get("versions") {
        Some(Value::Array(list)) => list.clone(),
        Some(Value::Object(wrapper)) => match wrapper.get("values") {
            Some(Value::Array(list)) => list.clone(),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Strip one trailing legacy version segment (`v2.0` style) from the
/// URL path. Applied at most once, never recursively.
fn strip_version_suffix(url: &mut Url) {
    let path = url.path().trim_end_matches('/').to_string();
    if let Some((head, last)) = path.rsplit_once('/') {
        if is_version_segment(last) {
            let stripped = if head.is_empty() { "/" } else { head };
            url.set_path(stripped);
        }
    }
}

fn is_version_segment(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit() || c == '.'))
}
