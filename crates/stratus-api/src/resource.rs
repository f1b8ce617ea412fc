//! Generic CRUD and find helpers over the request gateway.
//!
//! Every per-service binding composes these operations. List responses
//! commonly wrap the payload in a single-key envelope
//! (`{"networks": [...]}`); the helpers here unwrap that, run the
//! name-then-id find fallback, and keep the decode-failure behavior
//! uniform: an undecodable body is handed back raw instead of raising.

use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::gateway::{Gateway, RequestOptions};

/// A decoded response body, or the raw response when the body was not
/// valid JSON (some endpoints return empty or non-JSON bodies on
/// success).
#[derive(Debug)]
pub enum Body {
    /// The body decoded as JSON.
    Json(Value),
    /// The body could not be decoded; returned unchanged.
    Raw(RawResponse),
}

impl Body {
    /// The decoded JSON value, if this body decoded.
    #[must_use]
    pub fn into_json(self) -> Option<Value> {
        match self {
            Body::Json(value) => Some(value),
            Body::Raw(_) => None,
        }
    }

    /// Unwrap a list payload.
    ///
    /// A bare array is returned as-is. An object is unwrapped through
    /// `key` when given, else through its single key when it has
    /// exactly one. Anything else yields an empty list.
    #[must_use]
    pub fn into_list(self, key: Option<&str>) -> Vec<Value> {
        let Body::Json(value) = self else {
            return Vec::new();
        };
        match value {
            Value::Array(items) => items,
            Value::Object(map) => {
                if let Some(key) = key {
                    if let Some(Value::Array(items)) = map.get(key) {
                        return items.clone();
                    }
                }
                if map.len() == 1 {
                    if let Some(Value::Array(items)) = map.values().next() {
                        return items.clone();
                    }
                }
                Vec::new()
            }
            _ => Vec::new(),
        }
    }
}

/// The undecoded remains of a response.
#[derive(Debug)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: reqwest::StatusCode,
    /// Response headers.
    pub headers: reqwest::header::HeaderMap,
    /// Body text as received.
    pub text: String,
}

/// Generic resource operations bound to one service endpoint.
#[derive(Debug, Clone)]
pub struct ResourceApi {
    gateway: Gateway,
}

impl ResourceApi {
    /// Wrap a gateway.
    #[must_use]
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// The underlying gateway.
    #[must_use]
    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// Create a resource. `POST` unless another method is given.
    /// The body is decoded when it is JSON; otherwise returned raw.
    pub async fn create(
        &self,
        path: &str,
        method: Option<Method>,
        opts: RequestOptions,
    ) -> Result<Body> {
        let method = method.unwrap_or(Method::POST);
        let response = self.gateway.request(method, path, opts).await?;
        decode(response).await
    }

    /// Delete a resource. The caller inspects the status code.
    pub async fn delete(&self, path: &str) -> Result<RawResponse> {
        let response = self
            .gateway
            .request(Method::DELETE, path, RequestOptions::new())
            .await?;
        let status = response.status();
        let headers = response.headers().clone();
        let text = response.text().await?;
        Ok(RawResponse {
            status,
            headers,
            text,
        })
    }

    /// List a collection.
    ///
    /// `detailed` appends a `/detail` suffix. Some services implement
    /// filtered listing as a `POST`; supplying `body` selects that,
    /// otherwise a `GET` is issued with `params` as the query string.
    pub async fn list(
        &self,
        path: &str,
        body: Option<Value>,
        detailed: bool,
        params: Vec<(String, String)>,
    ) -> Result<Body> {
        let mut target = path.to_string();
        if detailed {
            target = format!("{}/detail", target.trim_end_matches('/'));
        }
        let mut opts = RequestOptions::new();
        opts.query = params;
        let response = match body {
            Some(body) => {
                self.gateway
                    .request(Method::POST, &target, opts.json(body))
                    .await?
            }
            None => self.gateway.request(Method::GET, &target, opts).await?,
        };
        decode(response).await
    }

    /// Find exactly one resource by an attribute, falling back to ID.
    ///
    /// Two sequential server-side searches: first `{attr: value}`,
    /// then `{id: value}` only when that matched nothing. One match is
    /// returned; more than one is a hard [`Error::AmbiguousMatch`],
    /// never silently resolved; zero on both phases is
    /// [`Error::NotFound`] naming the attribute and value searched.
    /// `resource` overrides the envelope key when it differs from the
    /// path.
    pub async fn find_attr(
        &self,
        path: &str,
        value: &str,
        attr: Option<&str>,
        resource: Option<&str>,
    ) -> Result<Value> {
        let attr = attr.unwrap_or("name");
        let key = resource.unwrap_or_else(|| path.trim_matches('/'));

        for (phase_attr, fallback) in [(attr, true), ("id", false)] {
            let params = vec![(phase_attr.to_string(), value.to_string())];
            let items = self
                .list(path, None, false, params)
                .await?
                .into_list(Some(key));
            debug!(path, attr = phase_attr, value, hits = items.len(), "find_attr phase");
            match items.len() {
                1 => return Ok(items.into_iter().next().unwrap_or(Value::Null)),
                0 if fallback && phase_attr != "id" => {}
                0 => break,
                _ => {
                    return Err(Error::AmbiguousMatch {
                        resource: key.to_string(),
                        value: value.to_string(),
                    });
                }
            }
        }

        Err(Error::NotFound {
            resource: key.to_string(),
            attr: attr.to_string(),
            value: value.to_string(),
        })
    }

    /// Load the whole collection and filter locally.
    ///
    /// A resource matches when every supplied attribute/value pair
    /// matches exactly; resources missing a requested attribute are
    /// skipped rather than treated as errors, since shapes vary across
    /// services.
    pub async fn find_bulk(&self, path: &str, avps: &[(&str, Value)]) -> Result<Vec<Value>> {
        let items = self.list(path, None, false, Vec::new()).await?.into_list(None);
        let matches = items
            .into_iter()
            .filter(|item| {
                avps.iter()
                    .all(|(attr, value)| item.get(*attr) == Some(value))
            })
            .collect();
        Ok(matches)
    }

    /// Find exactly one resource with [`Self::find_bulk`].
    ///
    /// Zero matches is [`Error::NotFound`]; more than one is
    /// [`Error::ManyFound`], a distinct kind: "none" is a normal data
    /// condition while "many" means the caller's filter was not
    /// specific enough.
    pub async fn find_one(&self, path: &str, avps: &[(&str, Value)]) -> Result<Value> {
        let mut matches = self.find_bulk(path, avps).await?;
        match matches.len() {
            0 => Err(Error::NotFound {
                resource: path.trim_matches('/').to_string(),
                attr: avps
                    .iter()
                    .map(|(attr, _)| *attr)
                    .collect::<Vec<_>>()
                    .join(","),
                value: avps
                    .iter()
                    .map(|(_, value)| value.to_string())
                    .collect::<Vec<_>>()
                    .join(","),
            }),
            1 => Ok(matches.remove(0)),
            _ => Err(Error::ManyFound {
                resource: path.trim_matches('/').to_string(),
            }),
        }
    }
}

/// Decode a response body as JSON, degrading to the raw response when
/// the body is not JSON.
async fn decode(response: reqwest::Response) -> Result<Body> {
    let status = response.status();
    let headers = response.headers().clone();
    let text = response.text().await?;
    match serde_json::from_str(&text) {
        Ok(value) => Ok(Body::Json(value)),
        Err(_) => Ok(Body::Raw(RawResponse {
            status,
            headers,
            text,
        })),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use futures::future::BoxFuture;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::gateway::Transport;

    #[derive(Debug, Default)]
    struct PlainTransport {
        http: reqwest::Client,
    }

    impl Transport for PlainTransport {
        fn http(&self) -> &reqwest::Client {
            &self.http
        }

        fn send(
            &self,
            request: reqwest::Request,
        ) -> BoxFuture<'_, reqwest::Result<reqwest::Response>> {
            Box::pin(self.http.execute(request))
        }
    }

    fn api(endpoint: &str) -> ResourceApi {
        let gateway = Gateway::new()
            .with_session(Arc::new(PlainTransport::default()))
            .with_endpoint(endpoint);
        ResourceApi::new(gateway)
    }

    fn item(id: &str, name: &str, status: &str) -> Value {
        json!({"id": id, "name": name, "status": status})
    }

    #[tokio::test]
    async fn create_decodes_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/widgets"))
            .respond_with(
                ResponseTemplate::new(202).set_body_json(item("1", "alpha", "UP")),
            )
            .mount(&server)
            .await;

        let body = api(&server.uri())
            .create("widgets", None, RequestOptions::new())
            .await
            .unwrap();
        assert_eq!(body.into_json(), Some(item("1", "alpha", "UP")));
    }

    #[tokio::test]
    async fn create_with_put_and_empty_body_returns_raw() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/widgets"))
            .respond_with(ResponseTemplate::new(201))
            .mount(&server)
            .await;

        let body = api(&server.uri())
            .create("widgets", Some(Method::PUT), RequestOptions::new())
            .await
            .unwrap();
        match body {
            Body::Raw(raw) => assert_eq!(raw.status, 201),
            Body::Json(value) => panic!("unexpected decode: {value}"),
        }
    }

    #[tokio::test]
    async fn delete_returns_status_for_inspection() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/widgets/1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let raw = api(&server.uri()).delete("widgets/1").await.unwrap();
        assert_eq!(raw.status, 204);
    }

    #[tokio::test]
    async fn list_with_body_posts_a_filter() {
        let server = MockServer::start().await;
        let filter = json!({"p1": "xxx"});
        Mock::given(method("POST"))
            .and(path("/widgets"))
            .and(body_json(&filter))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([item("1", "a", "UP")])))
            .mount(&server)
            .await;

        let items = api(&server.uri())
            .list("widgets", Some(filter), false, Vec::new())
            .await
            .unwrap()
            .into_list(None);
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn detailed_list_appends_the_suffix() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/widgets/detail"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let body = api(&server.uri())
            .list("widgets/", None, true, Vec::new())
            .await
            .unwrap();
        assert!(body.into_list(None).is_empty());
    }

    #[tokio::test]
    async fn find_attr_by_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/widgets"))
            .and(query_param("name", "alpha"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "widgets": [item("1", "alpha", "UP")]
            })))
            .mount(&server)
            .await;

        let found = api(&server.uri())
            .find_attr("widgets", "alpha", None, None)
            .await
            .unwrap();
        assert_eq!(found, item("1", "alpha", "UP"));
    }

    #[tokio::test]
    async fn find_attr_falls_back_to_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/widgets"))
            .and(query_param("name", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"widgets": []})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/widgets"))
            .and(query_param("id", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "widgets": [item("1", "alpha", "UP")]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let found = api(&server.uri())
            .find_attr("widgets", "1", None, None)
            .await
            .unwrap();
        assert_eq!(found, item("1", "alpha", "UP"));
    }

    #[tokio::test]
    async fn find_attr_ambiguity_is_a_hard_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/widgets"))
            .and(query_param("name", "dup"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "widgets": [item("1", "dup", "UP"), item("2", "dup", "DOWN")]
            })))
            .mount(&server)
            .await;

        let err = api(&server.uri())
            .find_attr("widgets", "dup", None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AmbiguousMatch { .. }));
    }

    #[tokio::test]
    async fn find_attr_not_found_names_the_search() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/widgets"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"widgets": []})))
            .mount(&server)
            .await;

        let err = api(&server.uri())
            .find_attr("widgets", "ghost", None, None)
            .await
            .unwrap_err();
        match err {
            Error::NotFound { attr, value, .. } => {
                assert_eq!(attr, "name");
                assert_eq!(value, "ghost");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn find_attr_with_resource_key_override() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/wsx"))
            .and(query_param("name", "alpha"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "qaz": [item("1", "alpha", "UP")]
            })))
            .mount(&server)
            .await;

        let found = api(&server.uri())
            .find_attr("wsx", "alpha", None, Some("qaz"))
            .await
            .unwrap();
        assert_eq!(found, item("1", "alpha", "UP"));
    }

    #[tokio::test]
    async fn find_bulk_is_a_logical_and() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/widgets"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                item("1", "alpha", "UP"),
                item("2", "beta", "DOWN"),
                item("3", "delta", "UP"),
            ])))
            .mount(&server)
            .await;

        let api = api(&server.uri());
        let hits = api
            .find_bulk("widgets", &[("status", json!("UP"))])
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);

        let hits = api
            .find_bulk(
                "widgets",
                &[("status", json!("UP")), ("name", json!("alpha"))],
            )
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0]["id"], "1");
    }

    #[tokio::test]
    async fn find_bulk_skips_resources_missing_the_attribute() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/widgets"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                item("1", "alpha", "UP"),
                {"id": "2", "name": "beta"},
            ])))
            .mount(&server)
            .await;

        let hits = api(&server.uri())
            .find_bulk("widgets", &[("status", json!("UP"))])
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn find_one_distinguishes_none_from_many() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/widgets"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                item("1", "dup", "UP"),
                item("2", "dup", "UP"),
            ])))
            .mount(&server)
            .await;

        let api = api(&server.uri());
        let err = api
            .find_one("widgets", &[("name", json!("ghost"))])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));

        let err = api
            .find_one("widgets", &[("name", json!("dup"))])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ManyFound { .. }));
    }

    #[tokio::test]
    async fn find_one_returns_the_single_match() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/widgets"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                item("1", "alpha", "UP"),
                item("2", "beta", "DOWN"),
            ])))
            .mount(&server)
            .await;

        let found = api(&server.uri())
            .find_one("widgets", &[("id", json!("2"))])
            .await
            .unwrap();
        assert_eq!(found["name"], "beta");
    }
}
