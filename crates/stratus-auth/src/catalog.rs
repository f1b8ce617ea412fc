//! The service catalog returned by authentication.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use stratus_api::ServiceKind;

/// Maps logical service names to the endpoint URLs the auth response
/// advertised for them. Catalog entries for service types the client
/// does not know are ignored.
#[derive(Debug, Clone, Default)]
pub struct ServiceCatalog {
    endpoints: HashMap<ServiceKind, String>,
}

impl ServiceCatalog {
    /// Parse a v2-style catalog: a list of `{"type", "endpoints":
    /// [{"publicURL": ...}]}` entries.
    #[must_use]
    pub fn from_v2(catalog: &Value) -> Self {
        let mut endpoints = HashMap::new();
        for entry in catalog.as_array().into_iter().flatten() {
            let Some(kind) = service_kind(entry) else {
                continue;
            };
            let url = entry
                .get("endpoints")
                .and_then(Value::as_array)
                .and_then(|list| list.first())
                .and_then(|ep| ep.get("publicURL"))
                .and_then(Value::as_str);
            if let Some(url) = url {
                endpoints.insert(kind, url.to_string());
            }
        }
        debug!(services = endpoints.len(), "parsed v2 service catalog");
        Self { endpoints }
    }

    /// Parse a v3-style catalog: endpoints carry an `interface` field
    /// and the public one is selected.
    #[must_use]
    pub fn from_v3(catalog: &Value) -> Self {
        let mut endpoints = HashMap::new();
        for entry in catalog.as_array().into_iter().flatten() {
            let Some(kind) = service_kind(entry) else {
                continue;
            };
            let url = entry
                .get("endpoints")
                .and_then(Value::as_array)
                .into_iter()
                .flatten()
                .find(|ep| ep.get("interface").and_then(Value::as_str) == Some("public"))
                .and_then(|ep| ep.get("url"))
                .and_then(Value::as_str);
            if let Some(url) = url {
                endpoints.insert(kind, url.to_string());
            }
        }
        debug!(services = endpoints.len(), "parsed v3 service catalog");
        Self { endpoints }
    }

    /// The advertised endpoint for a service.
    #[must_use]
    pub fn url_for(&self, service: ServiceKind) -> Option<&str> {
        self.endpoints.get(&service).map(String::as_str)
    }

    /// Number of catalogued services.
    #[must_use]
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// True when the catalog holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

fn service_kind(entry: &Value) -> Option<ServiceKind> {
    entry
        .get("type")
        .and_then(Value::as_str)
        .and_then(|name| name.parse().ok())
}
