//! Identity service helpers.
//!
//! The identity API renamed its project collection between majors:
//! v2 serves `/tenants`, v3 serves `/projects`. The helpers route by
//! the negotiated client major so callers never see the split.

use serde_json::Value;

use crate::error::Result;
use crate::registry::ServiceClient;

fn project_collection(client: &ServiceClient) -> (&'static str, &'static str) {
    if client.client_major() < 3 {
        ("/tenants", "tenants")
    } else {
        ("/projects", "projects")
    }
}

/// List projects (tenants on identity v2).
pub async fn project_list(client: &ServiceClient) -> Result<Vec<Value>> {
    let (path, key) = project_collection(client);
    let body = client.api.list(path, None, false, Vec::new()).await?;
    Ok(body.into_list(Some(key)))
}

/// Find one project by name, falling back to ID.
pub async fn project_find(client: &ServiceClient, value: &str) -> Result<Value> {
    let (path, key) = project_collection(client);
    Ok(client.api.find_attr(path, value, None, Some(key)).await?)
}
