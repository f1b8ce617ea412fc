//! Compute service helpers.

use serde_json::Value;

use crate::error::Result;
use crate::registry::ServiceClient;

/// List servers. `detailed` asks the server for the expanded records.
pub async fn server_list(
    client: &ServiceClient,
    detailed: bool,
    params: Vec<(String, String)>,
) -> Result<Vec<Value>> {
    let body = client.api.list("/servers", None, detailed, params).await?;
    Ok(body.into_list(Some("servers")))
}

/// Find one server by name, falling back to ID.
pub async fn server_find(client: &ServiceClient, value: &str) -> Result<Value> {
    Ok(client.api.find_attr("/servers", value, None, None).await?)
}

/// List flavors.
pub async fn flavor_list(client: &ServiceClient, detailed: bool) -> Result<Vec<Value>> {
    let body = client
        .api
        .list("/flavors", None, detailed, Vec::new())
        .await?;
    Ok(body.into_list(Some("flavors")))
}
