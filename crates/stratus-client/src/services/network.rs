//! Network service helpers.

use serde_json::Value;

use crate::error::Result;
use crate::registry::ServiceClient;

/// List networks.
pub async fn network_list(
    client: &ServiceClient,
    params: Vec<(String, String)>,
) -> Result<Vec<Value>> {
    let body = client.api.list("/networks", None, false, params).await?;
    Ok(body.into_list(Some("networks")))
}

/// Find one network by name, falling back to ID.
pub async fn network_find(client: &ServiceClient, value: &str) -> Result<Value> {
    Ok(client.api.find_attr("/networks", value, None, None).await?)
}

/// List subnets.
pub async fn subnet_list(client: &ServiceClient) -> Result<Vec<Value>> {
    let body = client.api.list("/subnets", None, false, Vec::new()).await?;
    Ok(body.into_list(Some("subnets")))
}
