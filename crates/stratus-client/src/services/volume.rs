//! Volume service helpers.

use serde_json::Value;

use crate::error::Result;
use crate::registry::ServiceClient;

/// List volumes. `detailed` asks the server for the expanded records.
pub async fn volume_list(client: &ServiceClient, detailed: bool) -> Result<Vec<Value>> {
    let body = client
        .api
        .list("/volumes", None, detailed, Vec::new())
        .await?;
    Ok(body.into_list(Some("volumes")))
}

/// Find one volume by name, falling back to ID. The v1 volume API
/// calls the name attribute `display_name`.
pub async fn volume_find(client: &ServiceClient, value: &str) -> Result<Value> {
    Ok(client
        .api
        .find_attr("/volumes", value, Some("display_name"), None)
        .await?)
}
