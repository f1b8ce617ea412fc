//! Image service helpers.

use serde_json::Value;

use crate::error::Result;
use crate::registry::ServiceClient;

/// List images.
pub async fn image_list(client: &ServiceClient, params: Vec<(String, String)>) -> Result<Vec<Value>> {
    let body = client.api.list("/images", None, false, params).await?;
    Ok(body.into_list(Some("images")))
}

/// Find one image by name, falling back to ID.
pub async fn image_find(client: &ServiceClient, value: &str) -> Result<Value> {
    Ok(client.api.find_attr("/images", value, None, None).await?)
}
