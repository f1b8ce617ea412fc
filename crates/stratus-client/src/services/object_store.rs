//! Object-store helpers.
//!
//! The object store caps every listing at a server-side page size and
//! paginates by marker: each page is requested with the name of the
//! last item seen, and an empty page means the listing is exhausted.

use serde_json::Value;

use crate::error::Result;
use crate::registry::ServiceClient;

/// Listing controls shared by container and object listings.
#[derive(Debug, Clone, Default)]
pub struct ListOpts {
    /// Start the listing after this name.
    pub marker: Option<String>,
    /// Stop the listing before this name.
    pub end_marker: Option<String>,
    /// Cap the number of items per request.
    pub limit: Option<u64>,
    /// Only items whose name starts with this prefix.
    pub prefix: Option<String>,
    /// Group object names at this character, returning `subdir`
    /// placeholders for the groups.
    pub delimiter: Option<String>,
    /// Follow markers until the listing is exhausted instead of
    /// returning a single page.
    pub all: bool,
}

/// List containers in the account.
pub async fn container_list(client: &ServiceClient, opts: &ListOpts) -> Result<Vec<Value>> {
    paginated_list(client, "/", opts).await
}

/// List objects in a container.
pub async fn object_list(
    client: &ServiceClient,
    container: &str,
    opts: &ListOpts,
) -> Result<Vec<Value>> {
    let path = format!("/{container}");
    paginated_list(client, &path, opts).await
}

async fn paginated_list(client: &ServiceClient, path: &str, opts: &ListOpts) -> Result<Vec<Value>> {
    let base_params = base_params(opts);

    if !opts.all {
        let mut params = base_params;
        if let Some(marker) = &opts.marker {
            params.push(("marker".to_string(), marker.clone()));
        }
        let body = client.api.list(path, None, false, params).await?;
        return Ok(body.into_list(None));
    }

    let mut marker = opts.marker.clone();
    let mut listing = Vec::new();
    loop {
        let mut params = base_params.clone();
        if let Some(marker) = &marker {
            params.push(("marker".to_string(), marker.clone()));
        }
        let page = client
            .api
            .list(path, None, false, params)
            .await?
            .into_list(None);
        if page.is_empty() {
            break;
        }
        let next = page
            .last()
            .and_then(|item| next_marker(item, opts.delimiter.is_some()));
        listing.extend(page);
        // A marker that fails to advance would request the same page
        // forever.
        match next {
            Some(next) if marker.as_deref() != Some(next.as_str()) => marker = Some(next),
            _ => break,
        }
    }
    Ok(listing)
}

/// The marker for the page after this item. Real objects carry `name`;
/// with a delimiter in play the last entry may instead be a `subdir`
/// placeholder for a grouped prefix.
fn next_marker(item: &Value, delimiter_active: bool) -> Option<String> {
    if let Some(name) = item.get("name").and_then(Value::as_str) {
        return Some(name.to_string());
    }
    if delimiter_active {
        if let Some(subdir) = item.get("subdir").and_then(Value::as_str) {
            return Some(subdir.to_string());
        }
    }
    None
}

fn base_params(opts: &ListOpts) -> Vec<(String, String)> {
    let mut params = vec![("format".to_string(), "json".to_string())];
    if let Some(end_marker) = &opts.end_marker {
        params.push(("end_marker".to_string(), end_marker.clone()));
    }
    if let Some(limit) = opts.limit {
        params.push(("limit".to_string(), limit.to_string()));
    }
    if let Some(prefix) = &opts.prefix {
        params.push(("prefix".to_string(), prefix.clone()));
    }
    if let Some(delimiter) = &opts.delimiter {
        params.push(("delimiter".to_string(), delimiter.clone()));
    }
    params
}
