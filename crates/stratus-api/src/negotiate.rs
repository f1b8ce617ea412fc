//! Version negotiation between server and client version lists.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::service::ServiceKind;
use crate::version::ApiVersion;

/// Match the highest compatible client and server versions.
///
/// Client versions are scanned highest first; for each, server versions
/// are scanned highest first. The first pair with an equal major
/// component where the client minor does not exceed the server minor
/// wins: the highest client version with *any* compatible server beats
/// a lower client version with a higher-matching server. Returns the
/// `(server, client)` pair, or `None` when nothing is compatible.
///
/// Entries whose version string cannot be parsed are skipped; a server
/// advertising garbage simply offers nothing usable.
#[must_use]
pub fn match_versions(
    server: &[ApiVersion],
    client: &[ApiVersion],
) -> Option<(ApiVersion, ApiVersion)> {
    let servers = keyed(server);
    let clients = keyed(client);

    for (ckey, (cver, ctag)) in clients.iter().rev() {
        for (skey, (sver, stag)) in servers.iter().rev() {
            if sver.first() == cver.first() && cver.get(1) <= sver.get(1) {
                debug!(client = ckey, server = skey, "matched API versions");
                return Some(((*stag).clone(), (*ctag).clone()));
            }
        }
    }
    None
}

/// [`match_versions`], with no match promoted to the fatal
/// [`Error::VersionMismatch`] carrying both advertised lists.
pub fn require_match(
    service: ServiceKind,
    server: &[ApiVersion],
    client: &[ApiVersion],
) -> Result<(ApiVersion, ApiVersion)> {
    match_versions(server, client).ok_or_else(|| Error::VersionMismatch {
        service,
        server: join_ids(server),
        client: join_ids(client),
    })
}

/// Index versions by sort key, dropping unparseable entries. The map
/// also de-duplicates versions that normalize to the same key.
fn keyed(versions: &[ApiVersion]) -> BTreeMap<String, (Vec<u64>, &ApiVersion)> {
    let mut map = BTreeMap::new();
    for tag in versions {
        match (tag.sort_key(), tag.version_components()) {
            (Ok(key), Ok(components)) if !components.is_empty() => {
                map.insert(key, (components, tag));
            }
            _ => warn!(id = %tag.id, "skipping unparseable version"),
        }
    }
    map
}

fn join_ids(versions: &[ApiVersion]) -> String {
    versions
        .iter()
        .map(|v| v.id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
