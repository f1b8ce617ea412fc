//! API version tags and their ordering rules.
//!
//! Servers advertise versions in wildly inconsistent forms (`"v2.0"`,
//! `"3"`, `"2.3"`); clients declare the versions they can speak. Both
//! sides are represented as [`ApiVersion`] values whose derived sort
//! key makes lexical order equal numeric order, so the matcher can
//! compare them without caring who produced the string.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::service::ServiceKind;

/// Comparison arity used when none is specified: versions compare on
/// their first three components.
pub const DEFAULT_COMPONENT_COUNT: usize = 3;

/// A link attached to a server-advertised version record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionLink {
    /// Link relation, e.g. `self`.
    pub rel: String,
    /// Link target URL.
    pub href: String,
}

/// One API version advertised by a server or supported by the client.
///
/// Constructed fresh on every discovery probe and every static client
/// declaration; never mutated afterwards. Server-specific fields the
/// client does not interpret are kept in `extra` rather than being
/// mirrored onto typed fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiVersion {
    /// The service this version belongs to.
    pub service: ServiceKind,
    /// Raw version string as advertised, e.g. `"v2.0"` or `"3"`.
    pub id: String,
    /// Advertised status, e.g. `stable` or `deprecated`.
    pub status: Option<String>,
    /// Canonical self link for this version, when known.
    pub url: Option<String>,
    /// Links attached to the server record.
    #[serde(default)]
    pub links: Vec<VersionLink>,
    /// Uninterpreted server-specific fields.
    #[serde(default)]
    pub extra: serde_json::Map<String, serde_json::Value>,
    /// Number of components used for comparison.
    pub components: usize,
}

impl ApiVersion {
    /// A version tag with just a service and an id.
    #[must_use]
    pub fn new(service: ServiceKind, id: impl Into<String>) -> Self {
        Self {
            service,
            id: id.into(),
            status: None,
            url: None,
            links: Vec::new(),
            extra: serde_json::Map::new(),
            components: DEFAULT_COMPONENT_COUNT,
        }
    }

    /// Attach a status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// The id with the `v` prefix and any stray characters removed.
    #[must_use]
    pub fn normalized_id(&self) -> String {
        normalize(&self.id)
    }

    /// The version as integers, padded/truncated to the comparison
    /// arity. Empty for an empty id.
    pub fn version_components(&self) -> Result<Vec<u64>> {
        to_components(&self.id, self.components)
    }

    /// Zero-padded sort key; lexical order equals numeric order.
    /// Empty ids yield an empty key and sort lowest.
    pub fn sort_key(&self) -> Result<String> {
        let mut key = String::new();
        for component in self.version_components()? {
            key.push_str(&format!("{component:03}"));
        }
        Ok(key)
    }

    /// The `rel == "self"` link from the server record, if present.
    #[must_use]
    pub fn self_link(&self) -> Option<&str> {
        self.links
            .iter()
            .find(|link| link.rel == "self")
            .map(|link| link.href.as_str())
    }
}

/// Two versions are equal iff their sort keys and statuses match.
/// `"v2.0"` and `"2.0"` compare equal; nothing else is considered.
impl PartialEq for ApiVersion {
    fn eq(&self, other: &Self) -> bool {
        let this = self.sort_key().unwrap_or_default();
        let that = other.sort_key().unwrap_or_default();
        this == that && self.status == other.status
    }
}

impl Eq for ApiVersion {}

/// Strip a single leading `v` and drop every character that is not an
/// ASCII digit or `.`. Applying twice gives the same result.
#[must_use]
pub fn normalize(id: &str) -> String {
    let stripped = id.strip_prefix('v').unwrap_or(id);
    stripped
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect()
}

/// Parse a version string into `count` integer components.
///
/// The string is normalized first, then split on `.`; each part must
/// parse as an integer. The result is right-padded with zeros and
/// truncated to `count`. An empty id yields an empty vector.
pub fn to_components(id: &str, count: usize) -> Result<Vec<u64>> {
    if id.is_empty() {
        return Ok(Vec::new());
    }
    let normalized = normalize(id);
    let mut parts = Vec::new();
    for component in normalized.split('.') {
        let value = component.parse::<u64>().map_err(|_| Error::Parse {
            id: id.to_string(),
            component: component.to_string(),
        })?;
        parts.push(value);
    }
    parts.resize(count, 0);
    Ok(parts)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use test_case::test_case;

    use super::*;

    #[test_case("v2.0", "2.0"; "leading v stripped")]
    #[test_case("2.0", "2.0"; "already bare")]
    #[test_case("v2.0a32-b1", "2.0321"; "stray characters dropped")]
    #[test_case("3", "3"; "single component")]
    #[test_case("", ""; "empty stays empty")]
    fn normalize_cases(input: &str, expected: &str) {
        assert_eq!(normalize(input), expected);
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(s in ".*") {
            let once = normalize(&s);
            prop_assert_eq!(normalize(&once), once);
        }
    }

    #[test_case("1", 2, &[1, 0]; "padded")]
    #[test_case("3.2.1", 2, &[3, 2]; "truncated")]
    #[test_case("v2.0a32-b1", 2, &[2, 321]; "normalized before split")]
    #[test_case("v3.0", 3, &[3, 0, 0]; "default arity pads")]
    fn to_components_cases(input: &str, count: usize, expected: &[u64]) {
        assert_eq!(to_components(input, count).unwrap(), expected);
    }

    #[test]
    fn to_components_empty_id_is_empty() {
        assert_eq!(to_components("", 3).unwrap(), Vec::<u64>::new());
    }

    #[test]
    fn to_components_garbled_is_parse_error() {
        let err = to_components("beta", 3).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn to_components_empty_part_is_parse_error() {
        assert!(matches!(to_components("2.", 3), Err(Error::Parse { .. })));
    }

    #[test]
    fn sort_key_zero_pads_each_component() {
        let v = ApiVersion::new(ServiceKind::Identity, "v2.0");
        assert_eq!(v.sort_key().unwrap(), "002000000");
    }

    #[test]
    fn empty_id_sorts_lowest() {
        let empty = ApiVersion::new(ServiceKind::Identity, "");
        let low = ApiVersion::new(ServiceKind::Identity, "0.1");
        assert_eq!(empty.sort_key().unwrap(), "");
        assert!(empty.sort_key().unwrap() < low.sort_key().unwrap());
    }

    #[test]
    fn prefix_insensitive_equality() {
        let a = ApiVersion::new(ServiceKind::Identity, "v2.0");
        let b = ApiVersion::new(ServiceKind::Identity, "2.0");
        assert_eq!(a, b);
    }

    #[test]
    fn equality_considers_status() {
        let a = ApiVersion::new(ServiceKind::Identity, "2.0").with_status("stable");
        let b = ApiVersion::new(ServiceKind::Identity, "2.0").with_status("deprecated");
        assert_ne!(a, b);
    }

    #[test]
    fn self_link_scans_rel() {
        let mut v = ApiVersion::new(ServiceKind::Identity, "v3.0");
        v.links = vec![
            VersionLink {
                rel: "describedby".to_string(),
                href: "http://docs.example.com/".to_string(),
            },
            VersionLink {
                rel: "self".to_string(),
                href: "http://host/v3/".to_string(),
            },
        ];
        assert_eq!(v.self_link(), Some("http://host/v3/"));
    }
}
