//! Named services of the control plane.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The backing services a client can be constructed for.
///
/// The string form matches the service type names used in the
/// authentication catalog (`compute`, `identity`, `object-store`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceKind {
    /// Compute service (servers, flavors).
    Compute,
    /// Identity service (auth, projects, catalog).
    Identity,
    /// Image service.
    Image,
    /// Network service.
    Network,
    /// Object storage service (containers, objects).
    ObjectStore,
    /// Block volume service.
    Volume,
}

impl ServiceKind {
    /// All known services, in catalog order.
    pub const ALL: [ServiceKind; 6] = [
        ServiceKind::Compute,
        ServiceKind::Identity,
        ServiceKind::Image,
        ServiceKind::Network,
        ServiceKind::ObjectStore,
        ServiceKind::Volume,
    ];

    /// Catalog-compatible name for this service.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ServiceKind::Compute => "compute",
            ServiceKind::Identity => "identity",
            ServiceKind::Image => "image",
            ServiceKind::Network => "network",
            ServiceKind::ObjectStore => "object-store",
            ServiceKind::Volume => "volume",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "compute" => Ok(ServiceKind::Compute),
            "identity" => Ok(ServiceKind::Identity),
            "image" => Ok(ServiceKind::Image),
            "network" => Ok(ServiceKind::Network),
            "object-store" => Ok(ServiceKind::ObjectStore),
            "volume" => Ok(ServiceKind::Volume),
            other => Err(Error::UnknownService(other.to_string())),
        }
    }
}
