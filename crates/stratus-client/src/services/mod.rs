//! Per-service version tables and request helpers.
//!
//! Each service module knows the collection paths and envelope keys of
//! its API; the functions here are thin wrappers over
//! [`stratus_api::ResourceApi`] on an already-negotiated client.

pub mod compute;
pub mod identity;
pub mod image;
pub mod network;
pub mod object_store;
pub mod volume;

use stratus_api::{ApiVersion, ServiceKind};

/// The API versions this client knows how to speak, per service.
#[must_use]
pub fn supported_versions(service: ServiceKind) -> &'static [&'static str] {
    match service {
        ServiceKind::Compute => &["1.1", "2"],
        ServiceKind::Identity => &["2.0", "3"],
        ServiceKind::Image => &["1", "2"],
        ServiceKind::Network => &["2.0"],
        ServiceKind::ObjectStore => &["1"],
        ServiceKind::Volume => &["1"],
    }
}

/// The version preferred when the user expresses no preference.
#[must_use]
pub fn default_version(service: ServiceKind) -> &'static str {
    match service {
        ServiceKind::Compute => "2",
        ServiceKind::Identity => "3",
        ServiceKind::Image => "2",
        ServiceKind::Network => "2.0",
        ServiceKind::ObjectStore => "1",
        ServiceKind::Volume => "1",
    }
}

/// The client-side version list offered to negotiation.
///
/// An explicit request narrows the offer to that single version, even
/// one outside the supported table; otherwise every supported version
/// is offered and negotiation picks the highest compatible one.
#[must_use]
pub fn client_versions(service: ServiceKind, requested: Option<&str>) -> Vec<ApiVersion> {
    match requested {
        Some(id) => vec![ApiVersion::new(service, id)],
        None => supported_versions(service)
            .iter()
            .map(|id| ApiVersion::new(service, *id))
            .collect(),
    }
}
