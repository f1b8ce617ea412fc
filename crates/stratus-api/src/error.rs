//! Error types for the core request layer.

use thiserror::Error;

use crate::service::ServiceKind;

/// Errors produced by discovery, negotiation, and the resource API.
#[derive(Debug, Error)]
pub enum Error {
    /// Network-level failure reaching a service. Never retried.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// An endpoint URL could not be parsed.
    #[error("invalid endpoint URL '{url}': {reason}")]
    InvalidUrl {
        /// The offending URL string.
        url: String,
        /// Why it failed to parse.
        reason: String,
    },

    /// A version string contained a component that is not numeric
    /// after normalization.
    #[error("cannot parse version '{id}': component '{component}' is not numeric")]
    Parse {
        /// The raw version string.
        id: String,
        /// The component that failed to parse.
        component: String,
    },

    /// A find operation matched no resource after exhausting the
    /// attribute search and the ID fallback.
    #[error("no {resource} found matching {attr}='{value}'")]
    NotFound {
        /// The resource collection that was searched.
        resource: String,
        /// The attribute searched on.
        attr: String,
        /// The value searched for.
        value: String,
    },

    /// A `find_attr` search matched more than one resource where
    /// exactly one was required.
    #[error("multiple {resource} resources match '{value}'")]
    AmbiguousMatch {
        /// The resource collection that was searched.
        resource: String,
        /// The value that matched more than once.
        value: String,
    },

    /// A `find_one` filter matched more than one resource. Distinct
    /// from [`Error::AmbiguousMatch`]; callers match on the kind.
    #[error("many {resource} resources found")]
    ManyFound {
        /// The resource collection that was searched.
        resource: String,
    },

    /// Version negotiation found no compatible server/client pair.
    /// Fatal to the current command.
    #[error(
        "API version negotiation failed for {service}: \
         server offers [{server}], client supports [{client}]"
    )]
    VersionMismatch {
        /// The service being negotiated.
        service: ServiceKind,
        /// Comma-separated server-advertised versions.
        server: String,
        /// Comma-separated client-supported versions.
        client: String,
    },

    /// No session bound to the gateway and none supplied with the
    /// request. Raised before any I/O is attempted.
    #[error("no session bound and none supplied to the request")]
    MissingSession,

    /// An unrecognized service name.
    #[error("unknown service '{0}'")]
    UnknownService(String),
}

/// Result type alias for core API operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_not_found() {
        let err = Error::NotFound {
            resource: "networks".to_string(),
            attr: "name".to_string(),
            value: "net1".to_string(),
        };
        assert_eq!(err.to_string(), "no networks found matching name='net1'");
    }

    #[test]
    fn error_display_version_mismatch_lists_both_sides() {
        let err = Error::VersionMismatch {
            service: ServiceKind::Identity,
            server: "1.0".to_string(),
            client: "2.0, 3".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("identity"));
        assert!(text.contains("[1.0]"));
        assert!(text.contains("[2.0, 3]"));
    }

    #[test]
    fn error_display_missing_session() {
        assert_eq!(
            Error::MissingSession.to_string(),
            "no session bound and none supplied to the request"
        );
    }
}
