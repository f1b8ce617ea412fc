//! Errors raised while building and using service clients.

use thiserror::Error;

use stratus_api::ServiceKind;

/// Client construction and usage errors.
#[derive(Debug, Error)]
pub enum Error {
    /// An API-layer error: transport, negotiation, or lookup.
    #[error(transparent)]
    Api(#[from] stratus_api::Error),

    /// A session-layer error: credentials or token acquisition.
    #[error(transparent)]
    Auth(#[from] stratus_auth::Error),

    /// No endpoint is known for the service. Distinct from a
    /// configuration error: the configuration is valid, it just does
    /// not cover this service.
    #[error("no endpoint configured or cataloged for service '{service}'")]
    NotConfigured {
        /// The service that has no endpoint.
        service: ServiceKind,
    },

    /// A client was requested while its own construction was still in
    /// progress.
    #[error("client for service '{service}' requested during its own construction")]
    ReentrantInit {
        /// The service being constructed.
        service: ServiceKind,
    },

    /// The supplied configuration is invalid.
    #[error("invalid configuration: {reason}")]
    Config {
        /// What is wrong with it.
        reason: String,
    },
}

/// Convenience alias for client results.
pub type Result<T> = std::result::Result<T, Error>;
