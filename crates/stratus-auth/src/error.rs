//! Error types for session construction and authentication.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building a session or acquiring a token.
#[derive(Debug, Error)]
pub enum Error {
    /// Network-level failure reaching the identity service.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The supplied options do not add up to any auth strategy.
    #[error("incomplete credentials: {reason}")]
    IncompleteCredentials {
        /// What is missing.
        reason: String,
    },

    /// The identity service rejected the authentication request.
    #[error("authentication failed: HTTP {status}")]
    AuthFailed {
        /// Response status code.
        status: u16,
    },

    /// The identity service returned a token response the client
    /// cannot interpret.
    #[error("invalid auth response: {reason}")]
    InvalidAuthResponse {
        /// What was wrong with it.
        reason: String,
    },

    /// The CA bundle could not be read or parsed.
    #[error("cannot load CA bundle {path}: {reason}")]
    CaBundle {
        /// Path to the bundle.
        path: PathBuf,
        /// Read or parse failure.
        reason: String,
    },

    /// No identity API version the session knows how to authenticate
    /// against.
    #[error("unsupported identity API major version {major}")]
    UnsupportedIdentityVersion {
        /// The negotiated major version.
        major: u64,
    },
}

/// Result type alias for auth operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_incomplete_credentials() {
        let err = Error::IncompleteCredentials {
            reason: "no auth URL".to_string(),
        };
        assert_eq!(err.to_string(), "incomplete credentials: no auth URL");
    }

    #[test]
    fn error_display_auth_failed() {
        let err = Error::AuthFailed { status: 401 };
        assert_eq!(err.to_string(), "authentication failed: HTTP 401");
    }
}
