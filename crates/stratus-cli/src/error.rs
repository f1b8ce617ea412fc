//! CLI error types.

use std::fmt;

/// CLI-specific errors.
#[derive(Debug)]
pub enum CliError {
    /// Invalid configuration.
    Config(String),
    /// Invalid argument.
    InvalidArgument(String),
    /// Client construction or request failed.
    Client(stratus_client::Error),
    /// Output formatting error.
    Format(String),
    /// IO error.
    Io(std::io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {msg}"),
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Self::Client(e) => write!(f, "{e}"),
            Self::Format(msg) => write!(f, "format error: {msg}"),
            Self::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Client(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<stratus_client::Error> for CliError {
    fn from(err: stratus_client::Error) -> Self {
        Self::Client(err)
    }
}

impl From<stratus_auth::Error> for CliError {
    fn from(err: stratus_auth::Error) -> Self {
        Self::Client(stratus_client::Error::Auth(err))
    }
}

impl From<stratus_api::Error> for CliError {
    fn from(err: stratus_api::Error) -> Self {
        Self::Client(stratus_client::Error::Api(err))
    }
}
