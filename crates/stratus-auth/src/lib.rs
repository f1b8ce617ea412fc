//! Session and credential handling for the Stratus client.
//!
//! A [`Session`] is built once per command invocation from a
//! [`CloudOptions`] object, selects exactly one authentication
//! strategy, and is then immutable: every request gateway created from
//! it shares the same HTTP client, verification policy, and (after the
//! one-shot token acquisition) bearer token and service catalog.

#![forbid(unsafe_code)]

mod catalog;
mod error;
mod options;
mod session;

pub use self::catalog::ServiceCatalog;
pub use self::error::{Error, Result};
pub use self::options::{CloudOptions, Verify};
pub use self::session::{AuthStrategy, Session};
