//! Core request layer for the Stratus control-plane client.
//!
//! This crate holds the pieces every service binding is built from:
//! [`ApiVersion`] tags with their normalization and ordering rules,
//! [`negotiate::match_versions`] for reconciling server and client
//! version lists, [`Discovery`] for probing a service root, the
//! session-bound [`Gateway`] request funnel, and the generic
//! [`ResourceApi`] create/delete/list/find helpers.

#![forbid(unsafe_code)]

mod discovery;
mod error;
mod gateway;
pub mod negotiate;
mod resource;
mod service;
mod version;

pub use self::discovery::Discovery;
pub use self::error::{Error, Result};
pub use self::gateway::{Gateway, RequestOptions, Transport};
pub use self::resource::{Body, RawResponse, ResourceApi};
pub use self::service::ServiceKind;
pub use self::version::{ApiVersion, VersionLink, normalize, to_components};
