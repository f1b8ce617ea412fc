//! Service client construction for Stratus.
//!
//! [`ClientRegistry`] turns cloud options into ready-to-use service
//! clients: it authenticates the session once, negotiates an API
//! version per service, binds the endpoint, and memoizes the result so
//! every caller of the same service shares one client. The
//! [`services`] modules carry the per-service version tables and thin
//! request helpers on top of the negotiated client.

#![forbid(unsafe_code)]

mod error;
mod registry;
pub mod services;

pub use self::error::{Error, Result};
pub use self::registry::{ClientRegistry, ServiceClient};
