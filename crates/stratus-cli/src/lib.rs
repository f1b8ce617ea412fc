//! # stratus-cli
//!
//! Stratus command-line interface.
//!
//! Provides commands for:
//! - API version inspection and negotiation
//! - Resource listing across cloud services
//! - Object-store container and object listings
//!
//! # Architecture
//!
//! The CLI builds a [`stratus_client::ClientRegistry`] from the
//! `--os-*` flags (or their `OS_*` environment variables), which
//! authenticates against the identity service and negotiates an API
//! version per service on first use.
//!
//! ```text
//! ┌─────────┐   discovery + auth    ┌────────────────┐
//! │ stratus │◄─────────────────────►│ cloud services │
//! └─────────┘      (HTTP/JSON)      └────────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

pub use cli::{Cli, Commands, Format};
pub use error::CliError;
pub use output::OutputFormat;
