//! CLI command implementations.
//!
//! Each submodule implements a specific CLI command:
//! - [`api`] - API version inspection and negotiation
//! - [`server`] - Compute server listing
//! - [`project`] - Identity project listing
//! - [`image`] - Image listing
//! - [`network`] - Network listing and lookup
//! - [`volume`] - Volume listing
//! - [`container`] - Object-store container listing
//! - [`object`] - Object-store object listing

pub mod api;
pub mod container;
pub mod image;
pub mod network;
pub mod object;
pub mod project;
pub mod server;
pub mod volume;

pub use api::ApiCommand;
pub use container::ContainerCommand;
pub use image::ImageCommand;
pub use network::NetworkCommand;
pub use object::ObjectCommand;
pub use project::ProjectCommand;
pub use server::ServerCommand;
pub use volume::VolumeCommand;
