//! # kinetic_world
//!
//! The scheduler's view of the host simulation.
//!
//! This crate provides:
//!
//! - [`Entity`]: opaque handles to host-owned entities.
//! - [`EntityAllocator`]: hands out handles that are never recycled.
//! - [`TransformHost`]: the transform primitives tasks read and force-write.
//! - [`SimWorld`]: an in-memory host with a minimal physics step.

pub mod entity;
pub mod error;
pub mod host;
pub mod world;

pub use entity::{Entity, EntityAllocator};
pub use error::WorldError;
pub use host::TransformHost;
pub use world::{Body, BodyKind, SimWorld};
