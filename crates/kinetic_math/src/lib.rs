//! # kinetic_math
//!
//! Math types for the kinetic action scheduler. Re-exports [`glam`] for linear
//! algebra and defines the spatial types the scheduler writes back to its
//! host: transforms, look rotations, and the boxes random floats sample from.

pub mod region;
pub mod transform;

// glam types that appear in the public API of the kinetic crates.
pub use glam::{EulerRot, Quat, Vec3};

pub use region::{Aabb, sample_point, sample_symmetric};
pub use transform::{Transform3D, look_rotation};
