//! Tether visual derived from traversal progress.
//!
//! The tether spans from the pulled entity to the grapple target. It is pure
//! output: its pose is computed from a [`Traversal`] and a progress value and
//! is never read back into the traversal.

use kinetic_math::{Quat, Transform3D, Vec3, look_rotation};

use crate::traversal::Traversal;

/// Pose of the tether visual for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TetherPose {
    /// Centre of the visible span.
    pub midpoint: Vec3,
    /// Visible length; `total_length * (1 - progress)`.
    pub length: f32,
    /// Rotation whose -Z axis points from the midpoint towards the shrinking
    /// (entity-side) end.
    pub rotation: Quat,
}

impl TetherPose {
    /// Pose spanning `near` (the entity side) to `far` (the anchor).
    #[must_use]
    pub fn between(near: Vec3, far: Vec3) -> Self {
        Self {
            midpoint: (near + far) * 0.5,
            length: near.distance(far),
            rotation: look_rotation(near - far, Vec3::Y),
        }
    }

    /// Pose of the tether at `progress` through `traversal`.
    ///
    /// The far end stays pinned to the target while the near end follows the
    /// entity, so the span shrinks linearly to zero at `progress == 1`.
    #[must_use]
    pub fn at_progress(traversal: &Traversal, progress: f32) -> Self {
        let length = traversal.remaining_length(progress);
        let toward_target = traversal.direction().unwrap_or(Vec3::NEG_Z);
        Self {
            midpoint: traversal.target() - toward_target * (length * 0.5),
            length,
            rotation: look_rotation(-toward_target, Vec3::Y),
        }
    }

    /// Transform for the tether entity: a unit-length visual stretched along
    /// its local Z axis.
    #[must_use]
    pub fn to_transform(&self) -> Transform3D {
        Transform3D {
            position: self.midpoint,
            rotation: self.rotation,
            scale: Vec3::new(1.0, 1.0, self.length),
        }
    }
}
