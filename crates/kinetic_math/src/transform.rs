//! Entity poses and look rotations.
//!
//! Every entity the scheduler drives, and every tether visual it derives, is
//! written back to the host as a [`Transform3D`]. Facing follows the -Z
//! forward convention throughout.

use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Squared length below which a direction is treated as degenerate.
const DEGENERATE_EPSILON: f32 = 1.0e-10;

/// Pose of one host entity: where it is, which way it faces, and how it is
/// stretched. Tether visuals use `scale.z` as their visible length.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Transform3D {
    /// World-space position.
    pub position: Vec3,
    /// Rotation as a unit quaternion.
    pub rotation: Quat,
    /// Per-axis scale factor.
    pub scale: Vec3,
}

impl Transform3D {
    /// The identity transform: origin, no rotation, unit scale.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Unrotated, unscaled transform at `position`.
    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Unit-scale transform at `position` with `rotation`.
    #[must_use]
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Self::IDENTITY
        }
    }

    /// Interpolate towards `other`.
    ///
    /// Position and scale are interpolated linearly, rotation spherically.
    /// `t` is clamped to `[0, 1]`, so `t = 0` returns `self` and `t = 1`
    /// returns `other` exactly.
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        if t >= 1.0 {
            return *other;
        }
        if t <= 0.0 {
            return *self;
        }
        Self {
            position: self.position.lerp(other.position, t),
            rotation: self.rotation.slerp(other.rotation, t),
            scale: self.scale.lerp(other.scale, t),
        }
    }

    /// The direction this transform faces (local -Z in world space).
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Return a copy rotated to face `target` from the current position.
    ///
    /// The rotation is unchanged when `target` coincides with the position.
    #[must_use]
    pub fn facing(mut self, target: Vec3) -> Self {
        let direction = target - self.position;
        if direction.length_squared() > DEGENERATE_EPSILON {
            self.rotation = look_rotation(direction, Vec3::Y);
        }
        self
    }
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Rotation whose local -Z axis points along `forward`, keeping `up` as the
/// reference up direction.
///
/// A zero `forward` yields [`Quat::IDENTITY`]. When `forward` is parallel to
/// `up` there is no unique roll, so the shortest-arc rotation is returned.
#[must_use]
pub fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
    if forward.length_squared() <= DEGENERATE_EPSILON {
        return Quat::IDENTITY;
    }
    let forward = forward.normalize();
    let right = forward.cross(up);
    if right.length_squared() <= DEGENERATE_EPSILON {
        return Quat::from_rotation_arc(Vec3::NEG_Z, forward);
    }
    let right = right.normalize();
    let up = right.cross(forward);
    Quat::from_mat3(&Mat3::from_cols(right, up, -forward)).normalize()
}
