//! Axis-aligned boxes and bounded random sampling.
//!
//! Sampling always clamps its result back into the box, so callers can rely
//! on the bound even when the random source is adversarial or rounding pushes
//! a lerp past the upper corner.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box. `min <= max` holds on every axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Lower corner.
    pub min: Vec3,
    /// Upper corner.
    pub max: Vec3,
}

impl Aabb {
    /// Create a box from two arbitrary corners.
    #[must_use]
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Create a box anchored at `anchor` and spanning the given offsets.
    #[must_use]
    pub fn around(anchor: Vec3, min_offset: Vec3, max_offset: Vec3) -> Self {
        Self::new(anchor + min_offset, anchor + max_offset)
    }

    /// Returns `true` if `point` lies inside the box (bounds inclusive).
    #[must_use]
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Clamp `point` into the box.
    #[must_use]
    pub fn clamp(&self, point: Vec3) -> Vec3 {
        point.clamp(self.min, self.max)
    }

    /// Edge lengths of the box.
    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Point at per-axis fraction `t` between `min` and `max`, clamped into
    /// the box.
    #[must_use]
    pub fn lerp_point(&self, t: Vec3) -> Vec3 {
        self.clamp(self.min + self.size() * t)
    }
}

/// Uniformly sample a point inside `bounds`.
pub fn sample_point<R: Rng>(rng: &mut R, bounds: &Aabb) -> Vec3 {
    bounds.lerp_point(sample_unit(rng))
}

/// Uniformly sample a vector with each component in `[-extent, extent]`.
///
/// Negative extents are treated as their absolute value.
pub fn sample_symmetric<R: Rng>(rng: &mut R, extent: Vec3) -> Vec3 {
    let extent = extent.abs();
    Aabb::new(-extent, extent).lerp_point(sample_unit(rng))
}

fn sample_unit<R: Rng>(rng: &mut R) -> Vec3 {
    Vec3::new(rng.random::<f32>(), rng.random::<f32>(), rng.random::<f32>())
}
