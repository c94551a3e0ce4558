//! # kinetic_motion
//!
//! Motion tasks for the kinetic scheduler: the grapple pull with its
//! shrinking tether, surface orientation, release, and the levitation float.
//!
//! Tasks operate on any [`TransformHost`](kinetic_world::TransformHost)
//! through [`MotionHost`]. [`motion_registry`] registers them all, and
//! [`grapple_sequence`] / [`levitation_sequence`] build the standard task
//! lists to hand to a [`MotionExecutor`].

pub mod builtin;
pub mod config;
pub mod float;
pub mod grapple;
pub mod tether;
pub mod traversal;

/// The host type motion tasks run against.
pub type MotionHost = dyn kinetic_world::TransformHost;

pub use builtin::{
    MotionExecutor, MotionRegistry, MotionTask, grapple_sequence, levitation_sequence,
    motion_registry,
};
pub use config::{FloatConfig, GrappleConfig, MotionConfig};
pub use float::{FloatRegion, HoldFlag, Levitation, LevitationStep};
pub use tether::TetherPose;
pub use traversal::{Traversal, TraversalStep};
