//! Levitation: an unbounded series of short random hops inside a box.
//!
//! While the caller's [`HoldFlag`] stays up, the entity is force-written
//! every tick: it interpolates from its previous pose to a pose sampled from
//! its [`FloatRegion`], and on arrival immediately samples the next one. The
//! flag is checked at the start of every tick, so the loop ends at most one
//! tick after the flag drops and leaves the entity where the last tick put
//! it. The loop also ends if the host hands the entity back to its own
//! physics.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use kinetic_math::{Aabb, EulerRot, Quat, Transform3D, Vec3, sample_point, sample_symmetric};
use kinetic_task::{TaskArgs, TaskPoll, Tick};
use kinetic_world::{Entity, WorldError};
use rand::Rng;
use tracing::{debug, warn};

use crate::MotionHost;
use crate::config::FloatConfig;

/// Shared "keep floating" switch, owned by whoever triggered the float.
///
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct HoldFlag(Arc<AtomicBool>);

impl HoldFlag {
    /// Create a flag in the given state.
    #[must_use]
    pub fn new(held: bool) -> Self {
        Self(Arc::new(AtomicBool::new(held)))
    }

    /// Raise the flag.
    pub fn hold(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Drop the flag; any float polling it ends on its next tick.
    pub fn release(&self) {
        self.0.store(false, Ordering::Release);
    }

    /// Returns `true` while the flag is up.
    #[must_use]
    pub fn is_held(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// The box an entity floats in, plus the tilt range of sampled rotations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatRegion {
    /// Positions are sampled inside this box.
    pub bounds: Aabb,
    /// Largest absolute Euler tilt per axis (x = pitch, y = yaw, z = roll).
    pub max_tilt: Vec3,
}

impl FloatRegion {
    /// Region anchored at `anchor` with the configured offsets.
    #[must_use]
    pub fn anchored(anchor: Vec3, config: &FloatConfig) -> Self {
        Self {
            bounds: Aabb::around(anchor, config.region_min, config.region_max),
            max_tilt: config.max_tilt.abs(),
        }
    }

    /// Sample a pose: a position inside the box and a tilt of
    /// `base_rotation` within the tilt range.
    pub fn sample<R: Rng>(&self, rng: &mut R, base_rotation: Quat) -> Transform3D {
        let position = sample_point(rng, &self.bounds);
        let tilt = sample_symmetric(rng, self.max_tilt);
        let rotation = base_rotation * Quat::from_euler(EulerRot::YXZ, tilt.y, tilt.x, tilt.z);
        Transform3D::from_position_rotation(position, rotation.normalize())
    }
}

/// Outcome of one levitation tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LevitationStep {
    /// The entity was written; `progress` is through the current hop.
    Hovering {
        /// Hop progress in `[0, 1]`.
        progress: f32,
    },
    /// The float is over; nothing was written this tick.
    Ended,
}

/// State of one levitating entity.
#[derive(Debug, Clone)]
pub struct Levitation {
    actor: Entity,
    region: FloatRegion,
    hop_duration: f32,
    base_rotation: Quat,
    scale: Vec3,
    from: Transform3D,
    to: Transform3D,
    elapsed: f32,
    hops: u32,
}

impl Levitation {
    /// Take hold of `actor` and pick its first hop.
    ///
    /// The float region is anchored on the actor's current position, and the
    /// actor is marked externally driven.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownEntity`] if the actor does not exist.
    pub fn begin<R: Rng>(
        host: &mut MotionHost,
        actor: Entity,
        config: &FloatConfig,
        rng: &mut R,
    ) -> Result<Self, WorldError> {
        let start = host
            .transform(actor)
            .ok_or(WorldError::UnknownEntity(actor))?;
        host.set_externally_driven(actor, true)?;

        let region = FloatRegion::anchored(start.position, config);
        let to = region.sample(rng, start.rotation);
        debug!(%actor, anchor = %start.position, "levitation started");
        Ok(Self {
            actor,
            region,
            hop_duration: config.hop_duration,
            base_rotation: start.rotation,
            scale: start.scale,
            from: start,
            to: Transform3D { scale: start.scale, ..to },
            elapsed: 0.0,
            hops: 0,
        })
    }

    /// The levitating entity.
    #[must_use]
    pub fn actor(&self) -> Entity {
        self.actor
    }

    /// The region hop targets are drawn from.
    #[must_use]
    pub fn region(&self) -> &FloatRegion {
        &self.region
    }

    /// Pose the current hop is heading for.
    #[must_use]
    pub fn current_target(&self) -> Transform3D {
        self.to
    }

    /// Number of completed hops.
    #[must_use]
    pub fn hops(&self) -> u32 {
        self.hops
    }

    /// Advance by `dt` seconds.
    ///
    /// Returns [`LevitationStep::Ended`] without writing when `hold` is down
    /// or the host no longer treats the actor as externally driven.
    pub fn step<R: Rng>(
        &mut self,
        host: &mut MotionHost,
        hold: &HoldFlag,
        dt: f32,
        rng: &mut R,
    ) -> LevitationStep {
        if !hold.is_held() {
            debug!(actor = %self.actor, hops = self.hops, "hold released, float ends");
            return LevitationStep::Ended;
        }
        if !host.is_externally_driven(self.actor) {
            debug!(actor = %self.actor, "host released the actor, float ends");
            return LevitationStep::Ended;
        }

        self.elapsed += dt;
        let progress = (self.elapsed / self.hop_duration).min(1.0);
        let pose = self.from.lerp(&self.to, progress);
        if let Err(err) = host.set_transform(self.actor, pose) {
            warn!(%err, "levitating actor vanished");
            return LevitationStep::Ended;
        }

        if progress >= 1.0 {
            self.hops += 1;
            self.from = self.to;
            let next = self.region.sample(rng, self.base_rotation);
            self.to = Transform3D {
                scale: self.scale,
                ..next
            };
            self.elapsed = 0.0;
        }
        LevitationStep::Hovering { progress }
    }
}

/// `levitate(actor)`: float the actor until `hold` drops.
///
/// Reports [`TaskPoll::Running`] while hovering and [`TaskPoll::Done`] on the
/// tick the float ends. The actor stays externally driven afterwards; queue
/// a `release` to hand it back to host physics.
pub fn levitate<R: Rng + 'static>(
    config: FloatConfig,
    hold: HoldFlag,
    mut rng: R,
) -> impl FnMut(&mut MotionHost, Tick, &TaskArgs) -> TaskPoll + 'static {
    let mut levitation: Option<Levitation> = None;
    move |host, tick, args| {
        let actor = match args.entity(0) {
            Ok(actor) => actor,
            Err(err) => {
                warn!(%err, "levitate: bad arguments");
                return TaskPoll::Pending;
            }
        };
        if levitation.is_none() {
            if !hold.is_held() {
                return TaskPoll::Done;
            }
            match Levitation::begin(host, actor, &config, &mut rng) {
                Ok(started) => levitation = Some(started),
                Err(err) => {
                    debug!(%err, "levitate: actor not present");
                    return TaskPoll::Pending;
                }
            }
        }
        let Some(state) = levitation.as_mut() else {
            return TaskPoll::Pending;
        };
        match state.step(host, &hold, tick.dt(), &mut rng) {
            LevitationStep::Hovering { .. } => TaskPoll::Running,
            LevitationStep::Ended => {
                levitation = None;
                TaskPoll::Done
            }
        }
    }
}
