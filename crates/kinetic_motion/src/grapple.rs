//! Grapple tasks: spawn the tether, pull the entity, orient it, release it.
//!
//! Each constructor returns a task callback for a [`MotionRegistry`]. State
//! that must survive between ticks (the traversal in flight) lives in the
//! closure; arguments are re-read on every attempt.
//!
//! | task             | arguments                                   |
//! |------------------|---------------------------------------------|
//! | `spawn_tether`   | `actor: entity, origin: entity, target: point` |
//! | `interpolate_to` | `actor: entity, origin: entity, target: point` |
//! | `orient`         | `actor: entity, target: point, normal: point`  |
//! | `release`        | `actor: entity, origin: entity`                |
//!
//! `origin` is the entity that owns the tether visual (a hand or a launcher);
//! it may be the actor itself.
//!
//! [`MotionRegistry`]: crate::MotionRegistry

use kinetic_math::{Transform3D, Vec3, look_rotation};
use kinetic_task::{ArgError, TaskArgs, TaskPoll, Tick};
use kinetic_world::Entity;
use tracing::{debug, warn};

use crate::MotionHost;
use crate::config::GrappleConfig;
use crate::tether::TetherPose;
use crate::traversal::Traversal;

/// Squared length below which a direction is treated as zero.
const DEGENERATE_EPSILON: f32 = 1.0e-10;

fn pull_args(args: &TaskArgs) -> Result<(Entity, Entity, Vec3), ArgError> {
    Ok((args.entity(0)?, args.entity(1)?, args.point(2)?))
}

fn orient_args(args: &TaskArgs) -> Result<(Entity, Vec3, Vec3), ArgError> {
    Ok((args.entity(0)?, args.point(1)?, args.point(2)?))
}

fn release_args(args: &TaskArgs) -> Result<(Entity, Entity), ArgError> {
    Ok((args.entity(0)?, args.entity(1)?))
}

/// `spawn_tether(actor, origin, target)`: attach a tether visual to `origin`
/// spanning from the actor to the target point.
pub fn spawn_tether() -> impl FnMut(&mut MotionHost, Tick, &TaskArgs) -> TaskPoll + 'static {
    |host, _tick, args| {
        let (actor, origin, target) = match pull_args(args) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(%err, "spawn_tether: bad arguments");
                return TaskPoll::Pending;
            }
        };
        let Some(start) = host.position(actor) else {
            debug!(%actor, "spawn_tether: actor not present yet");
            return TaskPoll::Pending;
        };
        let pose = TetherPose::between(start, target);
        match host.spawn_tether(origin, pose.to_transform()) {
            Ok(tether) => {
                debug!(%origin, %tether, length = pose.length, "tether spawned");
                TaskPoll::Done
            }
            Err(err) => {
                debug!(%err, "spawn_tether: origin not present yet");
                TaskPoll::Pending
            }
        }
    }
}

/// `interpolate_to(actor, origin, target)`: pull the actor in a straight line
/// to the target at the configured speed.
///
/// The first attempt for an actor and target captures the actor's position
/// as the traversal origin. Every tick the actor is held externally driven,
/// moved to the interpolated position facing the target, and the origin's
/// tether (if any) is shortened to match. Reports [`TaskPoll::Running`] until
/// the target is reached, then [`TaskPoll::Done`] on that tick only.
///
/// Completion rewinds the traversal without forgetting it: polling again with
/// the same actor and target replays the same curve from the same origin. A
/// different actor or target starts a fresh traversal.
pub fn interpolate_to(
    config: GrappleConfig,
) -> impl FnMut(&mut MotionHost, Tick, &TaskArgs) -> TaskPoll + 'static {
    let mut traversal: Option<(Entity, Traversal)> = None;
    move |host, tick, args| {
        let (actor, origin, target) = match pull_args(args) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(%err, "interpolate_to: bad arguments");
                return TaskPoll::Pending;
            }
        };
        let Some(current) = host.transform(actor) else {
            debug!(%actor, "interpolate_to: actor not present");
            traversal = None;
            return TaskPoll::Pending;
        };
        if let Err(err) = host.set_externally_driven(actor, true) {
            warn!(%err, "interpolate_to: could not freeze actor");
            return TaskPoll::Pending;
        }

        if traversal
            .as_ref()
            .is_some_and(|(pulled, state)| *pulled != actor || state.target() != target)
        {
            traversal = None;
        }
        let (_, state) = traversal.get_or_insert_with(|| {
            let state = Traversal::new(current.position, target, config.speed);
            debug!(
                %actor,
                distance = state.total_length(),
                total_time = state.total_time(),
                "pull started"
            );
            (actor, state)
        });
        let step = state.advance(tick.dt());

        let moved = Transform3D {
            position: step.position,
            ..current
        }
        .facing(target);
        if let Err(err) = host.set_transform(actor, moved) {
            warn!(%err, "interpolate_to: actor vanished mid-pull");
            traversal = None;
            return TaskPoll::Pending;
        }

        if let Some(tether) = host.tether_of(origin) {
            let pose = TetherPose::at_progress(state, step.progress);
            if let Err(err) = host.set_transform(tether, pose.to_transform()) {
                debug!(%err, "interpolate_to: tether update skipped");
            }
        }

        if step.finished {
            debug!(%actor, position = %step.position, "pull finished");
            state.reset();
            TaskPoll::Done
        } else {
            TaskPoll::Running
        }
    }
}

/// `orient(actor, target, normal)`: stand the actor on a surface.
///
/// The actor's up axis becomes the surface normal (`+Y` when the normal is
/// zero) and it faces the target projected onto the surface plane.
pub fn orient() -> impl FnMut(&mut MotionHost, Tick, &TaskArgs) -> TaskPoll + 'static {
    |host, _tick, args| {
        let (actor, target, normal) = match orient_args(args) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(%err, "orient: bad arguments");
                return TaskPoll::Pending;
            }
        };
        let Some(current) = host.transform(actor) else {
            return TaskPoll::Pending;
        };

        let rotation = surface_rotation(target - current.position, normal);
        match host.set_transform(actor, Transform3D { rotation, ..current }) {
            Ok(()) => TaskPoll::Done,
            Err(err) => {
                debug!(%err, "orient: actor not present");
                TaskPoll::Pending
            }
        }
    }
}

/// Rotation with up along `normal` and forward along `toward` projected onto
/// the plane the normal defines.
#[must_use]
pub fn surface_rotation(toward: Vec3, normal: Vec3) -> kinetic_math::Quat {
    let up = normal.try_normalize().unwrap_or(Vec3::Y);
    let mut forward = toward - up * toward.dot(up);
    if forward.length_squared() <= DEGENERATE_EPSILON {
        forward = up.any_orthonormal_vector();
    }
    look_rotation(forward, up)
}

/// `release(actor, origin)`: hand the actor back to host physics and remove
/// the origin's tether.
pub fn release() -> impl FnMut(&mut MotionHost, Tick, &TaskArgs) -> TaskPoll + 'static {
    |host, _tick, args| {
        let (actor, origin) = match release_args(args) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(%err, "release: bad arguments");
                return TaskPoll::Pending;
            }
        };
        if let Err(err) = host.set_externally_driven(actor, false) {
            debug!(%err, "release: actor not present");
            return TaskPoll::Pending;
        }
        if let Some(tether) = host.tether_of(origin) {
            host.despawn(tether);
        }
        debug!(%actor, "released");
        TaskPoll::Done
    }
}
