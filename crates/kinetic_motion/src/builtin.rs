//! Built-in motion tasks and the sequences that use them.

use kinetic_math::Vec3;
use kinetic_task::{TaskArgs, TaskInvocation, TaskRegistry};
use kinetic_world::Entity;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::MotionHost;
use crate::config::MotionConfig;
use crate::float::{HoldFlag, levitate};
use crate::grapple::{interpolate_to, orient, release, spawn_tether};

/// Every task a motion registry knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionTask {
    /// `spawn_tether(actor, origin, target)`.
    SpawnTether,
    /// `interpolate_to(actor, origin, target)`.
    InterpolateTo,
    /// `orient(actor, target, normal)`.
    Orient,
    /// `release(actor, origin)`.
    Release,
    /// `levitate(actor)`.
    Levitate,
}

impl MotionTask {
    /// All built-in tasks.
    pub const ALL: [MotionTask; 5] = [
        MotionTask::SpawnTether,
        MotionTask::InterpolateTo,
        MotionTask::Orient,
        MotionTask::Release,
        MotionTask::Levitate,
    ];

    /// The task's wire name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            MotionTask::SpawnTether => "spawn_tether",
            MotionTask::InterpolateTo => "interpolate_to",
            MotionTask::Orient => "orient",
            MotionTask::Release => "release",
            MotionTask::Levitate => "levitate",
        }
    }

    /// Look a task up by its wire name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|task| task.name() == name)
    }
}

impl std::fmt::Display for MotionTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Registry of motion tasks over a host.
pub type MotionRegistry = TaskRegistry<MotionTask, MotionHost>;

/// Executor of motion tasks over a host.
pub type MotionExecutor = kinetic_task::Executor<MotionTask, MotionHost>;

/// Build a registry holding every built-in task.
///
/// `hold` is the levitation switch and `rng` its random source; both belong
/// to this registry's sequence only.
pub fn motion_registry<R: Rng + 'static>(config: &MotionConfig, hold: HoldFlag, rng: R) -> MotionRegistry {
    let mut registry = MotionRegistry::new();
    registry.register(MotionTask::SpawnTether, spawn_tether());
    registry.register(MotionTask::InterpolateTo, interpolate_to(config.grapple));
    registry.register(MotionTask::Orient, orient());
    registry.register(MotionTask::Release, release());
    registry.register(MotionTask::Levitate, levitate(config.float, hold, rng));
    registry
}

/// The grapple pull: tether out, pull in, stand on the surface, let go.
#[must_use]
pub fn grapple_sequence(
    actor: Entity,
    origin: Entity,
    target: Vec3,
    normal: Vec3,
) -> Vec<TaskInvocation<MotionTask>> {
    let pull = TaskArgs::new().with(actor).with(origin).with(target);
    vec![
        TaskInvocation::new(MotionTask::SpawnTether, pull.clone()),
        TaskInvocation::new(MotionTask::InterpolateTo, pull),
        TaskInvocation::new(
            MotionTask::Orient,
            TaskArgs::new().with(actor).with(target).with(normal),
        ),
        TaskInvocation::new(MotionTask::Release, TaskArgs::new().with(actor).with(origin)),
    ]
}

/// The levitation hold: float until the flag drops, then let go.
#[must_use]
pub fn levitation_sequence(actor: Entity) -> Vec<TaskInvocation<MotionTask>> {
    vec![
        TaskInvocation::new(MotionTask::Levitate, TaskArgs::new().with(actor)),
        TaskInvocation::new(MotionTask::Release, TaskArgs::new().with(actor).with(actor)),
    ]
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_registry_holds_every_builtin() {
        let registry = motion_registry(
            &MotionConfig::default(),
            HoldFlag::default(),
            StdRng::seed_from_u64(0),
        );
        assert_eq!(registry.len(), MotionTask::ALL.len());
        assert!(MotionTask::ALL.iter().all(|task| registry.contains(*task)));
    }

    #[test]
    fn test_names_round_trip() {
        for task in MotionTask::ALL {
            assert_eq!(MotionTask::from_name(task.name()), Some(task));
        }
        assert_eq!(MotionTask::from_name("teleport"), None);
        assert_eq!(MotionTask::InterpolateTo.to_string(), "interpolate_to");
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&MotionTask::SpawnTether).unwrap();
        assert_eq!(json, "\"spawn_tether\"");
    }

    #[test]
    fn test_grapple_sequence_order() {
        let keys: Vec<MotionTask> = grapple_sequence(
            Entity::from_raw(1),
            Entity::from_raw(2),
            Vec3::X,
            Vec3::Y,
        )
        .into_iter()
        .map(|r| r.key)
        .collect();
        assert_eq!(
            keys,
            vec![
                MotionTask::SpawnTether,
                MotionTask::InterpolateTo,
                MotionTask::Orient,
                MotionTask::Release,
            ]
        );
    }
}
