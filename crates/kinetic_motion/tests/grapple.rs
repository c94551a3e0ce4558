//! End-to-end grapple pulls driven through the executor.

use kinetic_math::{Transform3D, Vec3};
use kinetic_motion::{
    HoldFlag, MotionConfig, MotionExecutor, MotionTask, grapple_sequence, motion_registry,
};
use kinetic_task::{ExecutorStatus, RecordOutcome, Tick};
use kinetic_world::{Entity, SimWorld, TransformHost};
use rand::SeedableRng;
use rand::rngs::StdRng;

const GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);

fn executor() -> MotionExecutor {
    let registry = motion_registry(
        &MotionConfig::default(),
        HoldFlag::default(),
        StdRng::seed_from_u64(0),
    );
    MotionExecutor::new(registry)
}

#[test]
fn test_grapple_pulls_actor_to_target() {
    let mut world = SimWorld::new();
    let actor = world.spawn_body(Transform3D::IDENTITY);
    let target = Vec3::new(10.0, 0.0, 0.0);
    let normal = Vec3::new(-1.0, 0.0, 0.0);

    let mut executor = executor();
    executor.run(grapple_sequence(actor, actor, target, normal));

    let mut xs = Vec::new();
    let mut tether_lengths = Vec::new();
    let mut index = 0;
    while executor.status() == ExecutorStatus::Busy {
        index += 1;
        assert!(index < 100, "grapple never finished");
        executor.step(&mut world, Tick::new(index, 0.02).unwrap());

        if executor.current() == Some(MotionTask::InterpolateTo)
            || executor.outcomes().len() == 2
        {
            xs.push(world.position(actor).unwrap().x);
            if let Some(tether) = world.tether_of(actor) {
                tether_lengths.push(world.transform(tether).unwrap().scale.z);
            }
        }
        if executor.is_idle() {
            break;
        }
        world.integrate(0.02, GRAVITY);
    }

    assert!(
        executor
            .outcomes()
            .iter()
            .all(|r| r.outcome == RecordOutcome::Succeeded)
    );
    assert_eq!(executor.outcomes().len(), 4);

    // Pulled in a straight line without gravity sag.
    assert_eq!(world.position(actor), Some(target));
    assert!(xs.windows(2).all(|w| w[1] >= w[0]));
    assert!(tether_lengths.windows(2).all(|w| w[1] <= w[0]));
    assert_eq!(tether_lengths.last().copied(), Some(0.0));

    // Oriented on the wall, tether removed, physics restored.
    let rotation = world.transform(actor).unwrap().rotation;
    assert!((rotation * Vec3::Y).abs_diff_eq(normal, 1.0e-5));
    assert_eq!(world.tether_of(actor), None);
    assert!(!world.is_externally_driven(actor));
}

#[test]
fn test_frozen_actor_ignores_gravity_during_pull() {
    let mut world = SimWorld::new();
    let actor = world.spawn_body(Transform3D::IDENTITY);
    let target = Vec3::new(0.0, 0.0, -20.0);

    let mut executor = executor();
    executor.run(grapple_sequence(actor, actor, target, Vec3::Y));
    executor.step(&mut world, Tick::new(1, 0.05).unwrap());
    assert_eq!(executor.outcomes().len(), 1);

    // Momentum picked up before the pull is discarded when it freezes the actor.
    world.set_velocity(actor, Vec3::new(0.0, 30.0, 0.0)).unwrap();

    let mut previous_z = 0.0;
    for index in 2..=7 {
        executor.step(&mut world, Tick::new(index, 0.05).unwrap());
        world.integrate(0.05, GRAVITY);

        let position = world.position(actor).unwrap();
        assert_eq!(position.x, 0.0);
        assert_eq!(position.y, 0.0);
        assert!(position.z < previous_z);
        previous_z = position.z;
    }
    assert_eq!(world.body(actor).unwrap().velocity, Vec3::ZERO);
}

#[test]
fn test_missing_actor_times_out_every_record() {
    let mut world = SimWorld::new();
    let ghost = Entity::from_raw(404);

    let mut executor = executor();
    executor.run(grapple_sequence(ghost, ghost, Vec3::X, Vec3::Y));

    let mut ticks = 0;
    while !executor.is_idle() {
        ticks += 1;
        executor.step(&mut world, Tick::new(ticks, 0.5).unwrap());
    }

    // Each record needs 7 half-second ticks to exceed the 3 second ceiling.
    assert_eq!(ticks, 28);
    assert!(
        executor
            .outcomes()
            .iter()
            .all(|r| r.outcome == RecordOutcome::TimedOut)
    );
    assert_eq!(world.body_count(), 0);
}

#[test]
fn test_removed_task_is_skipped_in_sequence() {
    let mut world = SimWorld::new();
    let actor = world.spawn_body(Transform3D::IDENTITY);

    let mut executor = executor();
    executor.registry_mut().remove(MotionTask::SpawnTether);
    executor.run(grapple_sequence(actor, actor, Vec3::new(0.0, 0.0, -1.0), Vec3::Y));

    assert!(executor.outcomes().is_empty());

    // The skip and the pull's first attempt share the first tick.
    executor.step(&mut world, Tick::new(1, 0.1).unwrap());
    assert_eq!(executor.outcomes()[0].outcome, RecordOutcome::Skipped);
    assert_eq!(executor.outcomes()[0].attempts, 0);
    assert_eq!(executor.outcomes()[1].key, MotionTask::InterpolateTo);

    let mut index = 1;
    while !executor.is_idle() {
        index += 1;
        executor.step(&mut world, Tick::new(index, 0.1).unwrap());
    }
    assert_eq!(world.position(actor), Some(Vec3::new(0.0, 0.0, -1.0)));
    assert_eq!(world.tether_of(actor), None);
}
