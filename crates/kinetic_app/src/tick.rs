//! Driver tick loop.
//!
//! Each tick:
//!
//! 1. Drop the hold flag once the scenario's hold time has elapsed.
//! 2. Step the executor (at most one attempt on the current record).
//! 3. Integrate host physics for every body the tasks are not driving.
//! 4. Advance the tick counter.
//!
//! The loop stops when the executor goes idle or the tick budget runs out.

use std::time::Duration;

use anyhow::Result;
use kinetic_math::Vec3;
use kinetic_motion::{HoldFlag, MotionExecutor};
use kinetic_task::{ExecutorStatus, Tick};
use kinetic_world::SimWorld;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::TickConfig;

/// Gravity applied by the in-memory host physics.
pub const GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);

/// The driver's tick loop state.
pub struct TickLoop {
    tick_id: u64,
    config: TickConfig,
    world: SimWorld,
    executor: MotionExecutor,
    hold: HoldFlag,
    /// Simulated seconds after which `hold` is dropped.
    hold_secs: Option<f32>,
    elapsed: f32,
}

impl TickLoop {
    /// Create a loop over `world` driven by `executor`.
    #[must_use]
    pub fn new(config: TickConfig, world: SimWorld, executor: MotionExecutor, hold: HoldFlag) -> Self {
        Self {
            tick_id: 0,
            config,
            world,
            executor,
            hold,
            hold_secs: None,
            elapsed: 0.0,
        }
    }

    /// Drop the hold flag after `secs` of simulated time.
    #[must_use]
    pub fn with_hold_secs(mut self, secs: f32) -> Self {
        self.hold_secs = Some(secs);
        self
    }

    /// Returns the current tick counter.
    #[must_use]
    pub fn tick_id(&self) -> u64 {
        self.tick_id
    }

    #[must_use]
    pub fn world(&self) -> &SimWorld {
        &self.world
    }

    #[must_use]
    pub fn executor(&self) -> &MotionExecutor {
        &self.executor
    }

    pub fn executor_mut(&mut self) -> &mut MotionExecutor {
        &mut self.executor
    }

    /// Run one tick with a fixed delta.
    pub fn tick(&mut self, dt: f32) -> Result<ExecutorStatus> {
        self.tick_id += 1;
        self.elapsed += dt;

        if let Some(limit) = self.hold_secs {
            if self.elapsed >= limit && self.hold.is_held() {
                info!(tick_id = self.tick_id, elapsed = self.elapsed, "hold released");
                self.hold.release();
            }
        }

        let tick = Tick::new(self.tick_id, dt)?;
        let status = self.executor.step(&mut self.world, tick);
        self.world.integrate(dt, GRAVITY);

        debug!(
            tick_id = self.tick_id,
            dt,
            current = ?self.executor.current(),
            "tick done"
        );
        Ok(status)
    }

    /// Run until the executor goes idle or `max_ticks` is reached, pacing
    /// ticks at the configured rate.
    pub async fn run_async(&mut self) -> Result<()> {
        let tick_duration = Duration::from_secs_f64(1.0 / self.config.tick_rate);
        let dt = self.config.dt();
        let mut interval = tokio::time::interval(tick_duration);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            tick_rate = self.config.tick_rate,
            max_ticks = self.config.max_ticks,
            "starting tick loop"
        );

        loop {
            interval.tick().await;
            let start = Instant::now();

            let status = self.tick(dt)?;
            if status == ExecutorStatus::Idle {
                info!(ticks = self.tick_id, "scenario finished");
                break;
            }
            if self.config.max_ticks > 0 && self.tick_id >= self.config.max_ticks {
                warn!(ticks = self.tick_id, "tick budget exhausted before the scenario finished");
                break;
            }

            let elapsed = start.elapsed();
            if elapsed > tick_duration {
                warn!(
                    tick_id = self.tick_id,
                    elapsed_ms = elapsed.as_millis() as u64,
                    budget_ms = tick_duration.as_millis() as u64,
                    "tick exceeded time budget"
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use kinetic_math::Transform3D;
    use kinetic_motion::{MotionConfig, grapple_sequence, levitation_sequence, motion_registry};
    use kinetic_task::RecordOutcome;
    use kinetic_world::TransformHost;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn tick_loop(hold: HoldFlag, max_ticks: u64) -> TickLoop {
        let registry = motion_registry(&MotionConfig::default(), hold.clone(), StdRng::seed_from_u64(5));
        let config = TickConfig {
            tick_rate: 1000.0,
            max_ticks,
        };
        TickLoop::new(config, SimWorld::new(), MotionExecutor::new(registry), hold)
    }

    #[test]
    fn test_tick_advances_counter() {
        let mut tick_loop = tick_loop(HoldFlag::default(), 0);
        assert_eq!(tick_loop.tick_id(), 0);
        assert_eq!(tick_loop.tick(1.0 / 60.0).unwrap(), ExecutorStatus::Idle);
        assert_eq!(tick_loop.tick_id(), 1);
    }

    #[test]
    fn test_hold_released_after_deadline() {
        let hold = HoldFlag::new(true);
        let mut tick_loop = tick_loop(hold.clone(), 0).with_hold_secs(0.25);
        for _ in 0..2 {
            tick_loop.tick(0.1).unwrap();
        }
        assert!(hold.is_held());
        tick_loop.tick(0.1).unwrap();
        assert!(!hold.is_held());
    }

    #[tokio::test]
    async fn test_run_grapple_to_completion() {
        let mut tick_loop = tick_loop(HoldFlag::default(), 0);
        let actor = tick_loop.world.spawn_body(Transform3D::IDENTITY);
        let target = Vec3::new(0.0, 0.0, -1.0);
        tick_loop
            .executor
            .run(grapple_sequence(actor, actor, target, Vec3::Y));

        tick_loop.run_async().await.unwrap();

        assert!(tick_loop.executor().is_idle());
        assert_eq!(tick_loop.executor().outcomes().len(), 4);
        assert!(
            tick_loop
                .executor()
                .outcomes()
                .iter()
                .all(|r| r.outcome == RecordOutcome::Succeeded)
        );
        assert!(!tick_loop.world().is_externally_driven(actor));
    }

    #[tokio::test]
    async fn test_run_stops_at_tick_budget() {
        let hold = HoldFlag::new(true);
        let mut tick_loop = tick_loop(hold.clone(), 5);
        let actor = tick_loop.world.spawn_body(Transform3D::IDENTITY);
        tick_loop.executor.run(levitation_sequence(actor));

        tick_loop.run_async().await.unwrap();

        assert_eq!(tick_loop.tick_id(), 5);
        assert_eq!(tick_loop.executor().current(), Some(kinetic_motion::MotionTask::Levitate));
        assert!(hold.is_held());
    }
}
