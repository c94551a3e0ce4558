//! Linear traversal state for the grapple pull.
//!
//! A [`Traversal`] owns the interpolation state of one pull: a fixed origin
//! and target, the tick time accumulated so far, and the time budget
//! `distance / speed`. Position is a pure function of progress, so replaying
//! the same deltas after [`reset`](Traversal::reset) reproduces the same curve.

use kinetic_math::Vec3;

/// Result of advancing a traversal by one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraversalStep {
    /// Progress after this tick, in `[0, 1]`.
    pub progress: f32,
    /// Interpolated position after this tick.
    pub position: Vec3,
    /// `true` on the tick where the traversal reached its target.
    pub finished: bool,
}

/// Interpolation state of one origin → target pull.
#[derive(Debug, Clone, PartialEq)]
pub struct Traversal {
    origin: Vec3,
    target: Vec3,
    elapsed: f32,
    total_time: f32,
}

impl Traversal {
    /// Start a traversal at `speed` units per second.
    ///
    /// A zero-length traversal has a zero time budget and finishes on its
    /// first tick.
    #[must_use]
    pub fn new(origin: Vec3, target: Vec3, speed: f32) -> Self {
        let distance = origin.distance(target);
        let total_time = if distance > 0.0 && speed > 0.0 {
            distance / speed
        } else {
            0.0
        };
        Self {
            origin,
            target,
            elapsed: 0.0,
            total_time,
        }
    }

    /// Start position.
    #[must_use]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Goal position.
    #[must_use]
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Seconds accumulated since the traversal started.
    #[must_use]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Time budget for the whole traversal.
    #[must_use]
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Origin-to-target distance.
    #[must_use]
    pub fn total_length(&self) -> f32 {
        self.origin.distance(self.target)
    }

    /// Unit direction from origin to target, or `None` for zero length.
    #[must_use]
    pub fn direction(&self) -> Option<Vec3> {
        (self.target - self.origin).try_normalize()
    }

    /// `clamp(elapsed / total_time, 0, 1)`; `1` once a zero-budget
    /// traversal has been advanced.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.total_time <= 0.0 {
            return if self.elapsed > 0.0 { 1.0 } else { 0.0 };
        }
        (self.elapsed / self.total_time).clamp(0.0, 1.0)
    }

    /// Position at `progress`; exactly `origin` at 0 and `target` at 1.
    #[must_use]
    pub fn position_at(&self, progress: f32) -> Vec3 {
        let progress = progress.clamp(0.0, 1.0);
        if progress >= 1.0 {
            self.target
        } else {
            self.origin.lerp(self.target, progress)
        }
    }

    /// Length of tether still spanning to the target at `progress`.
    #[must_use]
    pub fn remaining_length(&self, progress: f32) -> f32 {
        self.total_length() * (1.0 - progress.clamp(0.0, 1.0))
    }

    /// Accumulate `dt` and return the resulting step.
    pub fn advance(&mut self, dt: f32) -> TraversalStep {
        self.elapsed += dt;
        let finished = self.elapsed >= self.total_time;
        let progress = if finished { 1.0 } else { self.progress() };
        TraversalStep {
            progress,
            position: self.position_at(progress),
            finished,
        }
    }

    /// Rewind to the start; origin and target are unchanged.
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_scenario_half_way() {
        let mut traversal = Traversal::new(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 50.0);
        assert!((traversal.total_time() - 0.2).abs() < 1.0e-6);

        let step = traversal.advance(0.1);
        assert!(!step.finished);
        assert!((step.progress - 0.5).abs() < 1.0e-5);
        assert!(step.position.abs_diff_eq(Vec3::new(5.0, 0.0, 0.0), 1.0e-4));
        assert!((traversal.remaining_length(step.progress) - 5.0).abs() < 1.0e-4);
    }

    #[test]
    fn test_endpoints_are_exact() {
        let traversal = Traversal::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(-7.0, 0.5, 9.0), 3.0);
        assert_eq!(traversal.position_at(0.0), traversal.origin());
        assert_eq!(traversal.position_at(1.0), traversal.target());
        assert_eq!(traversal.remaining_length(1.0), 0.0);
    }

    #[test]
    fn test_finishes_with_target_position() {
        let mut traversal = Traversal::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -3.0), 2.0);
        let mut last = None;
        for _ in 0..100 {
            let step = traversal.advance(0.1);
            if step.finished {
                last = Some(step);
                break;
            }
        }
        let last = last.unwrap();
        assert_eq!(last.progress, 1.0);
        assert_eq!(last.position, Vec3::new(0.0, 0.0, -3.0));
    }

    #[test]
    fn test_zero_distance_finishes_on_first_tick() {
        let mut traversal = Traversal::new(Vec3::ONE, Vec3::ONE, 50.0);
        assert_eq!(traversal.total_time(), 0.0);
        assert_eq!(traversal.direction(), None);
        assert_eq!(traversal.progress(), 0.0);

        let step = traversal.advance(1.0 / 60.0);
        assert!(step.finished);
        assert_eq!(step.progress, 1.0);
        assert_eq!(step.position, Vec3::ONE);
        assert!(step.position.is_finite());
    }

    #[test]
    fn test_reset_replays_identical_curve() {
        let deltas = [0.013, 0.021, 0.017, 0.05, 0.2];
        let mut traversal = Traversal::new(Vec3::new(-2.0, 1.0, 0.0), Vec3::new(4.0, 3.0, 8.0), 12.0);

        let first: Vec<TraversalStep> = deltas.iter().map(|&dt| traversal.advance(dt)).collect();
        traversal.reset();
        assert_eq!(traversal.elapsed(), 0.0);
        let second: Vec<TraversalStep> = deltas.iter().map(|&dt| traversal.advance(dt)).collect();

        assert_eq!(first, second);
    }

    proptest! {
        #[test]
        fn prop_projected_distance_is_monotonic(
            ox in -50.0f32..50.0, oy in -50.0f32..50.0, oz in -50.0f32..50.0,
            tx in -50.0f32..50.0, ty in -50.0f32..50.0, tz in -50.0f32..50.0,
            speed in 1.0f32..100.0,
            deltas in prop::collection::vec(0.001f32..0.1, 1..200),
        ) {
            let origin = Vec3::new(ox, oy, oz);
            let target = Vec3::new(tx, ty, tz);
            let mut traversal = Traversal::new(origin, target, speed);
            let axis = target - origin;
            let tolerance = 1.0e-5 * axis.length_squared().max(1.0);

            let mut previous = 0.0f32;
            let mut previous_progress = 0.0f32;
            for dt in deltas {
                let step = traversal.advance(dt);
                let projected = (step.position - origin).dot(axis);
                prop_assert!(projected >= previous - tolerance);
                prop_assert!(step.progress >= previous_progress);
                prop_assert!((0.0..=1.0).contains(&step.progress));
                previous = projected;
                previous_progress = step.progress;
                if step.finished {
                    prop_assert_eq!(step.position, target);
                    break;
                }
            }
        }
    }
}
