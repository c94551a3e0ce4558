//! Tick source abstraction.
//!
//! The scheduler never reads wall-clock time. Every timer (retry ceilings,
//! traversal progress, float hops) accumulates only the deltas carried by
//! [`Tick`]s, so a paused or throttled source pauses all of them uniformly.

use std::collections::VecDeque;

use crate::error::TickError;

/// One simulation frame boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    index: u64,
    dt: f32,
}

impl Tick {
    /// Create a tick, rejecting deltas that are not positive and finite.
    ///
    /// # Errors
    ///
    /// Returns [`TickError`] if `dt` is NaN, infinite, zero, or negative.
    pub fn new(index: u64, dt: f32) -> Result<Self, TickError> {
        if !dt.is_finite() {
            return Err(TickError::NonFinite);
        }
        if dt <= 0.0 {
            return Err(TickError::NonPositive(dt));
        }
        Ok(Self { index, dt })
    }

    /// Monotonic frame counter, starting at 1 for the first tick.
    #[must_use]
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Seconds since the previous tick. Always `> 0`.
    #[must_use]
    pub fn dt(&self) -> f32 {
        self.dt
    }
}

/// Something that yields frame boundaries.
///
/// `None` means the source is exhausted (the simulation stopped).
pub trait TickSource {
    /// Block until the next frame boundary and return it.
    fn next_tick(&mut self) -> Option<Tick>;
}

/// Constant-delta ticks, optionally limited to a number of frames.
#[derive(Debug, Clone)]
pub struct FixedTicks {
    dt: f32,
    remaining: Option<u64>,
    index: u64,
}

impl FixedTicks {
    /// `count` ticks of `dt` seconds each.
    ///
    /// # Errors
    ///
    /// Returns [`TickError`] if `dt` is not positive and finite.
    pub fn new(dt: f32, count: u64) -> Result<Self, TickError> {
        Tick::new(1, dt)?;
        Ok(Self {
            dt,
            remaining: Some(count),
            index: 0,
        })
    }

    /// An endless stream of `dt`-second ticks.
    ///
    /// # Errors
    ///
    /// Returns [`TickError`] if `dt` is not positive and finite.
    pub fn unbounded(dt: f32) -> Result<Self, TickError> {
        Tick::new(1, dt)?;
        Ok(Self {
            dt,
            remaining: None,
            index: 0,
        })
    }
}

impl TickSource for FixedTicks {
    fn next_tick(&mut self) -> Option<Tick> {
        if let Some(remaining) = &mut self.remaining {
            if *remaining == 0 {
                return None;
            }
            *remaining -= 1;
        }
        self.index += 1;
        Some(Tick {
            index: self.index,
            dt: self.dt,
        })
    }
}

/// A pre-recorded sequence of deltas, replayed once.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTicks {
    deltas: VecDeque<f32>,
    index: u64,
}

impl ScriptedTicks {
    /// Replay `deltas` in order.
    ///
    /// # Errors
    ///
    /// Returns [`TickError`] for the first delta that is not positive and
    /// finite.
    pub fn new(deltas: impl IntoIterator<Item = f32>) -> Result<Self, TickError> {
        let deltas: VecDeque<f32> = deltas.into_iter().collect();
        for &dt in &deltas {
            Tick::new(1, dt)?;
        }
        Ok(Self { deltas, index: 0 })
    }

    /// Deltas not yet replayed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.deltas.len()
    }
}

impl TickSource for ScriptedTicks {
    fn next_tick(&mut self) -> Option<Tick> {
        let dt = self.deltas.pop_front()?;
        self.index += 1;
        Some(Tick {
            index: self.index,
            dt,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_rejects_bad_deltas() {
        assert_eq!(Tick::new(1, 0.0), Err(TickError::NonPositive(0.0)));
        assert_eq!(Tick::new(1, -0.5), Err(TickError::NonPositive(-0.5)));
        assert_eq!(Tick::new(1, f32::INFINITY), Err(TickError::NonFinite));
        assert!(Tick::new(1, f32::NAN).is_err());
        assert!(Tick::new(1, 1.0 / 60.0).is_ok());
    }

    #[test]
    fn test_fixed_ticks_count() {
        let mut source = FixedTicks::new(0.5, 3).unwrap();
        let indices: Vec<u64> = std::iter::from_fn(|| source.next_tick())
            .map(|t| t.index())
            .collect();
        assert_eq!(indices, vec![1, 2, 3]);
        assert!(source.next_tick().is_none());
    }

    #[test]
    fn test_unbounded_ticks_keep_going() {
        let mut source = FixedTicks::unbounded(0.016).unwrap();
        for expected in 1..=1000 {
            assert_eq!(source.next_tick().map(|t| t.index()), Some(expected));
        }
    }

    #[test]
    fn test_scripted_ticks_replay_in_order() {
        let mut source = ScriptedTicks::new([0.1, 0.25, 2.0]).unwrap();
        assert_eq!(source.remaining(), 3);
        let deltas: Vec<f32> = std::iter::from_fn(|| source.next_tick())
            .map(|t| t.dt())
            .collect();
        assert_eq!(deltas, vec![0.1, 0.25, 2.0]);
    }

    #[test]
    fn test_scripted_ticks_validate_every_delta() {
        assert!(ScriptedTicks::new([0.1, 0.0]).is_err());
    }
}
