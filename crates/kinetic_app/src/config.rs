//! Driver configuration: tick pacing plus the library configs, loadable from
//! a JSON file.

use std::path::Path;

use anyhow::{Context, Result, bail};
use kinetic_motion::MotionConfig;
use kinetic_task::ExecutorConfig;
use serde::{Deserialize, Serialize};

/// Configuration for the driver tick loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickConfig {
    /// Target ticks per second.
    pub tick_rate: f64,
    /// Maximum number of ticks to run (0 = until the scenario finishes).
    pub max_ticks: u64,
}

impl TickConfig {
    /// Fixed delta per tick, in seconds.
    #[must_use]
    pub fn dt(&self) -> f32 {
        (1.0 / self.tick_rate) as f32
    }
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            max_ticks: 0,
        }
    }
}

/// Everything the driver can be configured with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tick: TickConfig,
    pub executor: ExecutorConfig,
    pub motion: MotionConfig,
}

impl AppConfig {
    /// Read a JSON config file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Reject values the tick loop or the tasks cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !self.tick.tick_rate.is_finite() || self.tick.tick_rate <= 0.0 {
            bail!("tick_rate must be a positive number of ticks per second");
        }
        self.executor.validate()?;
        self.motion.validate()?;
        Ok(())
    }
}
