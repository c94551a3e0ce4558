//! Motion task configuration.

use kinetic_math::Vec3;
use kinetic_task::ConfigError;
use serde::{Deserialize, Serialize};

/// Grapple pull speed in world units per second.
pub const DEFAULT_GRAPPLE_SPEED: f32 = 50.0;

/// Seconds spent on one levitation hop.
pub const DEFAULT_HOP_DURATION: f32 = 1.2;

/// Configuration for the grapple pull.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrappleConfig {
    /// Pull speed; traversal time is distance divided by this.
    pub speed: f32,
}

impl GrappleConfig {
    /// Override the pull speed.
    #[must_use]
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }
}

impl Default for GrappleConfig {
    fn default() -> Self {
        Self {
            speed: DEFAULT_GRAPPLE_SPEED,
        }
    }
}

/// Configuration for the levitation float.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloatConfig {
    /// Lower corner of the float box, relative to the entity's start position.
    pub region_min: Vec3,
    /// Upper corner of the float box, relative to the entity's start position.
    pub region_max: Vec3,
    /// Seconds per hop.
    pub hop_duration: f32,
    /// Largest tilt per Euler axis (x = pitch, y = yaw, z = roll), radians.
    pub max_tilt: Vec3,
}

impl FloatConfig {
    /// Override the float box offsets.
    #[must_use]
    pub fn with_region(mut self, min: Vec3, max: Vec3) -> Self {
        self.region_min = min;
        self.region_max = max;
        self
    }

    /// Override the hop duration.
    #[must_use]
    pub fn with_hop_duration(mut self, seconds: f32) -> Self {
        self.hop_duration = seconds;
        self
    }
}

impl Default for FloatConfig {
    fn default() -> Self {
        Self {
            region_min: Vec3::new(-1.5, 0.5, -1.5),
            region_max: Vec3::new(1.5, 2.5, 1.5),
            hop_duration: DEFAULT_HOP_DURATION,
            max_tilt: Vec3::splat(0.26),
        }
    }
}

/// All motion settings, as loaded from a config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Grapple pull settings.
    pub grapple: GrappleConfig,
    /// Levitation settings.
    pub float: FloatConfig,
}

impl MotionConfig {
    /// Check that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.grapple.speed.is_finite() || self.grapple.speed <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "grapple.speed",
                reason: "must be a positive speed",
            });
        }
        let float = &self.float;
        if !float.hop_duration.is_finite() || float.hop_duration <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "float.hop_duration",
                reason: "must be a positive number of seconds",
            });
        }
        if !float.region_min.cmple(float.region_max).all() {
            return Err(ConfigError::Invalid {
                field: "float.region_min",
                reason: "must not exceed region_max on any axis",
            });
        }
        if !float.max_tilt.is_finite() || float.max_tilt.min_element() < 0.0 {
            return Err(ConfigError::Invalid {
                field: "float.max_tilt",
                reason: "must be finite and non-negative",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(MotionConfig::default().validate().is_ok());
        assert_eq!(MotionConfig::default().grapple.speed, 50.0);
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = MotionConfig::default();
        config.grapple = config.grapple.with_speed(0.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "grapple.speed", .. })
        ));

        let mut config = MotionConfig::default();
        config.float = config.float.with_region(Vec3::ONE, Vec3::ZERO);
        assert!(config.validate().is_err());

        let mut config = MotionConfig::default();
        config.float = config.float.with_hop_duration(-1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: MotionConfig =
            serde_json::from_str(r#"{ "grapple": { "speed": 20.0 } }"#).unwrap();
        assert_eq!(config.grapple.speed, 20.0);
        assert_eq!(config.float, FloatConfig::default());
    }
}
