//! Executor configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Accumulated tick time after which a record that keeps reporting
/// [`TaskPoll::Pending`](crate::TaskPoll::Pending) is abandoned.
pub const DEFAULT_RETRY_CEILING: f32 = 3.0;

/// Configuration for an [`Executor`](crate::Executor).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Retry ceiling in seconds of accumulated tick delta.
    pub retry_ceiling: f32,
}

impl ExecutorConfig {
    /// Override the retry ceiling.
    #[must_use]
    pub fn with_retry_ceiling(mut self, seconds: f32) -> Self {
        self.retry_ceiling = seconds;
        self
    }

    /// Check that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the ceiling is not a positive,
    /// finite number.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.retry_ceiling.is_finite() || self.retry_ceiling <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "retry_ceiling",
                reason: "must be a positive number of seconds",
            });
        }
        Ok(())
    }
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            retry_ceiling: DEFAULT_RETRY_CEILING,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ceiling() {
        let config = ExecutorConfig::default();
        assert_eq!(config.retry_ceiling, 3.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_ceiling() {
        assert!(ExecutorConfig::default().with_retry_ceiling(0.0).validate().is_err());
        assert!(ExecutorConfig::default().with_retry_ceiling(f32::NAN).validate().is_err());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: ExecutorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ExecutorConfig::default());
    }
}
