//! Task-layer error types.

/// A positional task argument was missing or had the wrong type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgError {
    /// Fewer arguments were supplied than the task reads.
    #[error("missing argument at position {index}")]
    Missing {
        /// Zero-based argument position.
        index: usize,
    },

    /// The argument exists but is of another kind.
    #[error("argument {index}: expected {expected}, found {found}")]
    Mismatch {
        /// Zero-based argument position.
        index: usize,
        /// The kind the task asked for.
        expected: &'static str,
        /// The kind that was supplied.
        found: &'static str,
    },
}

/// A tick delta violated the `dt > 0` contract of the tick source.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TickError {
    /// Delta was zero or negative.
    #[error("tick delta must be positive, got {0}")]
    NonPositive(f32),

    /// Delta was NaN or infinite.
    #[error("tick delta must be finite")]
    NonFinite,
}

/// A configuration value is out of range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The named field holds an unusable value.
    #[error("invalid `{field}`: {reason}")]
    Invalid {
        /// Field name as it appears in the config file.
        field: &'static str,
        /// Human-readable constraint that was violated.
        reason: &'static str,
    },
}
