//! Error types for the fallible edges of the crate.
//!
//! The simulation step itself never fails: degenerate math is a no-op,
//! oversized frame deltas are clamped and invalid commands are ignored.
//! Loading and validating tuning data is the one place callers get a
//! `Result` back.

use std::fmt;

/// Failure while loading or validating tuning data
#[derive(Debug)]
pub enum ConfigError {
    /// The tuning file could not be read
    Io(std::io::Error),
    /// The tuning JSON was malformed or had wrong field types
    Parse(serde_json::Error),
    /// A value parsed but lies outside its usable range
    OutOfRange {
        /// Dotted path of the offending field (for logging)
        field: &'static str,
        /// The value that was rejected
        value: f32,
        /// Human-readable description of the accepted range
        expected: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "failed to read tuning file: {}", err),
            ConfigError::Parse(err) => write!(f, "failed to parse tuning: {}", err),
            ConfigError::OutOfRange {
                field,
                value,
                expected,
            } => write!(f, "tuning value '{}' = {} is outside {}", field, value, expected),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Parse(err) => Some(err),
            ConfigError::OutOfRange { .. } => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}

/// Convenience alias for results carrying a `ConfigError`
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Reject values that are not strictly positive
pub(crate) fn require_positive(field: &'static str, value: f32) -> ConfigResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            expected: "(0, ∞)",
        })
    }
}

/// Reject values outside [min, max]
pub(crate) fn require_range(
    field: &'static str,
    value: f32,
    min: f32,
    max: f32,
    expected: &'static str,
) -> ConfigResult<()> {
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            expected,
        })
    }
}
