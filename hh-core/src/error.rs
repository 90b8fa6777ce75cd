//! Error types for hh-core

use thiserror::Error;

/// Errors raised before a run allocates anything.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HhError {
    /// A numeric input is outside its valid range
    #[error("invalid configuration: {field} {reason} (got {value})")]
    InvalidConfig {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// A waveform does not line up index-for-index with the time grid
    #[error("length mismatch: expected {expected} samples, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

pub type Result<T, E = HhError> = core::result::Result<T, E>;

/// Reject NaN and infinities.
pub fn ensure_finite(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(HhError::InvalidConfig {
            field,
            value,
            reason: "must be finite",
        })
    }
}

/// Reject anything that is not a finite, strictly positive number.
pub fn ensure_positive(field: &'static str, value: f64) -> Result<()> {
    ensure_finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(HhError::InvalidConfig {
            field,
            value,
            reason: "must be > 0",
        })
    }
}
