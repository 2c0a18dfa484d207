//! Configuration error type.
//!
//! Sub-crates define their own error enums and wrap `HrError` as one variant
//! via `#[from]`.

use thiserror::Error;

/// Errors raised while validating a [`SimulationConfig`][crate::SimulationConfig].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HrError {
    #[error("invalid payload thresholds: min {min} must be finite and below max {max}")]
    InvalidThresholds { min: f64, max: f64 },

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for configuration checks.
pub type HrResult<T> = Result<T, HrError>;
