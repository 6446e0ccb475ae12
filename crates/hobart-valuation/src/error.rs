//! Error types for valuation operations.

use thiserror::Error;

/// Result type for valuation operations.
pub type Result<T> = std::result::Result<T, ValuationError>;

/// Errors that can occur while deriving or projecting valuations.
#[derive(Debug, Error)]
pub enum ValuationError {
    /// The filing source yielded no qualifying annual records
    #[error("no annual earnings history for {0}")]
    NoFundamentals(String),

    /// Base ratio for a projection must be positive and finite
    #[error("base ratio must be positive and finite, got {0}")]
    InvalidBaseRatio(f64),

    /// Growth rate outside the accepted manual-input range
    #[error("growth rate {0}% is outside the accepted -50% to +100% range")]
    GrowthRateOutOfRange(f64),

    /// Current earnings per share is not a finite number
    #[error("current earnings per share is not finite: {0}")]
    NonFiniteEps(f64),
}
