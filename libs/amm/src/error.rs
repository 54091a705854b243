//! Error types for pool construction

use thiserror::Error;

/// Result type alias for AMM operations
pub type Result<T> = std::result::Result<T, AmmError>;

/// Errors raised when a pool cannot be built from the given parameters.
///
/// Routine outcomes (zero-size swaps, degenerate reserves) are not errors;
/// they come back as zero-valued results.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AmmError {
    /// A reserve was negative, NaN or infinite
    #[error("Invalid {side} reserve: {value}")]
    InvalidReserve {
        /// Which side of the pool ("x" or "y")
        side: &'static str,
        /// The rejected value
        value: f64,
    },

    /// Fee outside 0..=10_000 basis points
    #[error("Fee of {fee_bps} bps exceeds {max} bps")]
    InvalidFee {
        /// The rejected fee
        fee_bps: u32,
        /// Upper bound
        max: u32,
    },

    /// LP supply was negative, NaN or infinite
    #[error("Invalid LP supply: {0}")]
    InvalidLpSupply(f64),
}
