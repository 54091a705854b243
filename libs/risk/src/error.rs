//! Error types for risk components

use thiserror::Error;

/// Result type alias for risk operations
pub type Result<T> = std::result::Result<T, RiskError>;

/// Construction and validation errors.
///
/// Guard and limiter rejections are decisions, not errors, and never
/// surface here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RiskError {
    /// TWAP window must hold at least one sample
    #[error("TWAP window must be > 0, got {0}")]
    InvalidWindow(usize),

    /// A limiter or guard parameter is out of range
    #[error("Invalid {field}: {reason}")]
    InvalidLimit {
        /// Offending parameter
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}
