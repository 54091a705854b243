//! Error types for trading sessions

use colink_amm::AmmError;
use colink_risk::RiskError;
use thiserror::Error;

/// Result type alias for session operations
pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors raised while assembling a session.
///
/// Trade rejections are reported through `FillOutcome`, not here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("Pool error: {0}")]
    Amm(#[from] AmmError),

    #[error("Risk configuration error: {0}")]
    Risk(#[from] RiskError),

    #[error("Invalid slippage tolerance: {0} bps")]
    InvalidSlippage(f64),
}
