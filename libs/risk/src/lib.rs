//! # Colink Risk Library - Reference Pricing, Guards and Limits
//!
//! ## Purpose
//!
//! Admission control for routed trades. A rolling TWAP supplies a reference
//! price that resists single-block manipulation; the size-aware guard checks
//! a quote against that reference with a budget that grows with modeled
//! impact; the trade limiter enforces hard caps and trips a circuit breaker
//! after repeated violations.
//!
//! ## Integration Points
//!
//! - **Input Sources**: Pool pairs from `colink-amm`, reference samples pushed by callers
//! - **Output Destinations**: Trading sessions deciding whether to execute
//! - **Outcomes**: Rejections are values (`TwapGuardVerdict`, `LimitDecision`), never errors
//!
//! ## Architecture Role
//!
//! ```text
//! Router.quote ──► RiskGuard::size_aware_twap_guard(TwapOracle) ──► dev_bps
//!                                                                     │
//!                                   TradeLimiter::check_and_record ◄──┘
//!                                                │
//!                                   approved ──► Router.execute
//! ```

pub mod error;
pub mod guard;
pub mod limiter;
pub mod twap;

pub use error::{Result, RiskError};
pub use guard::{GuardBands, GuardedQuote, RiskGuard, TwapGuardVerdict};
pub use limiter::{
    LimitConfig, LimitDecision, LimitReason, LimiterState, LimiterStats, TradeLimiter,
};
pub use twap::{TwapOracle, DEFAULT_TWAP_WINDOW};
