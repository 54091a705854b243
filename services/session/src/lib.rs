//! # Colink Trading Session
//!
//! ## Purpose
//!
//! Ties the pricing core together for one venue: a `TradingSession` owns a
//! pool pair, the TWAP reference and the trade limiter, and runs the
//! `quote → guard → limiter → execute` sequence for every fill. Also
//! provides non-mutating size sweeps for inspection.
//!
//! ## Integration Points
//!
//! - **Input Sources**: `SessionConfig` from `colink-config`, trade sizes from callers
//! - **Output Destinations**: `FillOutcome` values and `SweepRow` tables
//! - **Binary**: `colink_sim` replays a guarded trade sequence from config
//!
//! ## Example
//!
//! ```rust
//! use colink_config::SessionConfig;
//! use colink_session::TradingSession;
//!
//! let mut session = TradingSession::from_config(&SessionConfig::default()).unwrap();
//! session.warm_reference(20);
//!
//! let outcome = session.try_fill_a_to_b(5_000.0);
//! assert!(outcome.is_filled());
//! ```

pub mod error;
pub mod session;

pub use error::{Result, SessionError};
pub use session::{FillOutcome, SweepRow, TradingSession};
