//! Trade Limiter - Hard Caps with a Strike-Based Circuit Breaker
//!
//! Every guarded trade is recorded here after the deviation guard. Trades
//! over the size cap or the deviation cap earn a strike; `strikes_window`
//! consecutive strikes trip the breaker. While tripped, each `can_trade`
//! (or `check_and_record`) attempt burns one cooldown tick. When cooldown
//! runs out the limiter auto-resets, and the first `check_and_record` after
//! that is refused with `auto_reset` so the caller re-quotes against fresh
//! pool state.
//!
//! ## States
//!
//! ```text
//! NORMAL ──strikes_window violations──> TRIPPED ──cooldown spent──> NEEDS_REQUOTE
//!   ▲                                                                   │
//!   └──────────────────── next check_and_record (auto_reset) ───────────┘
//! ```

use crate::error::{Result, RiskError};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// Hard caps and breaker tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitConfig {
    /// Largest accepted input size
    pub max_input: f64,
    /// Largest accepted deviation from the reference, in bps
    pub max_dev_bps: f64,
    /// Consecutive violations that trip the breaker
    pub strikes_window: u32,
    /// Blocked attempts served while tripped
    pub cooldown_trades: u32,
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            max_input: 25_000.0,
            max_dev_bps: 2_000.0,
            strikes_window: 2,
            cooldown_trades: 3,
        }
    }
}

impl LimitConfig {
    /// Validate limiter parameters
    pub fn validate(&self) -> Result<()> {
        if !(self.max_input > 0.0) {
            return Err(RiskError::InvalidLimit {
                field: "max_input",
                reason: format!("must be positive, got {}", self.max_input),
            });
        }
        if !(self.max_dev_bps >= 0.0) {
            return Err(RiskError::InvalidLimit {
                field: "max_dev_bps",
                reason: format!("must be non-negative, got {}", self.max_dev_bps),
            });
        }
        if self.strikes_window == 0 {
            return Err(RiskError::InvalidLimit {
                field: "strikes_window",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Limiter state. Tripped and awaiting-requote are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum LimiterState {
    /// Trading allowed; `strikes` consecutive violations so far
    Normal { strikes: u32 },
    /// Breaker open; `cooldown_left` blocked attempts remain
    Tripped { cooldown_left: u32 },
    /// Cooldown spent; the next check must force a re-quote
    NeedsRequote,
}

/// Stable reason codes for limiter decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitReason {
    /// Under both caps; strikes cleared
    Approved,
    /// Input above `max_input`
    SizeExceedsCap,
    /// Deviation above `max_dev_bps`
    TwapDeviationExceedsCap,
    /// Breaker tripped and cooling down
    CircuitBreakerTripped,
    /// `can_trade` finished the cooldown
    AutoResetOk,
    /// First check after reset; caller must re-quote
    AutoReset,
    /// `can_trade` in normal operation
    Ok,
}

impl LimitReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            LimitReason::Approved => "approved",
            LimitReason::SizeExceedsCap => "size_exceeds_cap",
            LimitReason::TwapDeviationExceedsCap => "twap_deviation_exceeds_cap",
            LimitReason::CircuitBreakerTripped => "circuit_breaker_tripped",
            LimitReason::AutoResetOk => "auto_reset_ok",
            LimitReason::AutoReset => "auto_reset",
            LimitReason::Ok => "ok",
        }
    }
}

impl fmt::Display for LimitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `(ok, reason)` pair returned by the limiter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitDecision {
    pub approved: bool,
    pub reason: LimitReason,
}

impl LimitDecision {
    fn allow(reason: LimitReason) -> Self {
        Self {
            approved: true,
            reason,
        }
    }

    fn block(reason: LimitReason) -> Self {
        Self {
            approved: false,
            reason,
        }
    }
}

impl fmt::Display for LimitDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.approved { "allow" } else { "block" };
        write!(f, "{} ({})", verdict, self.reason)
    }
}

/// Counters for limiter monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimiterStats {
    /// `check_and_record` calls
    pub checks: u64,
    /// Checks that returned `approved`
    pub approvals: u64,
    /// Checks refused for any reason
    pub rejections: u64,
    /// Times the breaker tripped
    pub trips: u64,
}

/// Size/deviation limiter with consecutive-strike circuit breaker
#[derive(Debug, Clone)]
pub struct TradeLimiter {
    config: LimitConfig,
    state: LimiterState,
    stats: LimiterStats,
}

impl TradeLimiter {
    /// Create a limiter in the normal state
    pub fn new(config: LimitConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: LimiterState::Normal { strikes: 0 },
            stats: LimiterStats::default(),
        })
    }

    pub fn config(&self) -> &LimitConfig {
        &self.config
    }

    pub fn state(&self) -> LimiterState {
        self.state
    }

    pub fn stats(&self) -> LimiterStats {
        self.stats
    }

    /// Consecutive violations recorded since the last approval or trip
    pub fn strikes(&self) -> u32 {
        match self.state {
            LimiterState::Normal { strikes } => strikes,
            _ => 0,
        }
    }

    pub fn is_tripped(&self) -> bool {
        matches!(self.state, LimiterState::Tripped { .. })
    }

    pub fn needs_requote(&self) -> bool {
        matches!(self.state, LimiterState::NeedsRequote)
    }

    /// Blocked attempts left before auto-reset; 0 unless tripped
    pub fn cooldown_left(&self) -> u32 {
        match self.state {
            LimiterState::Tripped { cooldown_left } => cooldown_left,
            _ => 0,
        }
    }

    /// Ask whether trading is open, ticking the cooldown when tripped.
    ///
    /// A tripped limiter with cooldown remaining burns one tick and refuses.
    /// Once cooldown is spent it auto-resets to awaiting-requote and answers
    /// `auto_reset_ok`.
    pub fn can_trade(&mut self) -> LimitDecision {
        match self.state {
            LimiterState::Normal { .. } => LimitDecision::allow(LimitReason::Ok),
            LimiterState::Tripped { cooldown_left } if cooldown_left > 0 => {
                let cooldown_left = cooldown_left - 1;
                self.state = LimiterState::Tripped { cooldown_left };
                debug!(cooldown_left, "Circuit breaker cooling down");
                LimitDecision::block(LimitReason::CircuitBreakerTripped)
            }
            LimiterState::Tripped { .. } => {
                self.transition_to(LimiterState::NeedsRequote);
                info!("Circuit breaker auto-reset, next check requires a fresh quote");
                LimitDecision::allow(LimitReason::AutoResetOk)
            }
            LimiterState::NeedsRequote => LimitDecision::allow(LimitReason::AutoResetOk),
        }
    }

    /// Record a trade attempt of `input` size deviating `dev_bps` from the
    /// reference, and decide whether it may proceed.
    pub fn check_and_record(&mut self, input: f64, dev_bps: f64) -> LimitDecision {
        self.stats.checks += 1;
        let decision = self.evaluate(input, dev_bps);

        if decision.approved {
            self.stats.approvals += 1;
        } else {
            self.stats.rejections += 1;
            debug!(input, dev_bps, reason = %decision.reason, "Trade refused by limiter");
        }
        decision
    }

    /// Operator override: close the breaker and clear strikes
    pub fn reset(&mut self) {
        self.transition_to(LimiterState::Normal { strikes: 0 });
    }

    fn evaluate(&mut self, input: f64, dev_bps: f64) -> LimitDecision {
        match self.state {
            LimiterState::NeedsRequote => {
                self.transition_to(LimiterState::Normal { strikes: 0 });
                LimitDecision::block(LimitReason::AutoReset)
            }
            LimiterState::Tripped { .. } => {
                let tick = self.can_trade();
                if tick.approved {
                    // Cooldown ended on this attempt; it is the first
                    // post-reset check, so it must force a re-quote.
                    self.transition_to(LimiterState::Normal { strikes: 0 });
                    LimitDecision::block(LimitReason::AutoReset)
                } else {
                    tick
                }
            }
            LimiterState::Normal { strikes } => {
                if input > self.config.max_input {
                    warn!(
                        input,
                        max_input = self.config.max_input,
                        "Trade size exceeds cap"
                    );
                    self.strike(strikes);
                    LimitDecision::block(LimitReason::SizeExceedsCap)
                } else if dev_bps > self.config.max_dev_bps {
                    warn!(
                        dev_bps,
                        max_dev_bps = self.config.max_dev_bps,
                        "TWAP deviation exceeds cap"
                    );
                    self.strike(strikes);
                    LimitDecision::block(LimitReason::TwapDeviationExceedsCap)
                } else {
                    self.state = LimiterState::Normal { strikes: 0 };
                    LimitDecision::allow(LimitReason::Approved)
                }
            }
        }
    }

    fn strike(&mut self, strikes: u32) {
        let strikes = strikes + 1;
        if strikes >= self.config.strikes_window {
            self.trip(strikes);
        } else {
            self.state = LimiterState::Normal { strikes };
        }
    }

    fn trip(&mut self, strikes: u32) {
        self.stats.trips += 1;
        self.transition_to(LimiterState::Tripped {
            cooldown_left: self.config.cooldown_trades,
        });
        warn!(
            strikes,
            cooldown_trades = self.config.cooldown_trades,
            "Circuit breaker tripped"
        );
    }

    fn transition_to(&mut self, next: LimiterState) {
        if self.state != next {
            debug!("Limiter state transition: {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }
}
