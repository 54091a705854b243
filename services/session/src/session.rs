//! Trading Session - Guarded Fills over One Pool Pair
//!
//! A session owns the pool pair, the reference oracle and the limiter, and
//! runs the admission sequence for every trade:
//!
//! ```text
//! quote ──► size_aware_twap_guard ──► check_and_record ──► execute
//! ```
//!
//! The limiter is consulted even when the guard rejects, so deviation
//! strikes accumulate across refused attempts. Pools are only mutated when
//! both checks approve.

use crate::error::{Result, SessionError};
use colink_amm::{Pool, PriceUtils, ReservePool, RouteResult, Router, BPS_DENOMINATOR};
use colink_config::SessionConfig;
use colink_risk::{
    GuardBands, GuardedQuote, LimitDecision, RiskGuard, TradeLimiter, TwapGuardVerdict,
    TwapOracle,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Result of a guarded A -> B fill attempt
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum FillOutcome {
    /// Both checks approved and the route was executed
    Filled { route: RouteResult, min_out: f64 },
    /// Quote deviated from the reference beyond its budget
    GuardRejected {
        verdict: TwapGuardVerdict,
        limiter: LimitDecision,
    },
    /// Guard approved but the limiter refused
    LimiterRejected {
        verdict: TwapGuardVerdict,
        decision: LimitDecision,
    },
}

impl FillOutcome {
    pub fn is_filled(&self) -> bool {
        matches!(self, FillOutcome::Filled { .. })
    }

    /// Executed route, if any
    pub fn route(&self) -> Option<&RouteResult> {
        match self {
            FillOutcome::Filled { route, .. } => Some(route),
            _ => None,
        }
    }

    /// Short label for logs
    pub fn label(&self) -> &'static str {
        match self {
            FillOutcome::Filled { .. } => "filled",
            FillOutcome::GuardRejected { .. } => "twap_guard_rejected",
            FillOutcome::LimiterRejected { decision, .. } => decision.reason.as_str(),
        }
    }
}

/// One row of a non-mutating size sweep
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepRow {
    pub amount_in: f64,
    pub amount_out: f64,
    pub effective_price: f64,
    pub impact_bps: f64,
    pub verdict: TwapGuardVerdict,
}

/// Pool pair, reference oracle and limiter for one trading venue
#[derive(Debug, Clone)]
pub struct TradingSession<P: ReservePool = Pool> {
    pool_am: P,
    pool_mb: P,
    twap: TwapOracle,
    limiter: TradeLimiter,
    bands: GuardBands,
    slip_bps: f64,
}

impl TradingSession<Pool> {
    /// Build a session from validated configuration
    pub fn from_config(config: &SessionConfig) -> Result<Self> {
        let pool_am = config.pool_am.build()?;
        let pool_mb = config.pool_mb.build()?;
        let twap = TwapOracle::new(config.twap.window)?;
        let limiter = TradeLimiter::new(config.limits)?;

        info!(
            window = config.twap.window,
            slip_bps = config.slip_bps,
            max_input = config.limits.max_input,
            "Trading session created from config"
        );

        Self::new(pool_am, pool_mb, twap, limiter, config.guard, config.slip_bps)
    }
}

impl<P: ReservePool> TradingSession<P> {
    pub fn new(
        pool_am: P,
        pool_mb: P,
        twap: TwapOracle,
        limiter: TradeLimiter,
        bands: GuardBands,
        slip_bps: f64,
    ) -> Result<Self> {
        if !(0.0..=BPS_DENOMINATOR).contains(&slip_bps) {
            return Err(SessionError::InvalidSlippage(slip_bps));
        }

        Ok(Self {
            pool_am,
            pool_mb,
            twap,
            limiter,
            bands,
            slip_bps,
        })
    }

    /// Push the current route mid into the oracle and return it
    pub fn observe_mid(&mut self) -> f64 {
        let mid = PriceUtils::mid_route_price_b_per_a(&self.pool_am, &self.pool_mb);
        self.twap.push(mid);
        mid
    }

    /// Push the current route mid `samples` times
    pub fn warm_reference(&mut self, samples: usize) {
        let mid = PriceUtils::mid_route_price_b_per_a(&self.pool_am, &self.pool_mb);
        self.twap.warm(std::iter::repeat(mid).take(samples));
        debug!(samples, mid, twap = self.twap.value(), "Reference warmed");
    }

    pub fn quote_a_to_b(&self, amount_in: f64) -> RouteResult {
        Router::quote_a_to_b(&self.pool_am, &self.pool_mb, amount_in)
    }

    pub fn quote_b_to_a(&self, amount_in: f64) -> RouteResult {
        Router::quote_b_to_a(&self.pool_am, &self.pool_mb, amount_in)
    }

    /// A -> B quote with the session's slippage floor
    pub fn guarded_quote(&self, amount_in: f64) -> GuardedQuote {
        RiskGuard::quote_with_slippage(&self.pool_am, &self.pool_mb, amount_in, Some(self.slip_bps))
    }

    /// Guard verdict for an A -> B trade of `amount_in` against current state
    pub fn guard_verdict(&self, amount_in: f64) -> TwapGuardVerdict {
        RiskGuard::size_aware_twap_guard(
            &self.pool_am,
            &self.pool_mb,
            &self.twap,
            amount_in,
            &self.bands,
        )
    }

    /// Run the full admission sequence and execute on approval
    pub fn try_fill_a_to_b(&mut self, amount_in: f64) -> FillOutcome {
        let verdict = self.guard_verdict(amount_in);
        let decision = self.limiter.check_and_record(amount_in, verdict.dev_bps);

        if !verdict.approved {
            warn!(
                amount_in,
                dev_bps = verdict.dev_bps,
                budget_bps = verdict.budget_bps,
                limiter = %decision,
                "Fill rejected by TWAP guard"
            );
            return FillOutcome::GuardRejected {
                verdict,
                limiter: decision,
            };
        }

        if !decision.approved {
            debug!(amount_in, reason = %decision.reason, "Fill rejected by limiter");
            return FillOutcome::LimiterRejected { verdict, decision };
        }

        let min_out = self.guarded_quote(amount_in).min_out;
        let route = Router::execute_a_to_b(&mut self.pool_am, &mut self.pool_mb, amount_in);

        info!(
            amount_in,
            amount_out = route.amount_out,
            effective_price = route.effective_price,
            min_out,
            "Route filled"
        );

        FillOutcome::Filled { route, min_out }
    }

    /// Quote, impact and guard verdict for each size; never mutates
    pub fn sweep(&self, sizes: &[f64]) -> Vec<SweepRow> {
        sizes
            .iter()
            .map(|&amount_in| {
                let quote = self.quote_a_to_b(amount_in);
                SweepRow {
                    amount_in,
                    amount_out: quote.amount_out,
                    effective_price: quote.effective_price,
                    impact_bps: PriceUtils::modeled_bps_impact_for_size(
                        &self.pool_am,
                        &self.pool_mb,
                        amount_in,
                    ),
                    verdict: self.guard_verdict(amount_in),
                }
            })
            .collect()
    }

    /// Current route mid, B per A
    pub fn mid_price(&self) -> f64 {
        PriceUtils::mid_route_price_b_per_a(&self.pool_am, &self.pool_mb)
    }

    pub fn pool_am(&self) -> &P {
        &self.pool_am
    }

    pub fn pool_mb(&self) -> &P {
        &self.pool_mb
    }

    /// Both pools, for market moves made outside the session
    pub fn pools_mut(&mut self) -> (&mut P, &mut P) {
        (&mut self.pool_am, &mut self.pool_mb)
    }

    pub fn oracle(&self) -> &TwapOracle {
        &self.twap
    }

    pub fn limiter(&self) -> &TradeLimiter {
        &self.limiter
    }

    pub fn limiter_mut(&mut self) -> &mut TradeLimiter {
        &mut self.limiter
    }

    pub fn bands(&self) -> &GuardBands {
        &self.bands
    }

    pub fn slip_bps(&self) -> f64 {
        self.slip_bps
    }
}
