//! Min-out slippage guard and size-aware TWAP deviation guard
//!
//! The deviation guard compares a route quote against the TWAP reference
//! and accepts it when the gap fits a budget:
//!
//! ```text
//! budget_bps = min(cap_bps, base_bps + modeled_impact_bps(size) + cushion_bps)
//! ```
//!
//! The budget grows with the honest impact of the requested size, so large
//! trades are not rejected for their own unavoidable slippage, while the cap
//! bounds how far a manipulated pool can drift from the reference.

use crate::twap::TwapOracle;
use colink_amm::{PriceUtils, ReservePool, Router, BPS_DENOMINATOR};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Quote with a slippage floor attached
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GuardedQuote {
    pub amount_in: f64,
    pub amount_out_quote: f64,
    /// Lowest acceptable output, never negative
    pub min_out: f64,
    pub slip_bps: f64,
}

/// Deviation budget parameters, all in basis points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardBands {
    /// Tolerance granted to every trade
    pub base_bps: f64,
    /// Extra headroom on top of modeled impact
    pub cushion_bps: f64,
    /// Hard ceiling on the budget
    pub cap_bps: f64,
}

impl Default for GuardBands {
    fn default() -> Self {
        Self {
            base_bps: 100.0,
            cushion_bps: 150.0,
            cap_bps: 2_000.0,
        }
    }
}

impl GuardBands {
    /// Budget for a trade whose modeled impact is `modeled_impact_bps`
    pub fn budget_bps(&self, modeled_impact_bps: f64) -> f64 {
        self.cap_bps
            .min(self.base_bps + modeled_impact_bps + self.cushion_bps)
    }
}

/// Outcome of the size-aware TWAP guard
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TwapGuardVerdict {
    pub approved: bool,
    /// Gap between the quoted effective price and the reference
    pub dev_bps: f64,
    pub budget_bps: f64,
    /// Reference price used (TWAP, or route mid when the oracle was cold)
    pub reference: f64,
}

/// Stateless guard operations
pub struct RiskGuard;

impl RiskGuard {
    /// Quote A -> B and attach a min-out floor of
    /// `amount_out * (1 - slip_bps / 10_000)`. `slip_bps` defaults to 0.
    pub fn quote_with_slippage<P: ReservePool>(
        pool_am: &P,
        pool_mb: &P,
        amount_in: f64,
        slip_bps: Option<f64>,
    ) -> GuardedQuote {
        let slip_bps = slip_bps.unwrap_or(0.0);
        let quote = Router::quote_a_to_b(pool_am, pool_mb, amount_in);
        let min_out = (quote.amount_out * (1.0 - slip_bps / BPS_DENOMINATOR)).max(0.0);

        GuardedQuote {
            amount_in,
            amount_out_quote: quote.amount_out,
            min_out,
            slip_bps,
        }
    }

    /// Check an A -> B quote of `amount_in` against the TWAP reference.
    ///
    /// Falls back to the instantaneous route mid when the oracle has no
    /// positive finite value.
    pub fn size_aware_twap_guard<P: ReservePool>(
        pool_am: &P,
        pool_mb: &P,
        twap: &TwapOracle,
        amount_in: f64,
        bands: &GuardBands,
    ) -> TwapGuardVerdict {
        let mut reference = twap.value();
        if !(reference > 0.0) || !reference.is_finite() {
            reference = PriceUtils::mid_route_price_b_per_a(pool_am, pool_mb);
        }

        let quote = Router::quote_a_to_b(pool_am, pool_mb, amount_in);
        let dev_bps = PriceUtils::bps_deviation(quote.effective_price, reference);

        let modeled = PriceUtils::modeled_bps_impact_for_size(pool_am, pool_mb, amount_in);
        let budget_bps = bands.budget_bps(modeled);
        let approved = dev_bps <= budget_bps;

        debug!(
            amount_in,
            reference,
            effective_price = quote.effective_price,
            dev_bps,
            modeled_impact_bps = modeled,
            budget_bps,
            approved,
            "TWAP guard evaluated"
        );

        TwapGuardVerdict {
            approved,
            dev_bps,
            budget_bps,
            reference,
        }
    }
}
