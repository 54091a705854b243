//! Constant-product pool with fee-on-input and scalar LP accounting
//!
//! All math runs on IEEE-754 doubles. Swaps are computed as pure previews
//! that return the post-swap pool as a new value; the mutating entry points
//! simply commit that value.

use crate::error::{AmmError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Basis-point denominator (1 bp = 1/10_000)
pub const BPS_DENOMINATOR: f64 = 10_000.0;

/// Largest accepted fee (100%)
pub const MAX_FEE_BPS: u32 = 10_000;

/// Default pool fee: 30 bps
pub const DEFAULT_FEE_BPS: u32 = 30;

/// Which reserve a swap consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapDirection {
    /// Pay X into the pool, receive Y
    XForY,
    /// Pay Y into the pool, receive X
    YForX,
}

impl SwapDirection {
    /// The opposite direction
    pub fn reversed(self) -> Self {
        match self {
            SwapDirection::XForY => SwapDirection::YForX,
            SwapDirection::YForX => SwapDirection::XForY,
        }
    }
}

/// Outcome of a single-pool swap
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SwapFill {
    /// Amount of the output asset leaving the pool
    pub amount_out: f64,
    /// `amount_out / amount_in`, zero when nothing was swapped
    pub effective_price: f64,
}

impl SwapFill {
    /// The no-op fill returned for invalid input or degenerate reserves
    pub const ZERO: SwapFill = SwapFill {
        amount_out: 0.0,
        effective_price: 0.0,
    };

    /// True when the swap produced no output
    pub fn is_empty(&self) -> bool {
        self.amount_out <= 0.0
    }
}

/// Constant-product (x·y = k) pool state
///
/// The fee is charged on the input and stays inside the pool, so `k`
/// never decreases across swaps. LP supply is a scalar tally; who holds
/// the units is the caller's concern.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pool {
    x: f64,
    y: f64,
    fee_bps: u32,
    lp_total: f64,
}

impl Pool {
    /// Create a pool from seed reserves.
    ///
    /// LP supply starts at `sqrt(x·y)`, so a seeded pool already carries
    /// units before the first explicit deposit. Either reserve may be zero.
    pub fn new(x: f64, y: f64, fee_bps: u32) -> Result<Self> {
        let lp_total = if x > 0.0 && y > 0.0 {
            (x * y).sqrt()
        } else {
            0.0
        };
        Self::with_lp_supply(x, y, fee_bps, lp_total)
    }

    /// Create a pool with an explicit LP supply
    pub fn with_lp_supply(x: f64, y: f64, fee_bps: u32, lp_total: f64) -> Result<Self> {
        check_reserve("x", x)?;
        check_reserve("y", y)?;
        if fee_bps > MAX_FEE_BPS {
            return Err(AmmError::InvalidFee {
                fee_bps,
                max: MAX_FEE_BPS,
            });
        }
        if !lp_total.is_finite() || lp_total < 0.0 {
            return Err(AmmError::InvalidLpSupply(lp_total));
        }

        Ok(Self {
            x,
            y,
            fee_bps,
            lp_total,
        })
    }

    /// Empty pool awaiting its first deposit
    pub fn empty(fee_bps: u32) -> Result<Self> {
        Self::with_lp_supply(0.0, 0.0, fee_bps, 0.0)
    }

    pub fn x_reserve(&self) -> f64 {
        self.x
    }

    pub fn y_reserve(&self) -> f64 {
        self.y
    }

    pub fn fee_bps(&self) -> u32 {
        self.fee_bps
    }

    pub fn lp_total(&self) -> f64 {
        self.lp_total
    }

    /// Constant product `x·y`
    pub fn k(&self) -> f64 {
        self.x * self.y
    }

    /// Y per X at zero size; 0 when the pool has no X
    pub fn mid_price_y_per_x(&self) -> f64 {
        if self.x > 0.0 {
            self.y / self.x
        } else {
            0.0
        }
    }

    /// X per Y at zero size; 0 when the pool has no Y
    pub fn mid_price_x_per_y(&self) -> f64 {
        if self.y > 0.0 {
            self.x / self.y
        } else {
            0.0
        }
    }

    /// Fraction of the input that reaches the curve, `1 - fee_bps/10_000`
    pub fn fee_multiplier(&self) -> f64 {
        1.0 - f64::from(self.fee_bps) / BPS_DENOMINATOR
    }

    /// Simulate paying `dx` of X for Y without touching `self`
    pub fn preview_x_for_y(&self, dx: f64) -> (SwapFill, Pool) {
        match constant_product_out(self.x, self.y, dx, self.fee_multiplier()) {
            Some(dy_out) => {
                let next = Pool {
                    x: self.x + dx,
                    y: self.y - dy_out,
                    ..*self
                };
                (fill(dy_out, dx), next)
            }
            None => (SwapFill::ZERO, *self),
        }
    }

    /// Simulate paying `dy` of Y for X without touching `self`
    pub fn preview_y_for_x(&self, dy: f64) -> (SwapFill, Pool) {
        match constant_product_out(self.y, self.x, dy, self.fee_multiplier()) {
            Some(dx_out) => {
                let next = Pool {
                    x: self.x - dx_out,
                    y: self.y + dy,
                    ..*self
                };
                (fill(dx_out, dy), next)
            }
            None => (SwapFill::ZERO, *self),
        }
    }

    /// Direction-parameterized preview
    pub fn preview(&self, direction: SwapDirection, amount_in: f64) -> (SwapFill, Pool) {
        match direction {
            SwapDirection::XForY => self.preview_x_for_y(amount_in),
            SwapDirection::YForX => self.preview_y_for_x(amount_in),
        }
    }

    /// Pay `dx` of X, receive Y. The raw input is added to the X reserve,
    /// keeping the fee residual in the pool.
    ///
    /// Returns a zero fill and leaves the pool untouched when `dx <= 0` or
    /// either reserve is empty.
    pub fn swap_x_for_y(&mut self, dx: f64) -> SwapFill {
        let (fill, next) = self.preview_x_for_y(dx);
        *self = next;
        fill
    }

    /// Pay `dy` of Y, receive X. Mirror of [`Pool::swap_x_for_y`].
    pub fn swap_y_for_x(&mut self, dy: f64) -> SwapFill {
        let (fill, next) = self.preview_y_for_x(dy);
        *self = next;
        fill
    }

    /// Deposit `dx` and `dy`, returning the LP units minted.
    ///
    /// The first deposit into a pool with no LP supply mints `sqrt(dx·dy)`;
    /// later deposits mint `min(dx/x, dy/y) · lp_total`, so any excess over
    /// the current ratio is donated to existing holders. A side whose
    /// reserve is empty contributes a share of zero.
    pub fn add_liquidity(&mut self, dx: f64, dy: f64) -> f64 {
        if !(dx > 0.0 && dy > 0.0) || !dx.is_finite() || !dy.is_finite() {
            return 0.0;
        }

        let minted = if self.lp_total <= 0.0 {
            (dx * dy).sqrt()
        } else {
            // An empty reserve cannot price the deposit; it earns no share
            let share_x = if self.x > 0.0 { dx / self.x } else { 0.0 };
            let share_y = if self.y > 0.0 { dy / self.y } else { 0.0 };
            share_x.min(share_y) * self.lp_total
        };

        self.x += dx;
        self.y += dy;
        self.lp_total += minted;

        debug!(dx, dy, minted, lp_total = self.lp_total, "Liquidity added");
        minted
    }

    /// Withdraw `fraction` of both reserves, burning the same fraction of
    /// LP supply. The fraction is clamped to `[0, 1]`.
    pub fn remove_liquidity(&mut self, fraction: f64) -> (f64, f64) {
        if !(fraction > 0.0) {
            return (0.0, 0.0);
        }
        let fraction = fraction.min(1.0);

        let dx = self.x * fraction;
        let dy = self.y * fraction;
        self.x -= dx;
        self.y -= dy;
        self.lp_total *= 1.0 - fraction;

        debug!(fraction, dx, dy, lp_total = self.lp_total, "Liquidity removed");
        (dx, dy)
    }
}

fn check_reserve(side: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(AmmError::InvalidReserve { side, value })
    }
}

/// Output of the x·y=k curve for `amount_in` after fee, or `None` when the
/// swap cannot run (non-positive input, empty reserve).
fn constant_product_out(
    reserve_in: f64,
    reserve_out: f64,
    amount_in: f64,
    fee_multiplier: f64,
) -> Option<f64> {
    if !(amount_in > 0.0) || !amount_in.is_finite() {
        return None;
    }
    if reserve_in <= 0.0 || reserve_out <= 0.0 {
        return None;
    }

    let amount_in_after_fee = amount_in * fee_multiplier;
    let k = reserve_in * reserve_out;
    let new_reserve_in = reserve_in + amount_in_after_fee;
    let new_reserve_out = k / new_reserve_in;

    Some((reserve_out - new_reserve_out).max(0.0))
}

fn fill(amount_out: f64, amount_in: f64) -> SwapFill {
    SwapFill {
        amount_out,
        effective_price: amount_out / amount_in,
    }
}
