//! Pool capability trait for routing and pricing
//!
//! The router, price utilities and risk guard only need to read reserves
//! and simulate swaps, so they are generic over [`ReservePool`] rather than
//! tied to the concrete [`Pool`].

use crate::pool::{Pool, SwapDirection, SwapFill};

/// Read reserves and simulate swaps as value transitions
pub trait ReservePool: Clone {
    /// Current `(x, y)` reserves
    fn reserves(&self) -> (f64, f64);

    /// Fee tier in basis points
    fn fee_bps(&self) -> u32;

    /// Simulate a swap, returning the fill and the post-swap state.
    /// Must not mutate `self`.
    fn preview_swap(&self, direction: SwapDirection, amount_in: f64) -> (SwapFill, Self);

    /// Run a swap and commit the resulting state
    fn apply_swap(&mut self, direction: SwapDirection, amount_in: f64) -> SwapFill {
        let (fill, next) = self.preview_swap(direction, amount_in);
        *self = next;
        fill
    }

    /// Y per X at zero size
    fn mid_price_y_per_x(&self) -> f64 {
        let (x, y) = self.reserves();
        if x > 0.0 {
            y / x
        } else {
            0.0
        }
    }
}

impl ReservePool for Pool {
    fn reserves(&self) -> (f64, f64) {
        (self.x_reserve(), self.y_reserve())
    }

    fn fee_bps(&self) -> u32 {
        Pool::fee_bps(self)
    }

    fn preview_swap(&self, direction: SwapDirection, amount_in: f64) -> (SwapFill, Self) {
        self.preview(direction, amount_in)
    }
}
