//! # Colink AMM Library - Routed Constant-Product Pricing
//!
//! ## Purpose
//!
//! Pool math and two-hop routing for the Colink DEX core. Provides a
//! constant-product pool with fee-on-input, scalar LP mint/burn, a router
//! that quotes and executes A ⇄ M ⇄ B routes over a pool pair, and the
//! mid-price / deviation / impact helpers the risk guard builds on.
//!
//! ## Integration Points
//!
//! - **Input Sources**: Seed reserves from session configuration, trade sizes from callers
//! - **Output Destinations**: `colink-risk` guard and limiter, trading sessions
//! - **Precision**: IEEE-754 doubles; outputs clamped non-negative
//! - **Side Effects**: None. No I/O, no suspension; mutation only through `&mut`
//!
//! ## Architecture Role
//!
//! ```text
//! Pool (x·y=k, fee on input)
//!   │  preview_* returns the next state as a value
//!   ▼
//! ReservePool trait ──► Router (quote = preview both hops, execute = commit both)
//!                          │
//!                          ▼
//!                     PriceUtils (route mid, bps deviation, modeled impact)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use colink_amm::{Pool, PriceUtils, Router};
//!
//! let col_x = Pool::new(10_000.0, 200_000.0, 30).unwrap();
//! let x_copx = Pool::new(10_000.0, 25_000_000.0, 30).unwrap();
//!
//! let quote = Router::quote_a_to_b(&col_x, &x_copx, 5_000.0);
//! let mid = PriceUtils::mid_route_price_b_per_a(&col_x, &x_copx);
//! assert!(quote.amount_out > 0.0);
//! assert!(quote.effective_price < mid);
//! ```

pub mod error;
pub mod pool;
pub mod pool_traits;
pub mod price;
pub mod router;

pub use error::{AmmError, Result};
pub use pool::{
    Pool, SwapDirection, SwapFill, BPS_DENOMINATOR, DEFAULT_FEE_BPS, MAX_FEE_BPS,
};
pub use pool_traits::ReservePool;
pub use price::PriceUtils;
pub use router::{RouteDirection, RouteResult, Router};
