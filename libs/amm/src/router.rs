//! Two-hop routing over a pool pair sharing a middle asset
//!
//! Pool layout:
//!
//! ```text
//! pool_am:  X = M (middle), Y = A
//! pool_mb:  X = M (middle), Y = B
//!
//! A -> B:  pool_am y_for_x (A in, M out)  ->  pool_mb x_for_y (M in, B out)
//! B -> A:  pool_mb y_for_x (B in, M out)  ->  pool_am x_for_y (M in, A out)
//! ```
//!
//! Quotes run both hops on value copies. Executions run the same math and
//! commit both post-hop states together, so a quote and an execution on the
//! same starting pools always agree.

use crate::pool::SwapDirection;
use crate::pool_traits::ReservePool;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Route direction across the pool pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteDirection {
    /// A in, B out
    AtoB,
    /// B in, A out
    BtoA,
}

/// Result of a quoted or executed route
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteResult {
    pub amount_in: f64,
    pub amount_out: f64,
    /// `amount_out / amount_in`, zero for non-positive input
    pub effective_price: f64,
    /// Middle asset produced by the first hop
    pub hop1_out: f64,
    /// Output of the second hop (equals `amount_out`)
    pub hop2_out: f64,
}

impl RouteResult {
    fn from_hops(amount_in: f64, hop1_out: f64, hop2_out: f64) -> Self {
        let effective_price = if amount_in > 0.0 {
            hop2_out / amount_in
        } else {
            0.0
        };
        Self {
            amount_in,
            amount_out: hop2_out,
            effective_price,
            hop1_out,
            hop2_out,
        }
    }

    /// Zero-output result for `amount_in`
    pub fn zero(amount_in: f64) -> Self {
        Self::from_hops(amount_in, 0.0, 0.0)
    }

    /// True when the route produced output
    pub fn is_filled(&self) -> bool {
        self.amount_out > 0.0
    }
}

/// Stateless two-hop router
pub struct Router;

impl Router {
    /// Quote A -> B without mutating either pool
    pub fn quote_a_to_b<P: ReservePool>(pool_am: &P, pool_mb: &P, amount_in: f64) -> RouteResult {
        Self::simulate(RouteDirection::AtoB, pool_am, pool_mb, amount_in).0
    }

    /// Quote B -> A without mutating either pool
    pub fn quote_b_to_a<P: ReservePool>(pool_am: &P, pool_mb: &P, amount_in: f64) -> RouteResult {
        Self::simulate(RouteDirection::BtoA, pool_am, pool_mb, amount_in).0
    }

    /// Direction-parameterized quote
    pub fn quote<P: ReservePool>(
        direction: RouteDirection,
        pool_am: &P,
        pool_mb: &P,
        amount_in: f64,
    ) -> RouteResult {
        Self::simulate(direction, pool_am, pool_mb, amount_in).0
    }

    /// Execute A -> B against the caller's pools
    pub fn execute_a_to_b<P: ReservePool>(
        pool_am: &mut P,
        pool_mb: &mut P,
        amount_in: f64,
    ) -> RouteResult {
        Self::execute(RouteDirection::AtoB, pool_am, pool_mb, amount_in)
    }

    /// Execute B -> A against the caller's pools
    pub fn execute_b_to_a<P: ReservePool>(
        pool_am: &mut P,
        pool_mb: &mut P,
        amount_in: f64,
    ) -> RouteResult {
        Self::execute(RouteDirection::BtoA, pool_am, pool_mb, amount_in)
    }

    /// Direction-parameterized execution.
    ///
    /// Both pools are updated, or neither is: a route that yields no output
    /// leaves the caller's pools untouched.
    pub fn execute<P: ReservePool>(
        direction: RouteDirection,
        pool_am: &mut P,
        pool_mb: &mut P,
        amount_in: f64,
    ) -> RouteResult {
        let (result, next) = Self::simulate(direction, pool_am, pool_mb, amount_in);
        if let Some((am, mb)) = next {
            *pool_am = am;
            *pool_mb = mb;
            debug!(
                ?direction,
                amount_in = result.amount_in,
                amount_out = result.amount_out,
                effective_price = result.effective_price,
                "Route executed"
            );
        }
        result
    }

    /// Run both hops on copies. Returns the post-route pools only when the
    /// route produced output.
    fn simulate<P: ReservePool>(
        direction: RouteDirection,
        pool_am: &P,
        pool_mb: &P,
        amount_in: f64,
    ) -> (RouteResult, Option<(P, P)>) {
        if !(amount_in > 0.0) {
            return (RouteResult::zero(amount_in), None);
        }

        match direction {
            RouteDirection::AtoB => {
                let (hop1, am) = pool_am.preview_swap(SwapDirection::YForX, amount_in);
                if hop1.is_empty() {
                    return (RouteResult::zero(amount_in), None);
                }
                let (hop2, mb) = pool_mb.preview_swap(SwapDirection::XForY, hop1.amount_out);
                if hop2.is_empty() {
                    return (RouteResult::from_hops(amount_in, hop1.amount_out, 0.0), None);
                }
                let result = RouteResult::from_hops(amount_in, hop1.amount_out, hop2.amount_out);
                (result, Some((am, mb)))
            }
            RouteDirection::BtoA => {
                let (hop1, mb) = pool_mb.preview_swap(SwapDirection::YForX, amount_in);
                if hop1.is_empty() {
                    return (RouteResult::zero(amount_in), None);
                }
                let (hop2, am) = pool_am.preview_swap(SwapDirection::XForY, hop1.amount_out);
                if hop2.is_empty() {
                    return (RouteResult::from_hops(amount_in, hop1.amount_out, 0.0), None);
                }
                let result = RouteResult::from_hops(amount_in, hop1.amount_out, hop2.amount_out);
                (result, Some((am, mb)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Pool;

    // pool_col_x: X = XRP, Y = COL (~20 COL per XRP)
    // pool_x_copx: X = XRP, Y = COPX (~2500 COPX per XRP)
    fn seed() -> (Pool, Pool) {
        (
            Pool::new(10_000.0, 200_000.0, 30).unwrap(),
            Pool::new(10_000.0, 25_000_000.0, 30).unwrap(),
        )
    }

    #[test]
    fn test_quote_is_positive_and_below_mid() {
        let (col_x, x_copx) = seed();
        let quote = Router::quote_a_to_b(&col_x, &x_copx, 5_000.0);

        let mid = (10_000.0 / 200_000.0) * (25_000_000.0 / 10_000.0);
        assert!(quote.amount_out > 0.0);
        assert!(quote.effective_price < mid);
        assert_eq!(quote.hop2_out, quote.amount_out);
    }

    #[test]
    fn test_quote_does_not_mutate() {
        let (col_x, x_copx) = seed();
        Router::quote_a_to_b(&col_x, &x_copx, 5_000.0);
        Router::quote_b_to_a(&col_x, &x_copx, 1_000_000.0);
        assert_eq!((col_x, x_copx), seed());
    }

    #[test]
    fn test_quote_equals_execute() {
        let (col_x, x_copx) = seed();
        let quote = Router::quote_a_to_b(&col_x, &x_copx, 5_000.0);

        let (mut a, mut b) = seed();
        let executed = Router::execute_a_to_b(&mut a, &mut b, 5_000.0);

        assert!((executed.amount_out - quote.amount_out).abs() / quote.amount_out < 1e-9);
        assert_eq!(a.y_reserve(), 205_000.0);
        assert!(b.y_reserve() < 25_000_000.0);
    }

    #[test]
    fn test_reverse_route_quote_equals_execute() {
        let (col_x, x_copx) = seed();
        let quote = Router::quote_b_to_a(&col_x, &x_copx, 1_000_000.0);
        assert!(quote.amount_out > 0.0);

        let (mut a, mut b) = seed();
        let executed = Router::execute_b_to_a(&mut a, &mut b, 1_000_000.0);
        assert_eq!(executed, quote);
        assert_eq!(b.y_reserve(), 26_000_000.0);
        assert!(a.y_reserve() < 200_000.0);
    }

    #[test]
    fn test_non_positive_input_is_zero_route() {
        let (mut col_x, mut x_copx) = seed();

        let quote = Router::quote_a_to_b(&col_x, &x_copx, 0.0);
        assert_eq!(quote.amount_out, 0.0);
        assert_eq!(quote.effective_price, 0.0);

        let executed = Router::execute_a_to_b(&mut col_x, &mut x_copx, -10.0);
        assert!(!executed.is_filled());
        assert_eq!((col_x, x_copx), seed());
    }

    #[test]
    fn test_dry_middle_hop_commits_nothing() {
        let col_x = Pool::new(10_000.0, 200_000.0, 30).unwrap();
        let empty = Pool::new(0.0, 0.0, 30).unwrap();

        let (mut a, mut b) = (col_x, empty);
        let result = Router::execute_a_to_b(&mut a, &mut b, 5_000.0);

        assert_eq!(result.amount_out, 0.0);
        assert!(result.hop1_out > 0.0);
        assert_eq!(a, col_x);
        assert_eq!(b, empty);
    }

    #[test]
    fn test_direction_dispatch() {
        let (col_x, x_copx) = seed();
        assert_eq!(
            Router::quote(RouteDirection::AtoB, &col_x, &x_copx, 100.0),
            Router::quote_a_to_b(&col_x, &x_copx, 100.0)
        );
        assert_eq!(
            Router::quote(RouteDirection::BtoA, &col_x, &x_copx, 100.0),
            Router::quote_b_to_a(&col_x, &x_copx, 100.0)
        );
    }

    #[test]
    fn test_route_result_serializes() {
        let (col_x, x_copx) = seed();
        let quote = Router::quote_a_to_b(&col_x, &x_copx, 5_000.0);
        let json = serde_json::to_value(quote).unwrap();
        assert_eq!(json["amount_in"], 5_000.0);
        assert!(json["hop1_out"].as_f64().unwrap() > 0.0);
    }
}
