//! Route mid-price, deviation and price-impact helpers
//!
//! Orientation: `pool_am` holds (M as X, A as Y) and `pool_mb` holds
//! (M as X, B as Y). The route mid is therefore quoted as B per A:
//!
//! ```text
//! mid = (M per A on pool_am) * (B per M on pool_mb) = (x1 / y1) * (y2 / x2)
//! ```

use crate::pool::BPS_DENOMINATOR;
use crate::pool_traits::ReservePool;
use crate::router::Router;

/// Price helpers shared by the risk guard and trading sessions
pub struct PriceUtils;

impl PriceUtils {
    /// Zero-size route price, B per A. Uses reserve ratios only.
    ///
    /// Returns 0 when either pool cannot quote (empty A or empty M side).
    pub fn mid_route_price_b_per_a<P: ReservePool>(pool_am: &P, pool_mb: &P) -> f64 {
        let (m1, a) = pool_am.reserves();
        let (m2, b) = pool_mb.reserves();
        if a <= 0.0 || m2 <= 0.0 {
            return 0.0;
        }

        let m_per_a = m1 / a;
        let b_per_m = b / m2;
        m_per_a * b_per_m
    }

    /// Absolute deviation of `effective` from `reference` in basis points.
    /// Zero when the reference is not positive.
    pub fn bps_deviation(effective: f64, reference: f64) -> f64 {
        if !(reference > 0.0) {
            return 0.0;
        }
        (effective - reference).abs() / reference * BPS_DENOMINATOR
    }

    /// Modeled impact of an A -> B trade of `amount_in`, in bps below mid.
    ///
    /// Compares the router's non-mutating quote with the route mid. Never
    /// negative; zero for non-positive size or a degenerate route.
    pub fn modeled_bps_impact_for_size<P: ReservePool>(
        pool_am: &P,
        pool_mb: &P,
        amount_in: f64,
    ) -> f64 {
        if !(amount_in > 0.0) {
            return 0.0;
        }

        let mid = Self::mid_route_price_b_per_a(pool_am, pool_mb);
        if mid <= 0.0 {
            return 0.0;
        }

        let quote = Router::quote_a_to_b(pool_am, pool_mb, amount_in);
        let impact = ((mid - quote.effective_price) / mid).max(0.0);
        impact * BPS_DENOMINATOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Pool;

    fn seed() -> (Pool, Pool) {
        (
            Pool::new(10_000.0, 200_000.0, 30).unwrap(),
            Pool::new(10_000.0, 25_000_000.0, 30).unwrap(),
        )
    }

    #[test]
    fn test_mid_route_price_composes_ratios() {
        let (col_x, x_copx) = seed();
        let mid = PriceUtils::mid_route_price_b_per_a(&col_x, &x_copx);
        // 0.05 XRP per COL * 2500 COPX per XRP
        assert!((mid - 125.0).abs() < 1e-9);
    }

    #[test]
    fn test_mid_route_price_degenerate() {
        let (col_x, _) = seed();
        let empty = Pool::new(0.0, 0.0, 30).unwrap();
        assert_eq!(PriceUtils::mid_route_price_b_per_a(&col_x, &empty), 0.0);
        assert_eq!(PriceUtils::mid_route_price_b_per_a(&empty, &col_x), 0.0);
    }

    #[test]
    fn test_bps_deviation() {
        assert_eq!(PriceUtils::bps_deviation(100.0, 100.0), 0.0);

        let below = PriceUtils::bps_deviation(95.0, 100.0);
        assert!(499.0 < below && below < 501.0);

        let above = PriceUtils::bps_deviation(105.0, 100.0);
        assert!((above - below).abs() < 1e-9);

        assert_eq!(PriceUtils::bps_deviation(5.0, 0.0), 0.0);
        assert_eq!(PriceUtils::bps_deviation(5.0, -1.0), 0.0);
    }

    #[test]
    fn test_modeled_impact_grows_with_size() {
        let (col_x, x_copx) = seed();
        let small = PriceUtils::modeled_bps_impact_for_size(&col_x, &x_copx, 100.0);
        let large = PriceUtils::modeled_bps_impact_for_size(&col_x, &x_copx, 25_000.0);

        // Fees alone put two 30 bps hops under mid
        assert!(small > 50.0);
        assert!(large > small);
    }

    #[test]
    fn test_modeled_impact_zero_cases() {
        let (col_x, x_copx) = seed();
        assert_eq!(PriceUtils::modeled_bps_impact_for_size(&col_x, &x_copx, 0.0), 0.0);

        let empty = Pool::new(0.0, 0.0, 30).unwrap();
        assert_eq!(PriceUtils::modeled_bps_impact_for_size(&col_x, &empty, 10.0), 0.0);
    }
}
