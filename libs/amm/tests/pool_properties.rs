//! Pool and Router Property Tests
//!
//! Mathematical properties that must hold for any reasonable reserve sizes,
//! fee tiers and trade amounts.

use colink_amm::{Pool, PriceUtils, Router};
use proptest::prelude::*;

prop_compose! {
    fn valid_reserve()
        (reserve in 1_000.0f64..1e9) -> f64 {
        reserve
    }
}

prop_compose! {
    fn valid_fee()
        (fee_bps in 0u32..=100u32) -> u32 {
        fee_bps
    }
}

prop_compose! {
    fn seeded_pool()
        (x in valid_reserve(), y in valid_reserve(), fee in valid_fee()) -> Pool {
        Pool::new(x, y, fee).unwrap()
    }
}

/// Trade size as a fraction of the input-side reserve
fn trade_fraction() -> impl Strategy<Value = f64> {
    1e-6f64..0.5
}

fn rel_diff(a: f64, b: f64) -> f64 {
    (a - b).abs() / a.abs().max(b.abs()).max(f64::MIN_POSITIVE)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_swap_x_for_y_lowers_price(pool in seeded_pool(), frac in trade_fraction()) {
        let mut pool = pool;
        let before = pool.mid_price_y_per_x();
        let fill = pool.swap_x_for_y(pool.x_reserve() * frac);

        prop_assert!(fill.amount_out > 0.0);
        prop_assert!(pool.mid_price_y_per_x() < before);
    }

    #[test]
    fn prop_swap_y_for_x_raises_price(pool in seeded_pool(), frac in trade_fraction()) {
        let mut pool = pool;
        let before = pool.mid_price_y_per_x();
        pool.swap_y_for_x(pool.y_reserve() * frac);

        prop_assert!(pool.mid_price_y_per_x() > before);
    }

    #[test]
    fn prop_constant_product_never_shrinks(pool in seeded_pool(), frac in trade_fraction(), x_side in any::<bool>()) {
        let mut pool = pool;
        let k_before = pool.k();
        if x_side {
            pool.swap_x_for_y(pool.x_reserve() * frac);
        } else {
            pool.swap_y_for_x(pool.y_reserve() * frac);
        }

        prop_assert!(pool.x_reserve() > 0.0 && pool.y_reserve() > 0.0);
        // Allow for rounding on zero-fee pools
        prop_assert!(pool.k() >= k_before * (1.0 - 1e-12));
    }

    #[test]
    fn prop_quote_matches_execute(
        col_x in seeded_pool(),
        x_copx in seeded_pool(),
        frac in trade_fraction(),
    ) {
        let amount_in = col_x.y_reserve() * frac;
        let quote = Router::quote_a_to_b(&col_x, &x_copx, amount_in);

        let (mut a, mut b) = (col_x, x_copx);
        let executed = Router::execute_a_to_b(&mut a, &mut b, amount_in);

        prop_assert!(rel_diff(quote.amount_out, executed.amount_out) < 1e-9);
    }

    #[test]
    fn prop_effective_price_never_beats_mid(
        col_x in seeded_pool(),
        x_copx in seeded_pool(),
        frac in trade_fraction(),
    ) {
        let amount_in = col_x.y_reserve() * frac;
        let mid = PriceUtils::mid_route_price_b_per_a(&col_x, &x_copx);
        let quote = Router::quote_a_to_b(&col_x, &x_copx, amount_in);

        prop_assert!(quote.effective_price <= mid * (1.0 + 1e-12));
        prop_assert!(PriceUtils::modeled_bps_impact_for_size(&col_x, &x_copx, amount_in) >= 0.0);
    }

    #[test]
    fn prop_proportional_deposit_keeps_price(pool in seeded_pool(), scale in 1e-4f64..2.0) {
        let mut pool = pool;
        let price = pool.mid_price_y_per_x();
        pool.add_liquidity(pool.x_reserve() * scale, pool.y_reserve() * scale);

        prop_assert!(rel_diff(pool.mid_price_y_per_x(), price) < 1e-9);
    }

    #[test]
    fn prop_remove_then_readd_restores_reserves(pool in seeded_pool(), fraction in 0.01f64..0.99) {
        let original = pool;
        let mut pool = pool;
        let (dx, dy) = pool.remove_liquidity(fraction);
        pool.add_liquidity(dx, dy);

        prop_assert!(rel_diff(pool.x_reserve(), original.x_reserve()) < 1e-9);
        prop_assert!(rel_diff(pool.y_reserve(), original.y_reserve()) < 1e-9);
    }
}
