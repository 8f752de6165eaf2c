//! Property-based tests for the valuation engine and sensitivity grid.

use proptest::prelude::*;
use rust_decimal::Decimal;

use valor_core::math::round_dp;
use valor_core::{ValuationInput, YearComponents};
use valor_engine::prelude::*;

// =============================================================================
// Generators
// =============================================================================

fn arb_amount() -> impl Strategy<Value = Decimal> {
    (-100_000i64..100_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// WACC in [6%, 20%] and growth in [-1%, 4%] as percentages.
fn arb_rates() -> impl Strategy<Value = (Decimal, Decimal)> {
    ((600i64..=2_000), (-100i64..=400))
        .prop_map(|(w, g)| (Decimal::new(w, 2), Decimal::new(g, 2)))
}

fn arb_input() -> impl Strategy<Value = ValuationInput> {
    (
        arb_rates(),
        (1i64..=100).prop_map(|p| Decimal::new(p, 2)),
        prop::collection::vec(
            (arb_amount(), arb_amount(), arb_amount(), arb_amount())
                .prop_map(|(n, d, c, w)| YearComponents::new(n, d, c, w)),
            1..8,
        ),
        (0i64..=5_000).prop_map(|bp| Decimal::new(bp, 2)),
    )
        .prop_map(|((wacc, tgr), first, years, dlom)| {
            let mut builder = ValuationInput::builder()
                .wacc_percent(wacc)
                .terminal_growth_percent(tgr)
                .opening_cash(Decimal::new(5_000, 0))
                .other_non_operating_assets(Decimal::ZERO)
                .debt(Decimal::new(2_000, 0))
                .dlom_percent(dlom)
                .money_infusion(Decimal::new(250, 0))
                .first_period_fraction(first);
            for year in years {
                builder = builder.year(year);
            }
            builder.build().unwrap()
        })
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Enterprise value is the discrete PV sum plus the terminal PV.
    #[test]
    fn prop_enterprise_value_decomposes(input in arb_input()) {
        let v = compute_valuation(&input).unwrap();
        let discrete: Decimal = v.rows.iter().map(|r| r.present_value).sum();
        prop_assert_eq!(discrete, v.pv_discrete);
        prop_assert_eq!(v.enterprise_value, v.pv_discrete + v.pv_terminal);
        prop_assert_eq!(v.horizon, v.period_weights.total().unwrap());
    }

    /// The equity bridge holds for every input.
    #[test]
    fn prop_equity_bridge(input in arb_input()) {
        let v = compute_valuation(&input).unwrap();
        prop_assert_eq!(
            v.invested_capital,
            v.enterprise_value + v.opening_cash + v.other_non_operating_assets
        );
        prop_assert_eq!(v.equity_before_dlom, v.invested_capital - v.debt);
        prop_assert_eq!(v.equity_after_dlom, v.equity_before_dlom - v.dlom_amount);
        prop_assert_eq!(v.equity_post_money, v.equity_after_dlom + v.money_infusion);
    }

    /// Discount factors decline as elapsed time grows.
    #[test]
    fn prop_discount_factors_decline(input in arb_input()) {
        let v = compute_valuation(&input).unwrap();
        prop_assert!(v.rows.windows(2).all(|w| w[1].discount_factor < w[0].discount_factor));
        prop_assert!(v.rows.iter().all(|r| r.discount_factor > Decimal::ZERO));
    }

    /// The base cell of the grid reproduces the engine's enterprise value.
    #[test]
    fn prop_grid_base_cell_matches_engine(input in arb_input()) {
        let engine = ValuationEngine::default();
        let (v, grid) = engine.value_with_sensitivity(&input).unwrap();
        if let Some(cell) = grid.cell(v.terminal_growth, v.wacc) {
            prop_assert_eq!(cell, SensitivityCell::Value(round_dp(v.enterprise_value, 2)));
        }
        for row in &grid.rows {
            prop_assert_eq!(row.cells.len(), grid.discount_rates.len());
            for (w, cell) in grid.discount_rates.iter().zip(&row.cells) {
                if *w <= row.growth_rate {
                    prop_assert!(cell.is_undefined());
                }
            }
        }
    }
}
