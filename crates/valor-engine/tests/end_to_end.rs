//! End-to-end valuation scenarios.

use approx::assert_relative_eq;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use valor_config::{AxisConfig, EngineConfig, PrecisionConfig, SensitivityConfig};
use valor_core::math::round_dp;
use valor_core::{ValorError, ValuationInput, YearComponents};
use valor_engine::prelude::*;

// =============================================================================
// TEST FIXTURES
// =============================================================================

/// Two full years at 12% WACC, 3% growth, 10% DLOM.
fn two_year_input() -> ValuationInput {
    ValuationInput::builder()
        .wacc_percent(dec!(12))
        .terminal_growth_percent(dec!(3))
        .opening_cash(dec!(50))
        .other_non_operating_assets(dec!(0))
        .debt(dec!(200))
        .dlom_percent(dec!(10))
        .money_infusion(dec!(0))
        .first_period_fraction(dec!(1))
        .year(YearComponents::new(dec!(100), dec!(10), dec!(20), dec!(5)))
        .year(YearComponents::new(dec!(120), dec!(10), dec!(15), dec!(5)))
        .build()
        .unwrap()
}

/// Three flat years with a half first period.
fn stub_period_input(wacc: Decimal) -> ValuationInput {
    let mut builder = ValuationInput::builder()
        .wacc_percent(wacc)
        .terminal_growth_percent(dec!(2))
        .opening_cash(dec!(0))
        .other_non_operating_assets(dec!(0))
        .debt(dec!(0))
        .dlom_percent(dec!(0))
        .money_infusion(dec!(0))
        .first_period_fraction(dec!(0.5));
    for _ in 0..3 {
        builder = builder.year(YearComponents::new(dec!(100), dec!(0), dec!(0), dec!(0)));
    }
    builder.build().unwrap()
}

// =============================================================================
// VALUATION
// =============================================================================

#[test]
fn test_two_year_bridge() {
    let valuation = compute_valuation(&two_year_input()).unwrap();

    assert_eq!(valuation.free_cash_flows.as_slice(), &[dec!(85), dec!(110)]);
    assert_eq!(round_dp(valuation.rows[0].present_value, 2), dec!(75.89));
    assert_eq!(round_dp(valuation.rows[1].present_value, 2), dec!(87.69));
    assert_eq!(round_dp(valuation.pv_discrete, 2), dec!(163.58));
    assert_eq!(valuation.terminal_fcf, dec!(113.30));
    assert_eq!(round_dp(valuation.terminal_value, 2), dec!(1258.89));
    assert_eq!(round_dp(valuation.pv_terminal, 2), dec!(1003.58));
    assert_eq!(round_dp(valuation.enterprise_value, 2), dec!(1167.16));
    assert_eq!(round_dp(valuation.invested_capital, 2), dec!(1217.16));
    assert_eq!(round_dp(valuation.equity_before_dlom, 2), dec!(1017.16));
    assert_eq!(round_dp(valuation.dlom_amount, 2), dec!(101.72));
    assert_eq!(round_dp(valuation.equity_after_dlom, 2), dec!(915.45));
    assert_eq!(valuation.equity_post_money, valuation.equity_after_dlom);
}

#[test]
fn test_stub_period_discounts_at_cumulative_time() {
    let valuation = compute_valuation(&stub_period_input(dec!(10))).unwrap();

    let elapsed: Vec<Decimal> = valuation.rows.iter().map(|r| r.elapsed).collect();
    assert_eq!(elapsed, vec![dec!(0.5), dec!(1.5), dec!(2.5)]);
    assert_eq!(valuation.horizon, dec!(2.5));

    let expected_tv_pv = 102.0 / 0.08 / 1.1_f64.powf(2.5);
    assert_relative_eq!(
        valuation.pv_terminal.to_f64().unwrap(),
        expected_tv_pv,
        epsilon = 1e-9
    );
}

#[test]
fn test_enterprise_value_is_sum_of_parts() {
    let valuation = compute_valuation(&stub_period_input(dec!(9))).unwrap();
    let rows: Decimal = valuation.rows.iter().map(|r| r.present_value).sum();
    assert_eq!(rows, valuation.pv_discrete);
    assert_eq!(
        valuation.enterprise_value,
        valuation.pv_discrete + valuation.pv_terminal
    );
}

#[test]
fn test_equal_rates_fail_whole_valuation() {
    let input = stub_period_input(dec!(2));
    let err = compute_valuation(&input).unwrap_err();
    assert!(err.is_rate_equality());
    assert_eq!(err, ValorError::rate_equality(dec!(0.02), dec!(0.02)));
}

// =============================================================================
// SENSITIVITY
// =============================================================================

#[test]
fn test_grid_base_cell_matches_engine() {
    let engine = ValuationEngine::new(EngineConfig::standard());
    let (valuation, grid) = engine.value_with_sensitivity(&two_year_input()).unwrap();

    assert_eq!(grid.dimensions(), (9, 7));
    assert_eq!(
        grid.cell(dec!(0.03), dec!(0.12)),
        Some(SensitivityCell::Value(round_dp(valuation.enterprise_value, 2)))
    );
}

#[test]
fn test_grid_marks_non_positive_spread_undefined() {
    // Rates 0.01..=0.06 against growth 0.01..=0.05.
    let engine = ValuationEngine::default();
    let mut input = two_year_input();
    input.wacc_percent = dec!(3.5);
    let valuation = engine.value(&input).unwrap();
    let grid = engine.sensitivity(&valuation);

    for row in &grid.rows {
        for (w, cell) in grid.discount_rates.iter().zip(&row.cells) {
            if *w <= row.growth_rate {
                assert_eq!(*cell, SensitivityCell::Undefined);
            } else {
                assert!(cell.value().is_some());
            }
        }
    }
}

#[test]
fn test_engine_config_drives_grid_and_precision() {
    let config = EngineConfig::new("NARROW")
        .with_precision(PrecisionConfig {
            money_dp: 0,
            ..PrecisionConfig::default()
        })
        .with_sensitivity(
            SensitivityConfig::default()
                .with_discount_rate(AxisConfig::new(dec!(0.01), dec!(0.01), dec!(0.01)))
                .with_growth_rate(AxisConfig::new(dec!(0.01), Decimal::ZERO, dec!(-0.02))),
        );
    let engine = ValuationEngine::new(config);
    let (_, grid) = engine.value_with_sensitivity(&two_year_input()).unwrap();

    assert_eq!(grid.discount_rates, vec![dec!(0.11), dec!(0.12), dec!(0.13)]);
    assert_eq!(grid.dimensions(), (1, 3));
    assert_eq!(
        grid.cell(dec!(0.03), dec!(0.12)),
        Some(SensitivityCell::Value(dec!(1167)))
    );
}

#[test]
fn test_summary_lines() {
    let engine = ValuationEngine::default();
    let valuation = engine.value(&two_year_input()).unwrap();
    let summary = engine.summary(&valuation);

    assert_eq!(summary.len(), 8);
    assert_eq!(summary.last().map(|l| l.value), Some(dec!(915.45)));
    assert!(summary.iter().any(|l| l.label == "DLOM (%)" && l.value == dec!(10)));
}
