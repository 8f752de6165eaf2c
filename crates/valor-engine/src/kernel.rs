//! Discounting kernel shared by the valuation engine and the sensitivity grid.
//!
//! Both callers run the same procedure: discount each year's free cash flow
//! at the cumulative elapsed time, then capitalise the final year with the
//! Gordon growth formula and discount it over the full horizon.

use rust_decimal::Decimal;

use valor_core::error::{ValorError, ValorResult};
use valor_core::math::{compound_factor, discount_factor};
use valor_core::types::{FreeCashFlowSeries, PeriodWeights};

/// One discounted projection year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DiscountedFlow {
    pub fcf: Decimal,
    pub elapsed: Decimal,
    pub discount_factor: Decimal,
    pub present_value: Decimal,
}

/// Capitalised value of the cash flows beyond the projection horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Terminal {
    pub fcf: Decimal,
    pub value: Decimal,
    pub present_value: Decimal,
}

/// Discounts every year's flow at `rate`, in year order.
pub(crate) fn discount_flows(
    fcf: &FreeCashFlowSeries,
    weights: &PeriodWeights,
    rate: Decimal,
) -> ValorResult<Vec<DiscountedFlow>> {
    if fcf.len() != weights.len() {
        return Err(ValorError::invalid_input(format!(
            "{} cash flows but {} period weights",
            fcf.len(),
            weights.len()
        )));
    }

    fcf.iter()
        .zip(weights.cumulative()?)
        .map(|(&flow, elapsed)| {
            let df = discount_factor(rate, elapsed)?;
            let present_value = flow
                .checked_mul(df)
                .ok_or_else(|| ValorError::math_error("present value overflow"))?;
            Ok(DiscountedFlow {
                fcf: flow,
                elapsed,
                discount_factor: df,
                present_value,
            })
        })
        .collect()
}

/// Gordon growth terminal value discounted over `horizon` years.
///
/// Fails with `RateEquality` before dividing when `rate == growth`.
pub(crate) fn terminal_value(
    final_fcf: Decimal,
    rate: Decimal,
    growth: Decimal,
    horizon: Decimal,
) -> ValorResult<Terminal> {
    let spread = rate
        .checked_sub(growth)
        .ok_or_else(|| ValorError::math_error("rate spread overflow"))?;
    if spread.is_zero() {
        return Err(ValorError::rate_equality(rate, growth));
    }

    let fcf = Decimal::ONE
        .checked_add(growth)
        .and_then(|factor| final_fcf.checked_mul(factor))
        .ok_or_else(|| ValorError::math_error("terminal cash flow overflow"))?;
    let value = fcf
        .checked_div(spread)
        .ok_or_else(|| ValorError::math_error("terminal value overflow"))?;
    let present_value = value
        .checked_div(compound_factor(rate, horizon)?)
        .ok_or_else(|| ValorError::math_error("terminal value discounting overflow"))?;

    Ok(Terminal {
        fcf,
        value,
        present_value,
    })
}

/// Sum of discrete present values, accumulated in year order.
pub(crate) fn sum_present_values(flows: &[DiscountedFlow]) -> ValorResult<Decimal> {
    flows.iter().try_fold(Decimal::ZERO, |acc, f| {
        acc.checked_add(f.present_value)
            .ok_or_else(|| ValorError::math_error("present value sum overflow"))
    })
}

/// Enterprise value for one (rate, growth) pair.
pub(crate) fn enterprise_value(
    fcf: &FreeCashFlowSeries,
    weights: &PeriodWeights,
    rate: Decimal,
    growth: Decimal,
) -> ValorResult<Decimal> {
    let flows = discount_flows(fcf, weights, rate)?;
    let terminal = terminal_value(fcf.terminal_year(), rate, growth, weights.total()?)?;
    sum_present_values(&flows)?
        .checked_add(terminal.present_value)
        .ok_or_else(|| ValorError::math_error("enterprise value overflow"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use valor_core::math::round_dp;

    fn two_year() -> (FreeCashFlowSeries, PeriodWeights) {
        (
            FreeCashFlowSeries::new(vec![dec!(85), dec!(110)]).unwrap(),
            PeriodWeights::new(Decimal::ONE, 2).unwrap(),
        )
    }

    #[test]
    fn test_discount_flows_use_cumulative_time() {
        let fcf = FreeCashFlowSeries::new(vec![dec!(100), dec!(100), dec!(100)]).unwrap();
        let weights = PeriodWeights::new(dec!(0.5), 3).unwrap();
        let flows = discount_flows(&fcf, &weights, dec!(0.10)).unwrap();
        let elapsed: Vec<Decimal> = flows.iter().map(|f| f.elapsed).collect();
        assert_eq!(elapsed, vec![dec!(0.5), dec!(1.5), dec!(2.5)]);
    }

    #[test]
    fn test_terminal_rejects_equal_rates() {
        let err = terminal_value(dec!(110), dec!(0.10), dec!(0.10), dec!(2)).unwrap_err();
        assert_eq!(err, ValorError::rate_equality(dec!(0.10), dec!(0.10)));
    }

    #[test]
    fn test_enterprise_value_two_years() {
        let (fcf, weights) = two_year();
        let ev = enterprise_value(&fcf, &weights, dec!(0.12), dec!(0.03)).unwrap();
        assert_eq!(round_dp(ev, 2), dec!(1167.16));
    }

    #[test]
    fn test_extreme_rates_are_errors() {
        let (fcf, weights) = two_year();
        for (rate, growth) in [
            (dec!(0.12), Decimal::MIN),
            (dec!(0.12), Decimal::MAX),
            (Decimal::MAX - Decimal::ONE, dec!(0.03)),
        ] {
            assert!(matches!(
                enterprise_value(&fcf, &weights, rate, growth),
                Err(ValorError::Math { .. })
            ));
        }
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let (fcf, _) = two_year();
        let weights = PeriodWeights::new(Decimal::ONE, 3).unwrap();
        assert!(matches!(
            discount_flows(&fcf, &weights, dec!(0.12)),
            Err(ValorError::InvalidInput { .. })
        ));
    }
}
