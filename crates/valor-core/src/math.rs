//! Decimal arithmetic helpers shared by the engine and its collaborators.
//!
//! All valuation arithmetic stays in [`Decimal`]; rounding is only applied by
//! [`round_dp`] when a value is prepared for display.

use rust_decimal::prelude::*;
use rust_decimal::MathematicalOps;

use crate::error::{ValorError, ValorResult};

/// Converts a percentage (12 means 12%) to a fraction (0.12).
#[must_use]
pub fn percent_to_fraction(percent: Decimal) -> Decimal {
    percent / Decimal::ONE_HUNDRED
}

/// Converts a fraction (0.12) to a percentage (12).
#[must_use]
pub fn fraction_to_percent(fraction: Decimal) -> Decimal {
    fraction * Decimal::ONE_HUNDRED
}

/// Growth factor `(1 + rate)^time` for a possibly fractional elapsed time.
///
/// Whole-year exponents are evaluated by repeated multiplication and are
/// exact; fractional exponents go through `exp(time * ln(1 + rate))`.
///
/// # Errors
///
/// Returns `ValorError::Math` if `1 + rate` is not positive or the power
/// overflows.
pub fn compound_factor(rate: Decimal, time: Decimal) -> ValorResult<Decimal> {
    let base = Decimal::ONE
        .checked_add(rate)
        .ok_or_else(|| ValorError::math_error(format!("cannot compound at rate {rate}")))?;
    if base <= Decimal::ZERO {
        return Err(ValorError::math_error(format!(
            "cannot compound at rate {rate}: 1 + rate must be positive"
        )));
    }
    base.checked_powd(time).ok_or_else(|| {
        ValorError::math_error(format!("overflow computing (1 + {rate})^{time}"))
    })
}

/// Discount factor `1 / (1 + rate)^time`.
///
/// # Errors
///
/// Propagates [`compound_factor`] failures, and returns `ValorError::Math` if
/// the growth factor is zero after rounding.
pub fn discount_factor(rate: Decimal, time: Decimal) -> ValorResult<Decimal> {
    let growth = compound_factor(rate, time)?;
    Decimal::ONE.checked_div(growth).ok_or_else(|| {
        ValorError::math_error(format!("discount factor underflow at rate {rate}, time {time}"))
    })
}

/// Rounds to `dp` decimal places with banker's rounding.
#[must_use]
pub fn round_dp(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointNearestEven)
}
