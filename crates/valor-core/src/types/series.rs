//! Period weights and free cash flow series.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::ops::Index;

use super::YearComponents;
use crate::error::{ValorError, ValorResult};

/// Fraction of a full year spanned by each projection period.
///
/// The first period may be a stub (valuation date part-way through a year);
/// every later period is a full year. The weights double as the increments of
/// elapsed time used for discounting.
///
/// # Example
///
/// ```rust
/// use valor_core::types::PeriodWeights;
/// use rust_decimal_macros::dec;
///
/// let weights = PeriodWeights::new(dec!(0.5), 3)?;
/// assert_eq!(weights.as_slice(), &[dec!(0.5), dec!(1), dec!(1)]);
/// assert_eq!(weights.total()?, dec!(2.5));
/// # Ok::<(), valor_core::ValorError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Decimal>", into = "Vec<Decimal>")]
pub struct PeriodWeights(Vec<Decimal>);

impl PeriodWeights {
    /// Builds `[first_period_fraction, 1, 1, ..., 1]` of length `years`.
    ///
    /// # Errors
    ///
    /// Returns `ValorError::InvalidInput` if `years` is zero.
    pub fn new(first_period_fraction: Decimal, years: usize) -> ValorResult<Self> {
        if years == 0 {
            return Err(ValorError::invalid_input(
                "at least one projection year is required",
            ));
        }
        let mut weights = Vec::with_capacity(years);
        weights.push(first_period_fraction);
        weights.resize(years, Decimal::ONE);
        Ok(Self(weights))
    }

    /// Number of periods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a constructed series; present for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total elapsed time through the end of the last period.
    ///
    /// # Errors
    ///
    /// Returns `ValorError::Math` if the sum overflows.
    pub fn total(&self) -> ValorResult<Decimal> {
        self.0.iter().try_fold(Decimal::ZERO, |acc, w| accumulate(acc, *w))
    }

    /// Running elapsed time at the end of each period.
    ///
    /// # Errors
    ///
    /// Returns `ValorError::Math` if a running sum overflows.
    pub fn cumulative(&self) -> ValorResult<Vec<Decimal>> {
        let mut elapsed = Decimal::ZERO;
        self.0
            .iter()
            .map(|w| {
                elapsed = accumulate(elapsed, *w)?;
                Ok(elapsed)
            })
            .collect()
    }

    /// Iterates over the weights.
    pub fn iter(&self) -> impl Iterator<Item = &Decimal> {
        self.0.iter()
    }

    /// Returns the weights as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Decimal] {
        &self.0
    }
}

fn accumulate(elapsed: Decimal, weight: Decimal) -> ValorResult<Decimal> {
    elapsed
        .checked_add(weight)
        .ok_or_else(|| ValorError::math_error("elapsed time overflow"))
}

impl TryFrom<Vec<Decimal>> for PeriodWeights {
    type Error = ValorError;

    fn try_from(weights: Vec<Decimal>) -> Result<Self, Self::Error> {
        if weights.is_empty() {
            return Err(ValorError::invalid_input("period weights must not be empty"));
        }
        Ok(Self(weights))
    }
}

impl From<PeriodWeights> for Vec<Decimal> {
    fn from(weights: PeriodWeights) -> Self {
        weights.0
    }
}

impl Index<usize> for PeriodWeights {
    type Output = Decimal;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

/// Free cash flow to firm for each projection year, in year order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Decimal>", into = "Vec<Decimal>")]
pub struct FreeCashFlowSeries(Vec<Decimal>);

impl FreeCashFlowSeries {
    /// Wraps precomputed free cash flows.
    ///
    /// # Errors
    ///
    /// Returns `ValorError::InvalidInput` if the series is empty.
    pub fn new(flows: Vec<Decimal>) -> ValorResult<Self> {
        if flows.is_empty() {
            return Err(ValorError::invalid_input(
                "at least one projection year is required",
            ));
        }
        Ok(Self(flows))
    }

    /// Derives the series from per-year components.
    ///
    /// # Errors
    ///
    /// Returns `ValorError::InvalidInput` if `years` is empty, or
    /// `ValorError::Math` if a year's cash flow overflows.
    pub fn from_components(years: &[YearComponents]) -> ValorResult<Self> {
        Self::new(
            years
                .iter()
                .map(YearComponents::free_cash_flow)
                .collect::<ValorResult<Vec<_>>>()?,
        )
    }

    /// Number of years.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a constructed series; present for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Cash flow of the final projection year, the base of the terminal value.
    #[must_use]
    pub fn terminal_year(&self) -> Decimal {
        // Non-empty by construction.
        self.0[self.0.len() - 1]
    }

    /// Iterates over the flows.
    pub fn iter(&self) -> impl Iterator<Item = &Decimal> {
        self.0.iter()
    }

    /// Returns the flows as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Decimal] {
        &self.0
    }
}

impl TryFrom<Vec<Decimal>> for FreeCashFlowSeries {
    type Error = ValorError;

    fn try_from(flows: Vec<Decimal>) -> Result<Self, Self::Error> {
        Self::new(flows)
    }
}

impl From<FreeCashFlowSeries> for Vec<Decimal> {
    fn from(series: FreeCashFlowSeries) -> Self {
        series.0
    }
}

impl Index<usize> for FreeCashFlowSeries {
    type Output = Decimal;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_weights_full_first_period() {
        let weights = PeriodWeights::new(Decimal::ONE, 4).unwrap();
        assert_eq!(weights.len(), 4);
        assert_eq!(weights.total().unwrap(), dec!(4));
    }

    #[test]
    fn test_weights_single_year() {
        let weights = PeriodWeights::new(dec!(0.25), 1).unwrap();
        assert_eq!(weights.as_slice(), &[dec!(0.25)]);
        assert_eq!(weights.total().unwrap(), dec!(0.25));
    }

    #[test]
    fn test_cumulative_matches_total() {
        let weights = PeriodWeights::new(dec!(0.5), 3).unwrap();
        let cum = weights.cumulative().unwrap();
        assert_eq!(cum, vec![dec!(0.5), dec!(1.5), dec!(2.5)]);
        assert_eq!(*cum.last().unwrap(), weights.total().unwrap());
    }

    #[test]
    fn test_elapsed_time_overflow_is_an_error() {
        let huge = Decimal::MAX - Decimal::ONE;
        let weights = PeriodWeights::new(huge, 3).unwrap();
        assert!(matches!(weights.total(), Err(ValorError::Math { .. })));
        assert!(matches!(weights.cumulative(), Err(ValorError::Math { .. })));
    }

    #[test]
    fn test_overflowing_year_fails_the_series() {
        let huge = Decimal::from_scientific("5e28").unwrap();
        let years = [
            YearComponents::new(dec!(100), dec!(10), dec!(20), dec!(5)),
            YearComponents::new(huge, huge, dec!(0), dec!(0)),
        ];
        assert!(matches!(
            FreeCashFlowSeries::from_components(&years),
            Err(ValorError::Math { .. })
        ));
    }

    #[test]
    fn test_zero_years_rejected() {
        assert!(PeriodWeights::new(Decimal::ONE, 0).is_err());
        assert!(FreeCashFlowSeries::new(Vec::new()).is_err());
        assert!(FreeCashFlowSeries::from_components(&[]).is_err());
    }

    #[test]
    fn test_series_from_components() {
        let years = [
            YearComponents::new(dec!(100), dec!(10), dec!(20), dec!(5)),
            YearComponents::new(dec!(120), dec!(10), dec!(15), dec!(5)),
        ];
        let fcf = FreeCashFlowSeries::from_components(&years).unwrap();
        assert_eq!(fcf.as_slice(), &[dec!(85), dec!(110)]);
        assert_eq!(fcf.terminal_year(), dec!(110));
        assert_eq!(fcf[0], dec!(85));
    }

    #[test]
    fn test_serde_rejects_empty_series() {
        let weights: PeriodWeights = serde_json::from_str("[0.5, 1]").unwrap();
        assert_eq!(weights.total().unwrap(), dec!(1.5));
        assert!(serde_json::from_str::<FreeCashFlowSeries>("[]").is_err());
        assert!(serde_json::from_str::<PeriodWeights>("[]").is_err());
    }
}
