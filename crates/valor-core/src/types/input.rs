//! Fully populated valuation input.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{FreeCashFlowSeries, PeriodWeights, YearComponents};
use crate::error::{ValorError, ValorResult};
use crate::math::percent_to_fraction;

/// Assumptions and projections for one entity being valued.
///
/// Rates are stored as percentages (12 means 12%) exactly as they are
/// collected; the engine converts them to fractions. Every field is required:
/// incomplete records are rejected by [`ValuationInputBuilder::build`] before
/// an engine ever sees them.
///
/// # Example
///
/// ```rust
/// use valor_core::types::{ValuationInput, YearComponents};
/// use rust_decimal_macros::dec;
///
/// let input = ValuationInput::builder()
///     .wacc_percent(dec!(12))
///     .terminal_growth_percent(dec!(3))
///     .opening_cash(dec!(50))
///     .other_non_operating_assets(dec!(0))
///     .debt(dec!(200))
///     .dlom_percent(dec!(10))
///     .money_infusion(dec!(0))
///     .first_period_fraction(dec!(1))
///     .year(YearComponents::new(dec!(100), dec!(10), dec!(20), dec!(5)))
///     .build()
///     .unwrap();
/// assert_eq!(input.wacc(), dec!(0.12));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuationInput {
    /// Discount rate (WACC) as a percentage.
    pub wacc_percent: Decimal,
    /// Terminal growth rate as a percentage.
    pub terminal_growth_percent: Decimal,
    /// Cash on hand at the valuation date.
    pub opening_cash: Decimal,
    /// Non-operating assets added to enterprise value.
    pub other_non_operating_assets: Decimal,
    /// Debt deducted from invested capital.
    pub debt: Decimal,
    /// Discount for lack of marketability as a percentage.
    pub dlom_percent: Decimal,
    /// Fresh money added after the DLOM haircut.
    pub money_infusion: Decimal,
    /// Fraction of a year spanned by the first projection period.
    pub first_period_fraction: Decimal,
    /// Projection years in order, starting with FY 1.
    pub years: Vec<YearComponents>,
}

impl ValuationInput {
    /// Returns a builder for assembling an input field by field.
    #[must_use]
    pub fn builder() -> ValuationInputBuilder {
        ValuationInputBuilder::default()
    }

    /// Discount rate as a fraction.
    #[must_use]
    pub fn wacc(&self) -> Decimal {
        percent_to_fraction(self.wacc_percent)
    }

    /// Terminal growth rate as a fraction.
    #[must_use]
    pub fn terminal_growth(&self) -> Decimal {
        percent_to_fraction(self.terminal_growth_percent)
    }

    /// DLOM as a fraction.
    #[must_use]
    pub fn dlom(&self) -> Decimal {
        percent_to_fraction(self.dlom_percent)
    }

    /// Number of projection years.
    #[must_use]
    pub fn year_count(&self) -> usize {
        self.years.len()
    }

    /// Period weights derived from the first period fraction.
    ///
    /// # Errors
    ///
    /// Returns `ValorError::InvalidInput` if there are no projection years.
    pub fn period_weights(&self) -> ValorResult<PeriodWeights> {
        PeriodWeights::new(self.first_period_fraction, self.years.len())
    }

    /// Free cash flow series derived from the yearly components.
    ///
    /// # Errors
    ///
    /// Returns `ValorError::InvalidInput` if there are no projection years, or
    /// `ValorError::Math` if a year's cash flow overflows.
    pub fn free_cash_flows(&self) -> ValorResult<FreeCashFlowSeries> {
        FreeCashFlowSeries::from_components(&self.years)
    }
}

/// Builder for [`ValuationInput`].
///
/// Unlike a constructor with defaults, the builder never fills in a value:
/// `build` reports every field that was not set.
#[derive(Debug, Clone, Default)]
pub struct ValuationInputBuilder {
    wacc_percent: Option<Decimal>,
    terminal_growth_percent: Option<Decimal>,
    opening_cash: Option<Decimal>,
    other_non_operating_assets: Option<Decimal>,
    debt: Option<Decimal>,
    dlom_percent: Option<Decimal>,
    money_infusion: Option<Decimal>,
    first_period_fraction: Option<Decimal>,
    years: Vec<YearComponents>,
}

impl ValuationInputBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the discount rate (percent).
    #[must_use]
    pub fn wacc_percent(mut self, value: Decimal) -> Self {
        self.wacc_percent = Some(value);
        self
    }

    /// Sets the terminal growth rate (percent).
    #[must_use]
    pub fn terminal_growth_percent(mut self, value: Decimal) -> Self {
        self.terminal_growth_percent = Some(value);
        self
    }

    /// Sets the opening cash.
    #[must_use]
    pub fn opening_cash(mut self, value: Decimal) -> Self {
        self.opening_cash = Some(value);
        self
    }

    /// Sets other non-operating assets.
    #[must_use]
    pub fn other_non_operating_assets(mut self, value: Decimal) -> Self {
        self.other_non_operating_assets = Some(value);
        self
    }

    /// Sets the debt.
    #[must_use]
    pub fn debt(mut self, value: Decimal) -> Self {
        self.debt = Some(value);
        self
    }

    /// Sets the DLOM (percent).
    #[must_use]
    pub fn dlom_percent(mut self, value: Decimal) -> Self {
        self.dlom_percent = Some(value);
        self
    }

    /// Sets the money infusion.
    #[must_use]
    pub fn money_infusion(mut self, value: Decimal) -> Self {
        self.money_infusion = Some(value);
        self
    }

    /// Sets the first period fraction.
    #[must_use]
    pub fn first_period_fraction(mut self, value: Decimal) -> Self {
        self.first_period_fraction = Some(value);
        self
    }

    /// Appends the next projection year.
    #[must_use]
    pub fn year(mut self, components: YearComponents) -> Self {
        self.years.push(components);
        self
    }

    /// Appends several projection years in order.
    #[must_use]
    pub fn years(mut self, components: impl IntoIterator<Item = YearComponents>) -> Self {
        self.years.extend(components);
        self
    }

    /// Builds the input.
    ///
    /// # Errors
    ///
    /// Returns `ValorError::MissingInput` naming every unset scalar, or
    /// `ValorError::InvalidInput` if no projection year was added.
    pub fn build(self) -> ValorResult<ValuationInput> {
        let checks = [
            ("WACC", self.wacc_percent.is_none()),
            ("TGR", self.terminal_growth_percent.is_none()),
            ("Opening Cash", self.opening_cash.is_none()),
            ("Other Non-Op Assets", self.other_non_operating_assets.is_none()),
            ("Debt", self.debt.is_none()),
            ("DLOM", self.dlom_percent.is_none()),
            ("Money Infusion", self.money_infusion.is_none()),
            ("First_Period_Fraction", self.first_period_fraction.is_none()),
        ];
        let missing: Vec<&str> = checks
            .iter()
            .filter(|(_, absent)| *absent)
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(ValorError::missing_input(missing));
        }
        if self.years.is_empty() {
            return Err(ValorError::invalid_input(
                "at least one projection year is required",
            ));
        }

        Ok(ValuationInput {
            wacc_percent: self.wacc_percent.unwrap_or_default(),
            terminal_growth_percent: self.terminal_growth_percent.unwrap_or_default(),
            opening_cash: self.opening_cash.unwrap_or_default(),
            other_non_operating_assets: self.other_non_operating_assets.unwrap_or_default(),
            debt: self.debt.unwrap_or_default(),
            dlom_percent: self.dlom_percent.unwrap_or_default(),
            money_infusion: self.money_infusion.unwrap_or_default(),
            first_period_fraction: self.first_period_fraction.unwrap_or_default(),
            years: self.years,
        })
    }
}
