//! Sensitivity grid configuration.
//!
//! Controls the discount-rate and growth-rate axes of the sensitivity grid.
//! All rates are fractions (0.01 = 1 percentage point).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{Validate, ValidationError};

/// Upper bound on `max_points` accepted by validation.
const MAX_POINTS_LIMIT: usize = 10_000;

/// Range specification for one axis of the sensitivity grid.
///
/// Values run from `max(floor, base - span)` to `base + span` inclusive in
/// increments of `step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisConfig {
    /// Increment between adjacent values.
    pub step: Decimal,
    /// Distance from the base value to either end of the axis.
    pub span: Decimal,
    /// Lowest value the axis may start at.
    pub floor: Decimal,
}

impl AxisConfig {
    /// Creates an axis specification.
    #[must_use]
    pub fn new(step: Decimal, span: Decimal, floor: Decimal) -> Self {
        Self { step, span, floor }
    }

    /// Discount-rate axis: +/- 3% in 1% steps, floored at 1%.
    #[must_use]
    pub fn discount_rate() -> Self {
        Self::new(dec!(0.01), dec!(0.03), dec!(0.01))
    }

    /// Growth-rate axis: +/- 2% in 0.5% steps, floored at -2%.
    #[must_use]
    pub fn growth_rate() -> Self {
        Self::new(dec!(0.005), dec!(0.02), dec!(-0.02))
    }

    /// Inclusive lower bound of the axis around `base`, saturating at the
    /// smallest representable decimal.
    #[must_use]
    pub fn lower_bound(&self, base: Decimal) -> Decimal {
        self.floor.max(base.saturating_sub(self.span))
    }

    /// Inclusive upper bound of the axis around `base`, saturating at the
    /// largest representable decimal.
    #[must_use]
    pub fn upper_bound(&self, base: Decimal) -> Decimal {
        base.saturating_add(self.span)
    }

    fn validate_axis(&self, axis: &str, errors: &mut Vec<ValidationError>) {
        if self.step <= Decimal::ZERO {
            errors.push(ValidationError::with_rule(
                format!("{axis}.step"),
                format!("Step {} must be positive", self.step),
                "positive_step",
            ));
        }
        if self.span < Decimal::ZERO {
            errors.push(ValidationError::with_rule(
                format!("{axis}.span"),
                format!("Span {} cannot be negative", self.span),
                "non_negative_span",
            ));
        }
    }
}

/// Sensitivity grid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensitivityConfig {
    /// Discount-rate (column) axis.
    #[serde(default = "AxisConfig::discount_rate")]
    pub discount_rate: AxisConfig,

    /// Growth-rate (row) axis.
    #[serde(default = "AxisConfig::growth_rate")]
    pub growth_rate: AxisConfig,

    /// Maximum number of values generated per axis.
    #[serde(default = "default_max_points")]
    pub max_points: usize,
}

fn default_max_points() -> usize {
    999
}

impl Default for SensitivityConfig {
    fn default() -> Self {
        Self {
            discount_rate: AxisConfig::discount_rate(),
            growth_rate: AxisConfig::growth_rate(),
            max_points: default_max_points(),
        }
    }
}

impl SensitivityConfig {
    /// Sets the discount-rate axis.
    #[must_use]
    pub fn with_discount_rate(mut self, axis: AxisConfig) -> Self {
        self.discount_rate = axis;
        self
    }

    /// Sets the growth-rate axis.
    #[must_use]
    pub fn with_growth_rate(mut self, axis: AxisConfig) -> Self {
        self.growth_rate = axis;
        self
    }

    /// Sets the per-axis point cap.
    #[must_use]
    pub fn with_max_points(mut self, max_points: usize) -> Self {
        self.max_points = max_points;
        self
    }
}

impl Validate for SensitivityConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        self.discount_rate.validate_axis("discount_rate", &mut errors);
        self.growth_rate.validate_axis("growth_rate", &mut errors);

        if self.max_points == 0 || self.max_points > MAX_POINTS_LIMIT {
            errors.push(ValidationError::with_rule(
                "max_points",
                format!("Max points must be between 1 and {MAX_POINTS_LIMIT}"),
                "valid_max_points",
            ));
        }

        errors
    }
}
