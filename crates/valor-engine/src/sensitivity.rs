//! Enterprise value sensitivity to the discount and terminal growth rates.
//!
//! Every cell is an exact recomputation of enterprise value with the cell's
//! rates substituted; nothing is interpolated. Cells whose discount rate does
//! not exceed the growth rate are [`SensitivityCell::Undefined`].

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use valor_config::{AxisConfig, EngineConfig, SensitivityConfig};
use valor_core::error::ValorError;
use valor_core::math::round_dp;
use valor_core::types::{FreeCashFlowSeries, PeriodWeights};

use crate::kernel::enterprise_value;
use crate::valuation::Valuation;

/// One cell of the sensitivity grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SensitivityCell {
    /// Enterprise value rounded to the configured money precision.
    Value(Decimal),
    /// No meaningful value for this (rate, growth) pair.
    Undefined,
}

impl SensitivityCell {
    /// Returns the value, if defined.
    #[must_use]
    pub fn value(&self) -> Option<Decimal> {
        match self {
            Self::Value(v) => Some(*v),
            Self::Undefined => None,
        }
    }

    /// Returns true if the cell has no value.
    #[must_use]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }
}

impl fmt::Display for SensitivityCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v}"),
            Self::Undefined => write!(f, "n/a"),
        }
    }
}

/// Cells for one terminal growth rate, ordered by ascending discount rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensitivityRow {
    /// Terminal growth rate (fraction) for this row.
    pub growth_rate: Decimal,
    /// One cell per discount-rate column.
    pub cells: Vec<SensitivityCell>,
}

/// Enterprise value across discount-rate columns and growth-rate rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensitivityGrid {
    /// Column discount rates (fractions), ascending.
    pub discount_rates: Vec<Decimal>,
    /// Rows ordered by ascending growth rate.
    pub rows: Vec<SensitivityRow>,
}

impl SensitivityGrid {
    /// Number of (rows, columns).
    #[must_use]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows.len(), self.discount_rates.len())
    }

    /// Growth rates of the rows, ascending.
    pub fn growth_rates(&self) -> impl Iterator<Item = Decimal> + '_ {
        self.rows.iter().map(|r| r.growth_rate)
    }

    /// Looks up the cell for an exact (growth, discount) pair.
    #[must_use]
    pub fn cell(&self, growth_rate: Decimal, discount_rate: Decimal) -> Option<SensitivityCell> {
        let col = self.discount_rates.iter().position(|w| *w == discount_rate)?;
        let row = self.rows.iter().find(|r| r.growth_rate == growth_rate)?;
        row.cells.get(col).copied()
    }

    /// Number of cells marked undefined.
    #[must_use]
    pub fn undefined_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|r| r.cells.iter())
            .filter(|c| c.is_undefined())
            .count()
    }
}

/// Why a single cell has no value. Recovered locally, never propagated.
#[derive(Debug)]
enum UndefinedCell {
    NonPositiveSpread,
    Arithmetic(ValorError),
}

/// Builds sensitivity grids.
#[derive(Debug, Clone)]
pub struct SensitivityBuilder {
    config: SensitivityConfig,
    money_dp: u32,
}

impl Default for SensitivityBuilder {
    fn default() -> Self {
        Self::new(SensitivityConfig::default())
    }
}

impl SensitivityBuilder {
    /// Creates a builder rounding cells to 2 decimal places.
    #[must_use]
    pub fn new(config: SensitivityConfig) -> Self {
        Self {
            config,
            money_dp: 2,
        }
    }

    /// Creates a builder from an engine configuration.
    #[must_use]
    pub fn from_engine_config(config: &EngineConfig) -> Self {
        Self::new(config.sensitivity.clone()).with_money_dp(config.precision.money_dp)
    }

    /// Sets the number of decimal places cells are rounded to.
    #[must_use]
    pub fn with_money_dp(mut self, money_dp: u32) -> Self {
        self.money_dp = money_dp;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &SensitivityConfig {
        &self.config
    }

    /// Values of one axis around `base`, ascending.
    ///
    /// Falls back to `[base]` when the range is empty or the step is not
    /// positive, and never yields more than `max_points` values.
    #[must_use]
    pub fn axis_values(axis: &AxisConfig, base: Decimal, max_points: usize) -> Vec<Decimal> {
        if axis.step <= Decimal::ZERO || max_points == 0 {
            return vec![base];
        }

        let lower = axis.lower_bound(base);
        let upper = axis.upper_bound(base);
        let mut values = Vec::new();
        let mut x = lower;
        while x <= upper && values.len() < max_points {
            values.push(x);
            match x.checked_add(axis.step) {
                Some(next) => x = next,
                None => break,
            }
        }

        if values.is_empty() {
            values.push(base);
        }
        values
    }

    /// Builds the grid around a valuation's own rates and series.
    #[must_use]
    pub fn build_for(&self, valuation: &Valuation) -> SensitivityGrid {
        self.build(
            &valuation.free_cash_flows,
            &valuation.period_weights,
            valuation.wacc,
            valuation.terminal_growth,
        )
    }

    /// Builds the grid. Never fails; bad cells are marked undefined.
    #[must_use]
    pub fn build(
        &self,
        fcf: &FreeCashFlowSeries,
        weights: &PeriodWeights,
        wacc_base: Decimal,
        growth_base: Decimal,
    ) -> SensitivityGrid {
        let discount_rates =
            Self::axis_values(&self.config.discount_rate, wacc_base, self.config.max_points);
        let growth_rates =
            Self::axis_values(&self.config.growth_rate, growth_base, self.config.max_points);

        log::debug!(
            "building {}x{} sensitivity grid around wacc {} growth {}",
            growth_rates.len(),
            discount_rates.len(),
            wacc_base,
            growth_base
        );

        let row_for = |g: &Decimal| SensitivityRow {
            growth_rate: *g,
            cells: discount_rates
                .iter()
                .map(|w| self.cell(fcf, weights, *w, *g))
                .collect(),
        };

        #[cfg(feature = "parallel")]
        let rows = {
            use rayon::prelude::*;
            growth_rates.par_iter().map(row_for).collect()
        };
        #[cfg(not(feature = "parallel"))]
        let rows = growth_rates.iter().map(row_for).collect();

        SensitivityGrid {
            discount_rates,
            rows,
        }
    }

    fn cell(
        &self,
        fcf: &FreeCashFlowSeries,
        weights: &PeriodWeights,
        wacc: Decimal,
        growth: Decimal,
    ) -> SensitivityCell {
        match Self::cell_value(fcf, weights, wacc, growth) {
            Ok(ev) => SensitivityCell::Value(round_dp(ev, self.money_dp)),
            Err(reason) => {
                log::trace!("sensitivity cell (g={growth}, w={wacc}) undefined: {reason:?}");
                SensitivityCell::Undefined
            }
        }
    }

    fn cell_value(
        fcf: &FreeCashFlowSeries,
        weights: &PeriodWeights,
        wacc: Decimal,
        growth: Decimal,
    ) -> Result<Decimal, UndefinedCell> {
        let spread = wacc.checked_sub(growth).ok_or_else(|| {
            UndefinedCell::Arithmetic(ValorError::math_error("rate spread overflow"))
        })?;
        if spread <= Decimal::ZERO {
            return Err(UndefinedCell::NonPositiveSpread);
        }
        enterprise_value(fcf, weights, wacc, growth).map_err(UndefinedCell::Arithmetic)
    }
}

/// Builds a grid with the standard axes (+/-3% WACC in 1% steps, +/-2% growth
/// in 0.5% steps) and 2 dp cells.
#[must_use]
pub fn build_sensitivity(
    fcf: &FreeCashFlowSeries,
    weights: &PeriodWeights,
    wacc_base: Decimal,
    growth_base: Decimal,
) -> SensitivityGrid {
    SensitivityBuilder::default().build(fcf, weights, wacc_base, growth_base)
}
