//! DCF valuation.
//!
//! This module provides:
//! - [`ValuationEngine`]: configured engine turning a [`ValuationInput`] into a [`Valuation`]
//! - [`Valuation`]: immutable result with discrete rows, terminal value and equity bridge
//! - [`compute_valuation`]: convenience wrapper using the standard configuration
//!
//! # Usage
//!
//! ```rust
//! use valor_config::EngineConfig;
//! use valor_core::types::{ValuationInput, YearComponents};
//! use valor_engine::valuation::ValuationEngine;
//! use rust_decimal_macros::dec;
//!
//! let input = ValuationInput::builder()
//!     .wacc_percent(dec!(12))
//!     .terminal_growth_percent(dec!(3))
//!     .opening_cash(dec!(50))
//!     .other_non_operating_assets(dec!(0))
//!     .debt(dec!(200))
//!     .dlom_percent(dec!(10))
//!     .money_infusion(dec!(0))
//!     .first_period_fraction(dec!(1))
//!     .year(YearComponents::new(dec!(100), dec!(10), dec!(20), dec!(5)))
//!     .year(YearComponents::new(dec!(120), dec!(10), dec!(15), dec!(5)))
//!     .build()?;
//!
//! let engine = ValuationEngine::new(EngineConfig::standard());
//! let valuation = engine.value(&input)?;
//! assert_eq!(valuation.rows.len(), 2);
//! # Ok::<(), valor_core::ValorError>(())
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use valor_config::{EngineConfig, PrecisionConfig};
use valor_core::error::{ValorError, ValorResult};
use valor_core::math::{fraction_to_percent, round_dp};
use valor_core::types::{FreeCashFlowSeries, PeriodWeights, ValuationInput};

use crate::kernel::{discount_flows, sum_present_values, terminal_value};
use crate::sensitivity::{SensitivityBuilder, SensitivityGrid};

/// One discounted projection year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscreteRow {
    /// Year label, `FY 1` onwards.
    pub label: String,
    /// Free cash flow to firm.
    pub fcf: Decimal,
    /// Elapsed time in years at the end of this period.
    pub elapsed: Decimal,
    /// `1 / (1 + wacc)^elapsed`.
    pub discount_factor: Decimal,
    /// `fcf * discount_factor`.
    pub present_value: Decimal,
}

impl DiscreteRow {
    /// Returns a copy rounded for display.
    #[must_use]
    pub fn rounded(&self, precision: &PrecisionConfig) -> Self {
        Self {
            label: self.label.clone(),
            fcf: round_dp(self.fcf, precision.money_dp),
            elapsed: self.elapsed,
            discount_factor: round_dp(self.discount_factor, precision.factor_dp),
            present_value: round_dp(self.present_value, precision.money_dp),
        }
    }
}

/// Result of a DCF valuation.
///
/// All figures are unrounded; use [`Valuation::summary`] or
/// [`DiscreteRow::rounded`] to prepare them for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Valuation {
    /// Discount rate as a fraction.
    pub wacc: Decimal,
    /// Terminal growth rate as a fraction.
    pub terminal_growth: Decimal,
    /// DLOM as a fraction.
    pub dlom: Decimal,
    /// Period weights used for discounting.
    pub period_weights: PeriodWeights,
    /// Free cash flow series.
    pub free_cash_flows: FreeCashFlowSeries,
    /// Discounted projection years in year order.
    pub rows: Vec<DiscreteRow>,
    /// Sum of discrete present values.
    pub pv_discrete: Decimal,
    /// Total elapsed time through the final period.
    pub horizon: Decimal,
    /// Final-year cash flow grown one period at the terminal rate.
    pub terminal_fcf: Decimal,
    /// Gordon growth terminal value.
    pub terminal_value: Decimal,
    /// Terminal value discounted over the horizon.
    pub pv_terminal: Decimal,
    /// `pv_discrete + pv_terminal`.
    pub enterprise_value: Decimal,
    /// Opening cash added to enterprise value.
    pub opening_cash: Decimal,
    /// Other non-operating assets added to enterprise value.
    pub other_non_operating_assets: Decimal,
    /// Enterprise value plus cash and non-operating assets.
    pub invested_capital: Decimal,
    /// Debt deducted from invested capital.
    pub debt: Decimal,
    /// Invested capital less debt.
    pub equity_before_dlom: Decimal,
    /// Marketability haircut.
    pub dlom_amount: Decimal,
    /// Equity after the DLOM haircut.
    pub equity_after_dlom: Decimal,
    /// Money infusion added after DLOM.
    pub money_infusion: Decimal,
    /// Final post-money equity value.
    pub equity_post_money: Decimal,
}

/// A labelled figure in the valuation summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryLine {
    /// Display label.
    pub label: &'static str,
    /// Rounded value.
    pub value: Decimal,
}

impl Valuation {
    /// Key figures of the equity bridge, rounded to `precision.money_dp`.
    ///
    /// DLOM is reported as a percentage.
    #[must_use]
    pub fn summary(&self, precision: &PrecisionConfig) -> Vec<SummaryLine> {
        let money = |label, value| SummaryLine {
            label,
            value: round_dp(value, precision.money_dp),
        };
        vec![
            money("PV of Discrete Cash Flows", self.pv_discrete),
            money("PV of Terminal Value", self.pv_terminal),
            money("Enterprise Value (EV)", self.enterprise_value),
            money("Opening Cash", self.opening_cash),
            money("Other Non-Operating Assets", self.other_non_operating_assets),
            money("Debt", self.debt),
            money("DLOM (%)", fraction_to_percent(self.dlom)),
            money("Equity Value (Post-Money)", self.equity_post_money),
        ]
    }

    /// Share of enterprise value contributed by the terminal value.
    ///
    /// Returns `None` when enterprise value is zero.
    #[must_use]
    pub fn terminal_share(&self) -> Option<Decimal> {
        self.pv_terminal.checked_div(self.enterprise_value)
    }
}

/// DCF valuation engine.
///
/// Holds an explicit [`EngineConfig`]; valuations themselves are pure and the
/// engine may be shared freely across threads.
#[derive(Debug, Clone, Default)]
pub struct ValuationEngine {
    config: EngineConfig,
}

impl ValuationEngine {
    /// Creates an engine with the given configuration.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Returns the engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Values one entity.
    ///
    /// # Errors
    ///
    /// - `ValorError::RateEquality` if WACC equals the terminal growth rate
    /// - `ValorError::InvalidInput` if there are no projection years
    /// - `ValorError::Math` on decimal overflow
    pub fn value(&self, input: &ValuationInput) -> ValorResult<Valuation> {
        let wacc = input.wacc();
        let terminal_growth = input.terminal_growth();
        let dlom = input.dlom();

        let period_weights = input.period_weights()?;
        let free_cash_flows = input.free_cash_flows()?;

        let flows = discount_flows(&free_cash_flows, &period_weights, wacc)?;
        let pv_discrete = sum_present_values(&flows)?;
        let rows = flows
            .iter()
            .enumerate()
            .map(|(i, f)| DiscreteRow {
                label: format!("FY {}", i + 1),
                fcf: f.fcf,
                elapsed: f.elapsed,
                discount_factor: f.discount_factor,
                present_value: f.present_value,
            })
            .collect::<Vec<_>>();

        // Final cumulative time; equals the sum of all period weights.
        let horizon = flows.last().map_or(Decimal::ZERO, |f| f.elapsed);
        let terminal = terminal_value(
            free_cash_flows.terminal_year(),
            wacc,
            terminal_growth,
            horizon,
        )?;

        let enterprise_value = checked_sum(pv_discrete, terminal.present_value)?;
        let invested_capital = checked_sum(
            checked_sum(enterprise_value, input.opening_cash)?,
            input.other_non_operating_assets,
        )?;
        let equity_before_dlom = invested_capital
            .checked_sub(input.debt)
            .ok_or_else(|| ValorError::math_error("equity bridge overflow deducting debt"))?;
        let dlom_amount = equity_before_dlom
            .checked_mul(dlom)
            .ok_or_else(|| ValorError::math_error("DLOM amount overflow"))?;
        let equity_after_dlom = equity_before_dlom
            .checked_sub(dlom_amount)
            .ok_or_else(|| ValorError::math_error("equity bridge overflow deducting DLOM"))?;
        let equity_post_money = checked_sum(equity_after_dlom, input.money_infusion)?;

        log::debug!(
            "valued {} projection years: EV {} equity {}",
            rows.len(),
            round_dp(enterprise_value, self.config.precision.money_dp),
            round_dp(equity_post_money, self.config.precision.money_dp)
        );

        Ok(Valuation {
            wacc,
            terminal_growth,
            dlom,
            period_weights,
            free_cash_flows,
            rows,
            pv_discrete,
            horizon,
            terminal_fcf: terminal.fcf,
            terminal_value: terminal.value,
            pv_terminal: terminal.present_value,
            enterprise_value,
            opening_cash: input.opening_cash,
            other_non_operating_assets: input.other_non_operating_assets,
            invested_capital,
            debt: input.debt,
            equity_before_dlom,
            dlom_amount,
            equity_after_dlom,
            money_infusion: input.money_infusion,
            equity_post_money,
        })
    }

    /// Builds the sensitivity grid around a valuation's own rates.
    #[must_use]
    pub fn sensitivity(&self, valuation: &Valuation) -> SensitivityGrid {
        SensitivityBuilder::from_engine_config(&self.config).build_for(valuation)
    }

    /// Values one entity and builds its sensitivity grid.
    ///
    /// # Errors
    ///
    /// See [`ValuationEngine::value`]; the grid itself never fails.
    pub fn value_with_sensitivity(
        &self,
        input: &ValuationInput,
    ) -> ValorResult<(Valuation, SensitivityGrid)> {
        let valuation = self.value(input)?;
        let grid = self.sensitivity(&valuation);
        Ok((valuation, grid))
    }

    /// Summary figures rounded with this engine's precision.
    #[must_use]
    pub fn summary(&self, valuation: &Valuation) -> Vec<SummaryLine> {
        valuation.summary(&self.config.precision)
    }
}

/// Values one entity with the standard configuration.
///
/// # Errors
///
/// See [`ValuationEngine::value`].
pub fn compute_valuation(input: &ValuationInput) -> ValorResult<Valuation> {
    ValuationEngine::default().value(input)
}

fn checked_sum(a: Decimal, b: Decimal) -> ValorResult<Decimal> {
    a.checked_add(b)
        .ok_or_else(|| ValorError::math_error("valuation bridge overflow"))
}
