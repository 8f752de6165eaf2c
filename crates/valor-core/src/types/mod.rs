//! Domain types for DCF valuation.
//!
//! - [`YearComponents`]: NOIAT, depreciation, capex and NWC for one year
//! - [`PeriodWeights`]: fraction of a year spanned by each period
//! - [`FreeCashFlowSeries`]: FCFF per projection year
//! - [`ValuationInput`]: complete assumptions and projections for one entity

mod components;
mod input;
mod series;

pub use components::YearComponents;
pub use input::{ValuationInput, ValuationInputBuilder};
pub use series::{FreeCashFlowSeries, PeriodWeights};
