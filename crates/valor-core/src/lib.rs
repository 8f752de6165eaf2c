//! # Valor Core
//!
//! Core types and error handling for the Valor DCF valuation library.
//!
//! This crate provides the building blocks shared by the engine and its
//! collaborators:
//!
//! - **Types**: [`ValuationInput`], per-year [`YearComponents`], and the
//!   derived [`PeriodWeights`] and [`FreeCashFlowSeries`]
//! - **Errors**: [`ValorError`] covering missing inputs, rate equality and
//!   numeric failures
//! - **Math**: decimal compounding, discounting and display rounding
//!
//! ## Design Philosophy
//!
//! - **Decimal Everywhere**: money and rates are `rust_decimal::Decimal`,
//!   never binary floating point
//! - **Complete Inputs**: an incomplete record cannot become a
//!   [`ValuationInput`]
//! - **Explicit Over Implicit**: no ambient precision or defaults
//!
//! ## Example
//!
//! ```rust
//! use valor_core::prelude::*;
//! use rust_decimal_macros::dec;
//!
//! let weights = PeriodWeights::new(dec!(0.5), 3).unwrap();
//! assert_eq!(weights.total().unwrap(), dec!(2.5));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::uninlined_format_args)]

pub mod error;
pub mod math;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{ValorError, ValorResult};
    pub use crate::math::{compound_factor, discount_factor, percent_to_fraction, round_dp};
    pub use crate::types::{
        FreeCashFlowSeries, PeriodWeights, ValuationInput, ValuationInputBuilder, YearComponents,
    };
}

// Re-export commonly used types at crate root
pub use error::{ValorError, ValorResult};
pub use types::{FreeCashFlowSeries, PeriodWeights, ValuationInput, YearComponents};
