//! # Valor Engine
//!
//! Discounted cash flow valuation and enterprise value sensitivity.
//!
//! - [`valuation`]: the [`ValuationEngine`] turning a complete
//!   [`ValuationInput`](valor_core::ValuationInput) into a [`Valuation`]
//!   with discrete rows, a Gordon growth terminal value and the bridge from
//!   enterprise value to post-money equity
//! - [`sensitivity`]: enterprise value recomputed across a grid of discount
//!   and terminal growth rates
//!
//! Both share one discounting kernel, so the grid cell at the base rates
//! always equals the engine's enterprise value at display precision.
//!
//! ## Features
//!
//! - `parallel`: build sensitivity grid rows with rayon

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]

mod kernel;
pub mod sensitivity;
pub mod valuation;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::sensitivity::{
        build_sensitivity, SensitivityBuilder, SensitivityCell, SensitivityGrid, SensitivityRow,
    };
    pub use crate::valuation::{
        compute_valuation, DiscreteRow, SummaryLine, Valuation, ValuationEngine,
    };
}

pub use sensitivity::{SensitivityBuilder, SensitivityCell, SensitivityGrid};
pub use valuation::{compute_valuation, Valuation, ValuationEngine};
