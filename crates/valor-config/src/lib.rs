//! Valor Configuration Layer
//!
//! This crate provides the explicit configuration handed to the Valor
//! valuation engine. Nothing here is global: every engine instance is built
//! from an [`EngineConfig`] value.
//!
//! # Features
//!
//! - **Precision Configuration**: display scales for money, discount factors and rates
//! - **Sensitivity Configuration**: step, span and floor of each grid axis, plus a
//!   per-axis point cap
//! - **Validation**: every configuration implements [`Validate`]
//! - **File Loading**: JSON or TOML, chosen by extension
//!
//! # Example
//!
//! ```rust
//! use valor_config::{AxisConfig, EngineConfig, SensitivityConfig, Validate};
//! use rust_decimal_macros::dec;
//!
//! let config = EngineConfig::new("WIDE.GRID").with_sensitivity(
//!     SensitivityConfig::default()
//!         .with_discount_rate(AxisConfig::new(dec!(0.01), dec!(0.05), dec!(0.01))),
//! );
//! assert!(config.is_valid());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod engine;
mod error;
mod loader;
mod sensitivity;

// Re-export core types
pub use engine::{EngineConfig, PrecisionConfig};
pub use error::{ConfigError, ConfigResult, Validate, ValidationError};
pub use loader::{load_config, ConfigFormat};
pub use sensitivity::{AxisConfig, SensitivityConfig};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::engine::{EngineConfig, PrecisionConfig};
    pub use crate::error::{ConfigError, ConfigResult, Validate};
    pub use crate::loader::load_config;
    pub use crate::sensitivity::{AxisConfig, SensitivityConfig};
}
