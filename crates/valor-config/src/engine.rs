//! Engine configuration types.
//!
//! This module defines the configuration passed explicitly to the valuation
//! engine, replacing any process-wide arithmetic settings.

use serde::{Deserialize, Serialize};

use crate::error::{Validate, ValidationError};
use crate::sensitivity::SensitivityConfig;

/// Largest scale a `rust_decimal::Decimal` can carry.
const MAX_DECIMAL_SCALE: u32 = 28;

// =============================================================================
// PRECISION CONFIGURATION
// =============================================================================

/// Display precision for valuation figures.
///
/// Engine arithmetic always runs at full decimal precision (28 significant
/// digits); these scales apply only when figures are rounded for output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrecisionConfig {
    /// Decimal places for monetary amounts and sensitivity cells.
    #[serde(default = "default_money_dp")]
    pub money_dp: u32,

    /// Decimal places for discount factors.
    #[serde(default = "default_factor_dp")]
    pub factor_dp: u32,

    /// Decimal places for rates expressed as fractions.
    #[serde(default = "default_rate_dp")]
    pub rate_dp: u32,
}

fn default_money_dp() -> u32 {
    2
}

fn default_factor_dp() -> u32 {
    6
}

fn default_rate_dp() -> u32 {
    4
}

impl Default for PrecisionConfig {
    fn default() -> Self {
        Self {
            money_dp: default_money_dp(),
            factor_dp: default_factor_dp(),
            rate_dp: default_rate_dp(),
        }
    }
}

impl Validate for PrecisionConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for (field, value) in [
            ("precision.money_dp", self.money_dp),
            ("precision.factor_dp", self.factor_dp),
            ("precision.rate_dp", self.rate_dp),
        ] {
            if value > MAX_DECIMAL_SCALE {
                errors.push(ValidationError::with_rule(
                    field,
                    format!("Precision {value} exceeds maximum of {MAX_DECIMAL_SCALE}"),
                    "max_precision",
                ));
            }
        }
        errors
    }
}

// =============================================================================
// ENGINE CONFIGURATION
// =============================================================================

/// Configuration for a valuation engine instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Configuration name/identifier.
    #[serde(default = "default_name")]
    pub name: String,

    /// Description of this configuration.
    #[serde(default)]
    pub description: Option<String>,

    /// Display precision.
    #[serde(default)]
    pub precision: PrecisionConfig,

    /// Sensitivity grid settings.
    #[serde(default)]
    pub sensitivity: SensitivityConfig,
}

fn default_name() -> String {
    "STANDARD".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl EngineConfig {
    /// Creates a configuration with the given name and standard settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::standard()
        }
    }

    /// Standard settings: 2 dp money, 6 dp factors, +/-3% x +/-2% grid.
    pub fn standard() -> Self {
        Self {
            name: default_name(),
            description: Some("Standard DCF valuation settings".to_string()),
            precision: PrecisionConfig::default(),
            sensitivity: SensitivityConfig::default(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the display precision.
    #[must_use]
    pub fn with_precision(mut self, precision: PrecisionConfig) -> Self {
        self.precision = precision;
        self
    }

    /// Sets the sensitivity grid settings.
    #[must_use]
    pub fn with_sensitivity(mut self, sensitivity: SensitivityConfig) -> Self {
        self.sensitivity = sensitivity;
        self
    }
}

impl Validate for EngineConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.name.is_empty() {
            errors.push(ValidationError::new("name", "Name cannot be empty"));
        }

        errors.extend(self.precision.validate());
        errors.extend(
            self.sensitivity
                .validate()
                .into_iter()
                .map(|e| ValidationError {
                    field: format!("sensitivity.{}", e.field),
                    ..e
                }),
        );

        errors
    }
}
