//! Error types for the Valor library.
//!
//! This module defines the error type shared by the valuation engine and its
//! collaborators, providing structured error handling with context.

use rust_decimal::Decimal;
use thiserror::Error;

/// Number of missing fields listed before the message is truncated.
const MISSING_FIELDS_SHOWN: usize = 10;

/// A specialized Result type for Valor operations.
pub type ValorResult<T> = Result<T, ValorError>;

/// The main error type for Valor operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValorError {
    /// One or more required inputs are absent.
    ///
    /// Raised while assembling a [`ValuationInput`](crate::types::ValuationInput),
    /// never by the engine itself.
    #[error("Missing inputs: {}", format_missing(.fields))]
    MissingInput {
        /// Names of the absent fields, in the order they were checked.
        fields: Vec<String>,
    },

    /// Discount rate equals the terminal growth rate, so the terminal value
    /// is undefined.
    #[error(
        "WACC ({wacc}) equals terminal growth rate ({terminal_growth}); please adjust inputs"
    )]
    RateEquality {
        /// Discount rate as a fraction.
        wacc: Decimal,
        /// Terminal growth rate as a fraction.
        terminal_growth: Decimal,
    },

    /// Structurally invalid input (e.g. no projection years).
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of what's invalid.
        reason: String,
    },

    /// Mathematical error (overflow, non-representable power, etc.).
    #[error("Mathematical error: {reason}")]
    Math {
        /// Description of the error.
        reason: String,
    },
}

impl ValorError {
    /// Creates a missing input error from field names.
    #[must_use]
    pub fn missing_input<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MissingInput {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a rate equality error.
    #[must_use]
    pub fn rate_equality(wacc: Decimal, terminal_growth: Decimal) -> Self {
        Self::RateEquality {
            wacc,
            terminal_growth,
        }
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Creates a math error.
    #[must_use]
    pub fn math_error(reason: impl Into<String>) -> Self {
        Self::Math {
            reason: reason.into(),
        }
    }

    /// Returns true if corrected rate assumptions would resolve this error.
    #[must_use]
    pub fn is_rate_equality(&self) -> bool {
        matches!(self, Self::RateEquality { .. })
    }
}

fn format_missing(fields: &[String]) -> String {
    let shown = fields
        .iter()
        .take(MISSING_FIELDS_SHOWN)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if fields.len() > MISSING_FIELDS_SHOWN {
        format!("{shown} ...")
    } else {
        shown
    }
}
