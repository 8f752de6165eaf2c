//! Error types for input acquisition.

use thiserror::Error;
use valor_core::ValorError;

/// A specialized Result type for input operations.
pub type InputResult<T> = Result<T, InputError>;

/// Errors raised while reading or completing input records.
#[derive(Error, Debug)]
pub enum InputError {
    /// Input file not found.
    #[error("Input file not found: {path}")]
    NotFound {
        /// Path that was looked up.
        path: String,
    },

    /// File extension not recognised.
    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),

    /// A cell could not be read as a number.
    #[error("Row {row}: column '{column}' is not numeric: '{value}'")]
    Parse {
        /// 1-based data row.
        row: usize,
        /// Column header.
        column: String,
        /// Offending cell text.
        value: String,
    },

    /// A field suggester failed.
    #[error("Field suggestion failed: {0}")]
    Suggestion(String),

    /// Assembling a valuation input failed.
    #[error(transparent)]
    Valuation(#[from] ValorError),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl InputError {
    /// Creates a parse error.
    #[must_use]
    pub fn parse(row: usize, column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Parse {
            row,
            column: column.into(),
            value: value.into(),
        }
    }

    /// Creates a suggestion error.
    #[must_use]
    pub fn suggestion(reason: impl Into<String>) -> Self {
        Self::Suggestion(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_names_column() {
        let err = InputError::parse(3, "WACC", "twelve");
        assert_eq!(
            err.to_string(),
            "Row 3: column 'WACC' is not numeric: 'twelve'"
        );
    }

    #[test]
    fn test_valuation_error_is_transparent() {
        let err: InputError = ValorError::missing_input(["WACC", "TGR"]).into();
        assert_eq!(err.to_string(), "Missing inputs: WACC, TGR");
    }
}
