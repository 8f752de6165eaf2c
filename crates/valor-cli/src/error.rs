//! CLI error types.

use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Projection length out of range.
    #[error("Invalid number of projection years: {0}. Must be between 1 and {max}.", max = crate::commands::MAX_TEMPLATE_YEARS)]
    InvalidYears(usize),

    /// The input file holds no entities.
    #[error("No entities found in {0}")]
    EmptyInput(String),

    /// No projection year columns in the input.
    #[error("No NOIAT_i columns found in {0}; cannot detect projection years")]
    NoProjectionYears(String),

    /// Some entities could not be valued.
    #[error("{failed} of {total} entities could not be valued")]
    EntitiesFailed {
        /// Entities skipped.
        failed: usize,
        /// Entities read.
        total: usize,
    },
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
