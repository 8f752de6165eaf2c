//! CLI command implementations.

pub mod sensitivity;
pub mod template;
pub mod value;

// Re-export submodules for convenience
pub use sensitivity::SensitivityArgs;
pub use template::TemplateArgs;
pub use value::ValueArgs;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use valor_config::{load_config, EngineConfig};
use valor_core::{ValorError, ValuationInput};
use valor_engine::{Valuation, ValuationEngine};
use valor_input::{
    read_input, Acquisition, FieldKey, FieldSuggester, InputBatch, InputRecord, StaticSuggester,
};

use crate::error::CliError;
use crate::output::format_rate;

/// Largest projection length `valor template` accepts.
pub const MAX_TEMPLATE_YEARS: usize = 50;

/// Input options shared by the valuing commands.
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Input file (.csv or .json), one entity per row or element
    #[arg(short, long)]
    pub input: PathBuf,

    /// Engine configuration file (.toml or .json)
    #[arg(short, long, env = "VALOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// JSON object of default values for missing fields, keyed by column name
    #[arg(short, long)]
    pub defaults: Option<PathBuf>,
}

/// Everything needed to value the entities of one input file.
pub struct Session {
    pub engine: ValuationEngine,
    pub batch: InputBatch,
    suggester: Option<StaticSuggester>,
    source: String,
}

/// Why an entity was not valued.
#[derive(Debug)]
pub enum EntityFailure {
    /// Required fields still absent after applying defaults.
    Missing(Vec<FieldKey>),
    /// The inputs were complete but could not be valued.
    Valuation(ValorError),
}

impl EntityFailure {
    /// Message shown to the user, with rates rendered at `rate_dp`.
    pub fn message(&self, company: &str, rate_dp: u32) -> String {
        match self {
            Self::Missing(fields) => format!(
                "Cannot value {company}. {}",
                ValorError::missing_input(fields.iter().map(FieldKey::column_name))
            ),
            Self::Valuation(ValorError::RateEquality {
                wacc,
                terminal_growth,
            }) => format!(
                "Cannot value {company}. WACC ({}) equals TGR ({}); adjust WACC or TGR and re-run.",
                format_rate(*wacc, rate_dp),
                format_rate(*terminal_growth, rate_dp)
            ),
            Self::Valuation(e) => format!("Cannot value {company}. {e}"),
        }
    }
}

/// One entity after acquisition and valuation.
pub struct Entity {
    pub record: InputRecord,
    pub filled: Vec<FieldKey>,
    pub outcome: Result<(ValuationInput, Valuation), EntityFailure>,
}

impl Session {
    /// Loads the engine configuration, the input file and any defaults.
    pub fn open(args: &InputArgs) -> Result<Self> {
        let config = match &args.config {
            Some(path) => load_config(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => EngineConfig::standard(),
        };
        tracing::debug!(config = %config.name, "engine configured");

        let suggester = args
            .defaults
            .as_deref()
            .map(|path| StaticSuggester::from_json_file(path))
            .transpose()
            .context("loading defaults")?;

        let batch = read_input(&args.input)
            .with_context(|| format!("reading {}", args.input.display()))?;
        let source = args.input.display().to_string();
        if batch.is_empty() {
            return Err(CliError::EmptyInput(source).into());
        }
        if batch.years == 0 {
            return Err(CliError::NoProjectionYears(source).into());
        }
        tracing::info!(entities = batch.len(), years = batch.years, "input loaded");

        Ok(Self {
            engine: ValuationEngine::new(config),
            batch,
            suggester,
            source,
        })
    }

    /// Input file the session was opened from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Completes and values every entity. One entity's failure never stops
    /// the others.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        let years = self.batch.years;
        self.batch.records.iter().map(move |record| {
            let suggester = self
                .suggester
                .as_ref()
                .map(|s| s as &dyn FieldSuggester);
            let acquisition = Acquisition::complete(record.clone(), years, suggester);
            let filled = acquisition.filled().to_vec();

            if !acquisition.is_complete() {
                let missing = acquisition.still_missing().to_vec();
                return Entity {
                    record: acquisition.record().clone(),
                    filled,
                    outcome: Err(EntityFailure::Missing(missing)),
                };
            }

            let record = acquisition.record().clone();
            let outcome = acquisition
                .into_input()
                .and_then(|input| self.engine.value(&input).map(|v| (input, v)))
                .map_err(EntityFailure::Valuation);
            if let Err(e) = &outcome {
                tracing::warn!(company = %record.company_name, "valuation failed: {e:?}");
            }
            Entity {
                record,
                filled,
                outcome,
            }
        })
    }
}

/// Validates a projection length for `valor template`.
pub fn validate_years(years: usize) -> crate::error::CliResult<usize> {
    if !(1..=MAX_TEMPLATE_YEARS).contains(&years) {
        return Err(CliError::InvalidYears(years));
    }
    Ok(years)
}

/// Fails with a summary error if any entity was skipped.
pub fn finish(failed: usize, total: usize) -> Result<()> {
    if failed > 0 {
        return Err(CliError::EntitiesFailed { failed, total }.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_validate_years() {
        assert!(validate_years(0).is_err());
        assert_eq!(validate_years(5).unwrap(), 5);
        assert!(validate_years(MAX_TEMPLATE_YEARS + 1).is_err());
    }

    #[test]
    fn test_rate_equality_message() {
        let failure = EntityFailure::Valuation(ValorError::rate_equality(dec!(0.12), dec!(0.12)));
        assert_eq!(
            failure.message("Acme", 4),
            "Cannot value Acme. WACC (12.00%) equals TGR (12.00%); adjust WACC or TGR and re-run."
        );
        assert!(failure.message("Acme", 5).contains("WACC (12.000%)"));
    }

    #[test]
    fn test_missing_message_truncates() {
        let failure = EntityFailure::Missing(FieldKey::required(3));
        let message = failure.message("Acme", 4);
        assert!(message.starts_with("Cannot value Acme. Missing inputs: WACC, TGR"));
        assert!(message.ends_with(" ..."));
    }
}
