//! Completing records with suggested values.
//!
//! A [`FieldSuggester`] proposes values for fields a record lacks. It is an
//! optional strategy: [`Acquisition::complete`] works without one, and a
//! failing suggester only leaves the record as incomplete as it was.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use rust_decimal::Decimal;

use valor_core::error::ValorResult;
use valor_core::types::ValuationInput;

use crate::error::{InputError, InputResult};
use crate::field::FieldKey;
use crate::record::InputRecord;

/// Proposes values for missing fields.
pub trait FieldSuggester {
    /// Suggests values for some or all of `missing`.
    ///
    /// Suggestions for keys outside `missing` are ignored by the caller.
    fn suggest(
        &self,
        record: &InputRecord,
        missing: &[FieldKey],
    ) -> InputResult<BTreeMap<FieldKey, Decimal>>;
}

/// Suggests fixed values, e.g. house defaults loaded from a JSON file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticSuggester {
    values: BTreeMap<FieldKey, Decimal>,
}

impl StaticSuggester {
    /// Creates a suggester from a set of values.
    #[must_use]
    pub fn new(values: BTreeMap<FieldKey, Decimal>) -> Self {
        Self { values }
    }

    /// Adds a value.
    #[must_use]
    pub fn with(mut self, key: FieldKey, value: Decimal) -> Self {
        self.values.insert(key, value);
        self
    }

    /// Loads values from a JSON object keyed by column name.
    pub fn from_json_file(path: impl AsRef<Path>) -> InputResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(InputError::NotFound {
                path: path.display().to_string(),
            });
        }
        let values = serde_json::from_str(&fs::read_to_string(path)?)?;
        Ok(Self::new(values))
    }

    /// Number of values held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no values are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FieldSuggester for StaticSuggester {
    fn suggest(
        &self,
        _record: &InputRecord,
        missing: &[FieldKey],
    ) -> InputResult<BTreeMap<FieldKey, Decimal>> {
        Ok(missing
            .iter()
            .filter_map(|k| self.values.get(k).map(|v| (*k, *v)))
            .collect())
    }
}

/// Outcome of completing one record.
#[derive(Debug, Clone)]
pub struct Acquisition {
    record: InputRecord,
    years: usize,
    filled: Vec<FieldKey>,
    still_missing: Vec<FieldKey>,
}

impl Acquisition {
    /// Fills the record's missing fields from `suggester`, if given.
    ///
    /// Only fields that are still missing are written. Suggester failures are
    /// logged and leave the record unchanged.
    #[must_use]
    pub fn complete(
        mut record: InputRecord,
        years: usize,
        suggester: Option<&dyn FieldSuggester>,
    ) -> Self {
        let missing = record.missing_fields(years);
        let mut filled = Vec::new();

        if let Some(suggester) = suggester.filter(|_| !missing.is_empty()) {
            match suggester.suggest(&record, &missing) {
                Ok(suggestions) => {
                    for key in &missing {
                        if let Some(value) = suggestions.get(key) {
                            record.set(*key, Some(*value));
                            filled.push(*key);
                        }
                    }
                    log::debug!(
                        "{}: filled {} of {} missing fields",
                        record.company_name,
                        filled.len(),
                        missing.len()
                    );
                }
                Err(e) => {
                    log::warn!("{}: field suggestion failed: {e}", record.company_name);
                }
            }
        }

        let still_missing = record.missing_fields(years);
        Self {
            record,
            years,
            filled,
            still_missing,
        }
    }

    /// The record after completion.
    #[must_use]
    pub fn record(&self) -> &InputRecord {
        &self.record
    }

    /// Projection years the record was completed for.
    #[must_use]
    pub fn years(&self) -> usize {
        self.years
    }

    /// Fields written from suggestions.
    #[must_use]
    pub fn filled(&self) -> &[FieldKey] {
        &self.filled
    }

    /// Fields still absent.
    #[must_use]
    pub fn still_missing(&self) -> &[FieldKey] {
        &self.still_missing
    }

    /// Returns true if nothing is missing.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.still_missing.is_empty()
    }

    /// Converts into a valuation input.
    ///
    /// # Errors
    ///
    /// See [`InputRecord::into_input`].
    pub fn into_input(self) -> ValorResult<ValuationInput> {
        self.record.into_input(self.years)
    }
}
