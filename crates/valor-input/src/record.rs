//! Raw input records and their conversion into a complete valuation input.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use valor_core::error::{ValorError, ValorResult};
use valor_core::types::{ValuationInput, YearComponents};

use crate::field::FieldKey;

/// One entity's raw inputs. Any field may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InputRecord {
    /// Entity being valued.
    pub company_name: String,

    /// Client the valuation is prepared for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,

    /// Field values keyed by column name. `None` marks an empty cell.
    #[serde(default)]
    pub fields: BTreeMap<FieldKey, Option<Decimal>>,
}

impl InputRecord {
    /// Creates an empty record.
    #[must_use]
    pub fn new(company_name: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            client_name: None,
            fields: BTreeMap::new(),
        }
    }

    /// Sets the client name.
    #[must_use]
    pub fn with_client_name(mut self, client_name: impl Into<String>) -> Self {
        self.client_name = Some(client_name.into());
        self
    }

    /// Sets a field value.
    #[must_use]
    pub fn with(mut self, key: FieldKey, value: Decimal) -> Self {
        self.set(key, Some(value));
        self
    }

    /// Sets or clears a field value.
    pub fn set(&mut self, key: FieldKey, value: Option<Decimal>) {
        self.fields.insert(key, value);
    }

    /// Returns a field's value, if present.
    #[must_use]
    pub fn get(&self, key: FieldKey) -> Option<Decimal> {
        self.fields.get(&key).copied().flatten()
    }

    /// Returns true if the field is absent or empty.
    #[must_use]
    pub fn is_missing(&self, key: FieldKey) -> bool {
        self.get(key).is_none()
    }

    /// Projection years implied by this record's own `NOIAT_i` keys.
    #[must_use]
    pub fn detected_years(&self) -> usize {
        self.fields
            .keys()
            .filter_map(|k| match k {
                FieldKey::Noiat(i) => Some(*i),
                _ => None,
            })
            .max()
            .unwrap_or(0)
    }

    /// Required fields that are absent or empty.
    #[must_use]
    pub fn missing_fields(&self, years: usize) -> Vec<FieldKey> {
        missing_fields(self, years)
    }

    /// Converts into a complete valuation input for `years` projection years.
    ///
    /// # Errors
    ///
    /// - `ValorError::MissingInput` listing every absent field
    /// - `ValorError::InvalidInput` if `years` is 0 or the first period
    ///   fraction lies outside (0, 1]
    pub fn into_input(self, years: usize) -> ValorResult<ValuationInput> {
        let missing = self.missing_fields(years);
        if !missing.is_empty() {
            return Err(ValorError::missing_input(
                missing.iter().map(FieldKey::column_name),
            ));
        }

        let value = |key: FieldKey| self.get(key).unwrap_or_default();

        let first_period_fraction = value(FieldKey::FirstPeriodFraction);
        if first_period_fraction <= Decimal::ZERO || first_period_fraction > Decimal::ONE {
            return Err(ValorError::invalid_input(format!(
                "First_Period_Fraction {first_period_fraction} must lie in (0, 1]"
            )));
        }

        ValuationInput::builder()
            .wacc_percent(value(FieldKey::Wacc))
            .terminal_growth_percent(value(FieldKey::TerminalGrowth))
            .opening_cash(value(FieldKey::OpeningCash))
            .other_non_operating_assets(value(FieldKey::OtherNonOperatingAssets))
            .debt(value(FieldKey::Debt))
            .dlom_percent(value(FieldKey::Dlom))
            .money_infusion(value(FieldKey::MoneyInfusion))
            .first_period_fraction(first_period_fraction)
            .years((1..=years).map(|i| {
                YearComponents::new(
                    value(FieldKey::Noiat(i)),
                    value(FieldKey::Depreciation(i)),
                    value(FieldKey::Capex(i)),
                    value(FieldKey::IncrementalNwc(i)),
                )
            }))
            .build()
    }
}

/// Every required field of `record` that is absent or empty: scalars first,
/// then per-year fields in year order.
#[must_use]
pub fn missing_fields(record: &InputRecord, years: usize) -> Vec<FieldKey> {
    FieldKey::required(years)
        .into_iter()
        .filter(|k| record.is_missing(*k))
        .collect()
}
