//! Reading input records from CSV and JSON files.
//!
//! CSV files carry a header row and one entity per row; empty cells are
//! missing values. JSON files hold an array of records:
//!
//! ```json
//! [{"company_name": "Acme", "fields": {"WACC": 12, "NOIAT_1": null}}]
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::{InputError, InputResult};
use crate::field::{detect_years, FieldKey, CLIENT_NAME_COLUMN, COMPANY_NAME_COLUMN};
use crate::record::InputRecord;

/// Records read from one source, with the projection length they share.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InputBatch {
    /// Projection years detected from the `NOIAT_i` columns.
    pub years: usize,
    /// One record per entity, in file order.
    pub records: Vec<InputRecord>,
}

impl InputBatch {
    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// =============================================================================
// CSV
// =============================================================================

/// Reads a CSV file.
pub fn read_csv(path: impl AsRef<Path>) -> InputResult<InputBatch> {
    read_csv_from(open(path.as_ref())?)
}

/// Reads CSV data from any reader.
pub fn read_csv_from<R: Read>(reader: R) -> InputResult<InputBatch> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = reader.headers()?.clone();

    let columns: Vec<Option<FieldKey>> = headers
        .iter()
        .map(|h| match h.parse::<FieldKey>() {
            Ok(key) => Some(key),
            Err(_) => {
                if h != COMPANY_NAME_COLUMN && h != CLIENT_NAME_COLUMN {
                    log::trace!("ignoring column '{h}'");
                }
                None
            }
        })
        .collect();
    let company_col = headers.iter().position(|h| h == COMPANY_NAME_COLUMN);
    let client_col = headers.iter().position(|h| h == CLIENT_NAME_COLUMN);

    let mut records = Vec::new();
    for (idx, row) in reader.records().enumerate() {
        let row = row?;

        let company_name = company_col
            .and_then(|c| row.get(c))
            .filter(|s| !s.is_empty())
            .map_or_else(|| format!("Company_row_{idx}"), str::to_string);
        let mut record = InputRecord::new(company_name);
        record.client_name = client_col
            .and_then(|c| row.get(c))
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        for (col, cell) in row.iter().enumerate() {
            let Some(key) = columns.get(col).copied().flatten() else {
                continue;
            };
            let value =
                parse_cell(cell).map_err(|_| InputError::parse(idx + 1, &headers[col], cell))?;
            record.set(key, value);
        }
        records.push(record);
    }

    let years = detect_years(headers.iter());
    log::debug!("read {} records with {} projection years", records.len(), years);
    Ok(InputBatch { years, records })
}

/// Parses one cell. Empty cells are missing; thousands separators are
/// accepted.
fn parse_cell(cell: &str) -> Result<Option<Decimal>, rust_decimal::Error> {
    let text = cell.trim();
    if text.is_empty() {
        return Ok(None);
    }
    let cleaned: String = text.chars().filter(|c| *c != ',').collect();
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .map(Some)
}

// =============================================================================
// JSON
// =============================================================================

/// Reads a JSON file.
pub fn read_json(path: impl AsRef<Path>) -> InputResult<InputBatch> {
    read_json_from(open(path.as_ref())?)
}

/// Reads a JSON array of records from any reader.
pub fn read_json_from<R: Read>(reader: R) -> InputResult<InputBatch> {
    let records: Vec<InputRecord> = serde_json::from_reader(reader)?;
    let years = records
        .iter()
        .map(InputRecord::detected_years)
        .max()
        .unwrap_or(0);
    log::debug!("read {} records with {} projection years", records.len(), years);
    Ok(InputBatch { years, records })
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Reads a CSV or JSON file, choosing the parser from the extension.
pub fn read_input(path: impl AsRef<Path>) -> InputResult<InputBatch> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "csv" => read_csv(path),
        "json" => read_json(path),
        _ => Err(InputError::UnsupportedFormat(path.display().to_string())),
    }
}

fn open(path: &Path) -> InputResult<File> {
    if !path.exists() {
        return Err(InputError::NotFound {
            path: path.display().to_string(),
        });
    }
    Ok(File::open(path)?)
}
