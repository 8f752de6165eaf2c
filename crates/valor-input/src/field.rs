//! Input field keys and their column names.
//!
//! Scalar fields carry fixed column names (`WACC`, `Opening Cash`, ...);
//! per-year fields are suffixed with a 1-based year index (`NOIAT_3`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Column holding the entity name.
pub const COMPANY_NAME_COLUMN: &str = "Company Name";

/// Column holding the optional client name.
pub const CLIENT_NAME_COLUMN: &str = "Client Name";

/// Prefix of the per-year NOIAT columns used to detect the projection length.
const NOIAT_PREFIX: &str = "NOIAT_";

/// Identifies one input field of a valuation record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldKey {
    /// Discount rate in percent (`WACC`).
    Wacc,
    /// Terminal growth rate in percent (`TGR`).
    TerminalGrowth,
    /// Cash at the valuation date (`Opening Cash`).
    OpeningCash,
    /// Other non-operating assets (`Other Non-Op Assets`).
    OtherNonOperatingAssets,
    /// Debt (`Debt`).
    Debt,
    /// Discount for lack of marketability in percent (`DLOM`).
    Dlom,
    /// Post-money capital injection (`Money Infusion`).
    MoneyInfusion,
    /// Length of the first projection period in years (`First_Period_Fraction`).
    FirstPeriodFraction,
    /// Net operating income after tax for year `i` (`NOIAT_i`).
    Noiat(usize),
    /// Depreciation for year `i` (`Depreciation_i`).
    Depreciation(usize),
    /// Capital expenditure for year `i` (`CapEx_i`).
    Capex(usize),
    /// Incremental net working capital for year `i` (`Inc_NWC_i`).
    IncrementalNwc(usize),
}

impl FieldKey {
    /// Scalar fields in the order they are checked and reported.
    pub const SCALARS: [FieldKey; 8] = [
        FieldKey::Wacc,
        FieldKey::TerminalGrowth,
        FieldKey::OpeningCash,
        FieldKey::OtherNonOperatingAssets,
        FieldKey::Debt,
        FieldKey::Dlom,
        FieldKey::MoneyInfusion,
        FieldKey::FirstPeriodFraction,
    ];

    /// The four fields of projection year `year`, in reporting order.
    #[must_use]
    pub fn per_year(year: usize) -> [FieldKey; 4] {
        [
            FieldKey::Noiat(year),
            FieldKey::Depreciation(year),
            FieldKey::Capex(year),
            FieldKey::IncrementalNwc(year),
        ]
    }

    /// Every field required for `years` projection years: scalars first,
    /// then each year's fields in year order.
    #[must_use]
    pub fn required(years: usize) -> Vec<FieldKey> {
        Self::SCALARS
            .into_iter()
            .chain((1..=years).flat_map(Self::per_year))
            .collect()
    }

    /// Column name of this field.
    #[must_use]
    pub fn column_name(&self) -> String {
        match self {
            Self::Wacc => "WACC".to_string(),
            Self::TerminalGrowth => "TGR".to_string(),
            Self::OpeningCash => "Opening Cash".to_string(),
            Self::OtherNonOperatingAssets => "Other Non-Op Assets".to_string(),
            Self::Debt => "Debt".to_string(),
            Self::Dlom => "DLOM".to_string(),
            Self::MoneyInfusion => "Money Infusion".to_string(),
            Self::FirstPeriodFraction => "First_Period_Fraction".to_string(),
            Self::Noiat(i) => format!("{NOIAT_PREFIX}{i}"),
            Self::Depreciation(i) => format!("Depreciation_{i}"),
            Self::Capex(i) => format!("CapEx_{i}"),
            Self::IncrementalNwc(i) => format!("Inc_NWC_{i}"),
        }
    }

    /// Projection year of a per-year field.
    #[must_use]
    pub fn year(&self) -> Option<usize> {
        match self {
            Self::Noiat(i) | Self::Depreciation(i) | Self::Capex(i) | Self::IncrementalNwc(i) => {
                Some(*i)
            }
            _ => None,
        }
    }

    /// Returns true for fields entered in percent.
    #[must_use]
    pub fn is_percent(&self) -> bool {
        matches!(self, Self::Wacc | Self::TerminalGrowth | Self::Dlom)
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.column_name())
    }
}

/// Column name that is not a valuation field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownField(pub String);

impl fmt::Display for UnknownField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown field '{}'", self.0)
    }
}

impl std::error::Error for UnknownField {}

impl FromStr for FieldKey {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        let scalar = match name {
            "WACC" => Some(Self::Wacc),
            "TGR" => Some(Self::TerminalGrowth),
            "Opening Cash" => Some(Self::OpeningCash),
            "Other Non-Op Assets" => Some(Self::OtherNonOperatingAssets),
            "Debt" => Some(Self::Debt),
            "DLOM" => Some(Self::Dlom),
            "Money Infusion" => Some(Self::MoneyInfusion),
            "First_Period_Fraction" => Some(Self::FirstPeriodFraction),
            _ => None,
        };
        if let Some(key) = scalar {
            return Ok(key);
        }

        let (prefix, index) = name
            .rsplit_once('_')
            .ok_or_else(|| UnknownField(name.to_string()))?;
        let year = index
            .parse::<usize>()
            .ok()
            .filter(|i| *i >= 1)
            .ok_or_else(|| UnknownField(name.to_string()))?;
        match prefix {
            "NOIAT" => Ok(Self::Noiat(year)),
            "Depreciation" => Ok(Self::Depreciation(year)),
            "CapEx" => Ok(Self::Capex(year)),
            "Inc_NWC" => Ok(Self::IncrementalNwc(year)),
            _ => Err(UnknownField(name.to_string())),
        }
    }
}

impl TryFrom<String> for FieldKey {
    type Error = UnknownField;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FieldKey> for String {
    fn from(key: FieldKey) -> Self {
        key.column_name()
    }
}

/// Number of projection years implied by a set of column headers: the
/// highest index among `NOIAT_i` columns, or 0 when there are none.
pub fn detect_years<I, S>(headers: I) -> usize
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    headers
        .into_iter()
        .filter_map(|h| match h.as_ref().parse::<FieldKey>() {
            Ok(FieldKey::Noiat(i)) => Some(i),
            _ => None,
        })
        .max()
        .unwrap_or(0)
}

/// Header row listing every column needed for `years` projection years.
#[must_use]
pub fn template_header(years: usize) -> Vec<String> {
    [COMPANY_NAME_COLUMN.to_string(), CLIENT_NAME_COLUMN.to_string()]
        .into_iter()
        .chain(FieldKey::required(years).iter().map(FieldKey::column_name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_names_round_trip() {
        for key in FieldKey::required(3) {
            assert_eq!(key.column_name().parse::<FieldKey>(), Ok(key));
        }
    }

    #[test]
    fn test_required_order() {
        let names: Vec<String> = FieldKey::required(2).iter().map(FieldKey::column_name).collect();
        assert_eq!(names.len(), 16);
        assert_eq!(names[0], "WACC");
        assert_eq!(names[7], "First_Period_Fraction");
        assert_eq!(
            &names[8..12],
            &["NOIAT_1", "Depreciation_1", "CapEx_1", "Inc_NWC_1"]
        );
        assert_eq!(names[12], "NOIAT_2");
    }

    #[test]
    fn test_unknown_columns() {
        assert!("Company Name".parse::<FieldKey>().is_err());
        assert!("NOIAT_0".parse::<FieldKey>().is_err());
        assert!("NOIAT_x".parse::<FieldKey>().is_err());
        assert!("Revenue_1".parse::<FieldKey>().is_err());
        assert_eq!(" Debt ".parse::<FieldKey>(), Ok(FieldKey::Debt));
    }

    #[test]
    fn test_detect_years() {
        assert_eq!(detect_years(["WACC", "NOIAT_1", "NOIAT_3", "CapEx_7"]), 3);
        assert_eq!(detect_years(["WACC", "Debt"]), 0);
        assert_eq!(detect_years(Vec::<String>::new()), 0);
        assert_eq!(detect_years(["NOIAT_2", "NOIAT_abc"]), 2);
    }

    #[test]
    fn test_template_header() {
        let header = template_header(1);
        assert_eq!(header[0], "Company Name");
        assert_eq!(header[1], "Client Name");
        assert_eq!(header.len(), 2 + 8 + 4);
        assert_eq!(header.last().map(String::as_str), Some("Inc_NWC_1"));
    }

    #[test]
    fn test_percent_fields() {
        assert!(FieldKey::Wacc.is_percent());
        assert!(FieldKey::Dlom.is_percent());
        assert!(!FieldKey::Debt.is_percent());
        assert_eq!(FieldKey::Capex(4).year(), Some(4));
        assert_eq!(FieldKey::Debt.year(), None);
    }
}
