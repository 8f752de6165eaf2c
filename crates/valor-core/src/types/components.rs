//! Per-year cash flow components.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ValorError, ValorResult};

/// Cash flow components for a single projection year.
///
/// Capital expenditure and the increase in net working capital are cash
/// outflows and are entered as positive amounts.
///
/// # Example
///
/// ```rust
/// use valor_core::types::YearComponents;
/// use rust_decimal_macros::dec;
///
/// let year = YearComponents::new(dec!(100), dec!(10), dec!(20), dec!(5));
/// assert_eq!(year.free_cash_flow()?, dec!(85));
/// # Ok::<(), valor_core::ValorError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearComponents {
    /// Net operating income after tax.
    pub noiat: Decimal,
    /// Depreciation and amortisation added back.
    pub depreciation: Decimal,
    /// Capital expenditure.
    pub capex: Decimal,
    /// Incremental net working capital.
    pub incremental_nwc: Decimal,
}

impl YearComponents {
    /// Creates the components for one year.
    #[must_use]
    pub fn new(
        noiat: Decimal,
        depreciation: Decimal,
        capex: Decimal,
        incremental_nwc: Decimal,
    ) -> Self {
        Self {
            noiat,
            depreciation,
            capex,
            incremental_nwc,
        }
    }

    /// Free cash flow to firm: NOIAT + depreciation - capex - incremental NWC.
    ///
    /// # Errors
    ///
    /// Returns `ValorError::Math` if the result overflows.
    pub fn free_cash_flow(&self) -> ValorResult<Decimal> {
        self.noiat
            .checked_add(self.depreciation)
            .and_then(|v| v.checked_sub(self.capex))
            .and_then(|v| v.checked_sub(self.incremental_nwc))
            .ok_or_else(|| ValorError::math_error("free cash flow overflow"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_free_cash_flow() {
        let year = YearComponents::new(dec!(120), dec!(10), dec!(15), dec!(5));
        assert_eq!(year.free_cash_flow().unwrap(), dec!(110));
    }

    #[test]
    fn test_negative_free_cash_flow() {
        let year = YearComponents::new(dec!(10), dec!(0), dec!(50), dec!(5));
        assert_eq!(year.free_cash_flow().unwrap(), dec!(-45));
    }

    #[test]
    fn test_free_cash_flow_overflow_is_an_error() {
        let huge = Decimal::from_scientific("5e28").unwrap();
        let year = YearComponents::new(huge, huge, dec!(0), dec!(0));
        assert!(matches!(year.free_cash_flow(), Err(ValorError::Math { .. })));

        let year = YearComponents::new(-huge, dec!(0), huge, dec!(0));
        assert!(matches!(year.free_cash_flow(), Err(ValorError::Math { .. })));
    }
}
