//! # Valor Input
//!
//! Input acquisition for the Valor DCF valuation library.
//!
//! Raw entity records may be incomplete. This crate reads them, detects the
//! projection length, reports missing fields, optionally fills them through a
//! [`FieldSuggester`], and converts complete records into
//! [`ValuationInput`](valor_core::ValuationInput).
//!
//! ## Example
//!
//! ```rust
//! use valor_input::prelude::*;
//!
//! let csv = "Company Name,WACC,TGR,NOIAT_1\nAcme,12,3,100\n";
//! let batch = read_csv_from(csv.as_bytes())?;
//! assert_eq!(batch.years, 1);
//!
//! let missing = batch.records[0].missing_fields(batch.years);
//! assert_eq!(missing[0], FieldKey::OpeningCash);
//! # Ok::<(), valor_input::InputError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod error;
pub mod field;
pub mod reader;
pub mod record;
pub mod suggest;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{InputError, InputResult};
    pub use crate::field::{detect_years, template_header, FieldKey};
    pub use crate::reader::{
        read_csv, read_csv_from, read_input, read_json, read_json_from, InputBatch,
    };
    pub use crate::record::{missing_fields, InputRecord};
    pub use crate::suggest::{Acquisition, FieldSuggester, StaticSuggester};
}

pub use error::{InputError, InputResult};
pub use field::{detect_years, template_header, FieldKey};
pub use reader::{read_csv, read_input, read_json, InputBatch};
pub use record::{missing_fields, InputRecord};
pub use suggest::{Acquisition, FieldSuggester, StaticSuggester};
