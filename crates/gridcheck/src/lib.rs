//! Gridcheck: rule-based validation for spreadsheets and delimited text.
//!
//! Gridcheck loads a workbook or delimited file, locates each sheet's header
//! row, infers a type per column and checks every cell against named rules.
//! Findings are reported per cell with 1-based row numbers so they can drive
//! an interactive correction loop.
//!
//! # Rules
//!
//! - **Built-in**: `Required`, `Int`, `Float`, `Text`, `Email`, `Boolean`,
//!   `Alphanumeric`, `Date` and `Date(<format>)`
//! - **Composite**: base rules combined with `AND`/`OR`
//! - **Formula**: arithmetic (`'total' = 'a' + 'b'`) or comparison (`'score' >= 50`)
//!
//! # Example
//!
//! ```no_run
//! use gridcheck::Gridcheck;
//!
//! let gridcheck = Gridcheck::new();
//! let report = gridcheck.check_file("people.csv", None, None).unwrap();
//!
//! for sheet in &report.sheets {
//!     println!("{}: {} errors", sheet.sheet, sheet.report.total_errors());
//! }
//! ```

pub mod catalog;
pub mod error;
pub mod formula;
pub mod inference;
pub mod input;
pub mod rules;
pub mod schema;
pub mod transform;
pub mod validation;

mod gridcheck;

pub use crate::gridcheck::{FileReport, Gridcheck, GridcheckConfig, SheetReport};
pub use catalog::{InMemoryCatalog, RuleCatalog, RuleDescriptor};
pub use error::{GridcheckError, Result};
pub use inference::ColumnRules;
pub use input::{Cell, Sheet, SourceMetadata, TypedFrame, Workbook};
pub use schema::{ColumnProfile, TypeTag};
pub use validation::{ErrorLocation, ValidationEngine, ValidationReport, ValidationResult};
