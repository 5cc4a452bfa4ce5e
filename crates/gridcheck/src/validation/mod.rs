//! Validation engine for checking cells against named rules.
//!
//! The engine resolves each rule name through a [`RuleCatalog`](crate::catalog::RuleCatalog),
//! evaluates it over a column and returns row-level [`ErrorLocation`]s.

mod engine;
mod location;

pub use engine::{EngineSettings, RowError, RowValidation, ValidationEngine};
pub use location::{EMPTY_VALUE, ErrorLocation, NULL_VALUE, ValidationReport, ValidationResult};
