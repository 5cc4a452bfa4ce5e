//! Validation findings and their aggregation.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Offending value recorded for a null cell.
pub const NULL_VALUE: &str = "NULL";

/// Offending value recorded for a blank cell under `Required`.
pub const EMPTY_VALUE: &str = "EMPTY";

/// One validation finding: a row, the offending value, the rule and why.
///
/// Row numbers are 1-based. Formula-level findings not tied to a row
/// (`ColumnNotFound`, `InvalidFormula`, `InvalidOperand`) use row 0.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorLocation {
    /// 1-based data row number.
    pub row: usize,
    /// Offending value: `NULL`, `EMPTY`, or the cell text.
    pub value: String,
    /// Rule (or formula tag) that failed.
    pub rule_failed: String,
    /// Human-readable reason.
    pub reason: String,
}

impl ErrorLocation {
    /// Create a finding.
    pub fn new(
        row: usize,
        value: impl Into<String>,
        rule_failed: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            row,
            value: value.into(),
            rule_failed: rule_failed.into(),
            reason: reason.into(),
        }
    }

    /// Whether the finding is about the formula itself rather than a row.
    pub fn is_formula_level(&self) -> bool {
        self.row == 0
    }
}

/// Outcome of one rule over one column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    error_count: usize,
    locations: Vec<ErrorLocation>,
}

impl ValidationResult {
    /// Number of findings.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Findings in row order of discovery.
    pub fn locations(&self) -> &[ErrorLocation] {
        &self.locations
    }

    /// Whether the rule passed on every row.
    pub fn is_valid(&self) -> bool {
        self.locations.is_empty()
    }

    /// Consume the result, keeping the findings.
    pub fn into_locations(self) -> Vec<ErrorLocation> {
        self.locations
    }
}

impl From<Vec<ErrorLocation>> for ValidationResult {
    fn from(locations: Vec<ErrorLocation>) -> Self {
        Self {
            error_count: locations.len(),
            locations,
        }
    }
}

/// Findings of a whole-frame run, grouped by column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Column name to findings. Only columns with findings appear.
    pub errors: IndexMap<String, Vec<ErrorLocation>>,
    /// Number of (column, rule) pairs evaluated.
    pub rules_checked: usize,
    /// Number of data rows in the frame.
    pub row_count: usize,
}

impl ValidationReport {
    /// Create an empty report for a frame of `row_count` rows.
    pub fn new(row_count: usize) -> Self {
        Self {
            row_count,
            ..Self::default()
        }
    }

    /// Record one rule's findings for a column.
    pub fn record(&mut self, column: &str, result: ValidationResult) {
        self.rules_checked += 1;
        if result.is_valid() {
            return;
        }
        self.errors
            .entry(column.to_string())
            .or_default()
            .extend(result.into_locations());
    }

    /// Total findings across all columns.
    pub fn total_errors(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }

    /// Whether no rule produced a finding.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Findings for one column.
    pub fn column_errors(&self, column: &str) -> &[ErrorLocation] {
        self.errors.get(column).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Finding counts per rule, in first-seen order.
    pub fn counts_by_rule(&self) -> IndexMap<&str, usize> {
        let mut counts = IndexMap::new();
        for location in self.errors.values().flatten() {
            *counts.entry(location.rule_failed.as_str()).or_insert(0) += 1;
        }
        counts
    }
}
