//! Per-column profile produced by inference.

use serde::{Deserialize, Serialize};

use super::types::TypeTag;

/// How many distinct sample values a profile keeps.
pub const SAMPLE_SIZE: usize = 5;

/// What inference learned about one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    /// Column name.
    pub name: String,
    /// Zero-based position in the frame.
    pub position: usize,
    /// Detected type of the non-null values.
    pub detected_type: TypeTag,
    /// Number of null cells.
    pub null_count: usize,
    /// Number of non-null cells.
    pub non_null_count: usize,
    /// First few distinct values, for display.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sample_values: Vec<String>,
    /// Rules assigned by default, in order.
    #[serde(default)]
    pub default_rules: Vec<String>,
}

impl ColumnProfile {
    /// Create an empty profile for a column.
    pub fn new(name: impl Into<String>, position: usize) -> Self {
        Self {
            name: name.into(),
            position,
            detected_type: TypeTag::Text,
            null_count: 0,
            non_null_count: 0,
            sample_values: Vec::new(),
            default_rules: Vec::new(),
        }
    }

    /// Get the null percentage.
    pub fn null_percentage(&self) -> f64 {
        let count = self.null_count + self.non_null_count;
        if count == 0 {
            0.0
        } else {
            (self.null_count as f64 / count as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_percentage() {
        let mut profile = ColumnProfile::new("age", 1);
        assert_eq!(profile.null_percentage(), 0.0);

        profile.null_count = 1;
        profile.non_null_count = 3;
        assert!((profile.null_percentage() - 25.0).abs() < 1e-9);
    }
}
