//! Default rule assignment and column profiling.

use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use super::detector::detect_type;
use crate::error::{GridcheckError, Result};
use crate::input::TypedFrame;
use crate::schema::{ColumnProfile, SAMPLE_SIZE, TypeTag};

/// Column name to ordered rule names.
pub type ColumnRules = IndexMap<String, Vec<String>>;

/// Name of the rule every column receives first.
pub const REQUIRED_RULE: &str = "Required";

/// Column-name prefixes (lowercase) marking free-text identity fields.
pub const EXEMPT_PREFIXES: &[&str] = &["name", "address", "phone", "username", "status", "period"];

/// Check whether a column name starts with one of the exemption prefixes.
pub fn is_exempt_column(name: &str) -> bool {
    let lower = name.to_lowercase();
    EXEMPT_PREFIXES.iter().any(|p| lower.starts_with(p))
}

/// The default rules for one column given its detected type.
///
/// `Required` always comes first. The detected type follows unless the column
/// is Text-typed and exempt, in which case `Text` is assigned. Both branches
/// produce the same name for a Text column.
pub fn default_rules_for(name: &str, detected: TypeTag) -> Vec<String> {
    let second = if detected != TypeTag::Text || !is_exempt_column(name) {
        detected.as_str()
    } else {
        TypeTag::Text.as_str()
    };
    vec![REQUIRED_RULE.to_string(), second.to_string()]
}

/// Produce the default rule set for each named column of a frame.
///
/// Fails when a name is not a column of the frame.
pub fn assign_default_rules<S: AsRef<str>>(frame: &TypedFrame, columns: &[S]) -> Result<ColumnRules> {
    let mut assignments = ColumnRules::new();

    for column in columns {
        let name = column.as_ref();
        let index = frame
            .column_index(name)
            .ok_or_else(|| GridcheckError::ColumnNotFound(name.to_string()))?;

        let detected = detect_type(&frame.non_null_text(index));
        let rules = default_rules_for(name, detected);
        debug!(column = name, detected = %detected, ?rules, "Default rules assigned");

        assignments.insert(name.to_string(), rules);
    }

    Ok(assignments)
}

/// Profile every column of a frame: detected type, null counts, samples and default rules.
pub fn profile_columns(frame: &TypedFrame) -> Vec<ColumnProfile> {
    frame
        .headers
        .iter()
        .enumerate()
        .map(|(position, name)| {
            let values = frame.non_null_text(position);
            let detected = detect_type(&values);

            let mut samples = IndexSet::new();
            for value in &values {
                if samples.len() >= SAMPLE_SIZE {
                    break;
                }
                samples.insert(value.clone());
            }

            let mut profile = ColumnProfile::new(name.clone(), position);
            profile.detected_type = detected;
            profile.non_null_count = values.len();
            profile.null_count = frame.row_count() - values.len();
            profile.sample_values = samples.into_iter().collect();
            profile.default_rules = default_rules_for(name, detected);
            profile
        })
        .collect()
}
