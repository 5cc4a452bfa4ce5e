//! Column type inference and default rule assignment.

mod defaults;
mod detector;

pub use defaults::{
    ColumnRules, EXEMPT_PREFIXES, REQUIRED_RULE, assign_default_rules, default_rules_for,
    is_exempt_column, profile_columns,
};
pub use detector::detect_type;

pub(crate) use detector::{ALPHANUMERIC_PATTERN, BOOLEAN_PATTERN, EMAIL_VALIDATION_PATTERN};
