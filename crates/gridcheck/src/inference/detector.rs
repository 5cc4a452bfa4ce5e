//! Column type detection by successive pattern tests.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::schema::TypeTag;

// =============================================================================
// LAZY STATIC PATTERNS
// =============================================================================
// Shared with the validation engine, which checks cells against the same shapes.

pub(crate) static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w.+-]+@[\w-]+\.[\w.-]+$").unwrap());

/// ASCII-only address shape used when validating cells against the `Email` rule.
pub(crate) static EMAIL_VALIDATION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9.-]+$").unwrap());

pub(crate) static INT_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?\d+$").unwrap());

pub(crate) static FLOAT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\d+(\.\d+)?$").unwrap());

pub(crate) static ALPHANUMERIC_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9]+$").unwrap());

pub(crate) static BOOLEAN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(true|false|0|1)$").unwrap());

/// Date formats a column is tried against, in order.
const DETECTION_DATE_FORMATS: &[&str] = &["%d-%m-%Y", "%Y-%m-%d"];

/// Classify a column from its non-null values rendered as text.
///
/// Tests run in priority order and every value must pass for a test to win:
/// Email, Date, Boolean, Int, Float, Alphanumeric, then Text. An empty column
/// is Text.
pub fn detect_type<S: AsRef<str>>(values: &[S]) -> TypeTag {
    if values.is_empty() {
        return TypeTag::Text;
    }

    let all = |pattern: &Regex| values.iter().all(|v| pattern.is_match(v.as_ref()));

    if all(&EMAIL_PATTERN) {
        return TypeTag::Email;
    }

    let is_date_column = DETECTION_DATE_FORMATS.iter().any(|format| {
        values
            .iter()
            .all(|v| NaiveDate::parse_from_str(v.as_ref(), format).is_ok())
    });
    if is_date_column {
        return TypeTag::Date;
    }

    if all(&BOOLEAN_PATTERN) {
        return TypeTag::Boolean;
    }

    if all(&INT_PATTERN) {
        return TypeTag::Int;
    }

    if all(&FLOAT_PATTERN) {
        return TypeTag::Float;
    }

    if all(&ALPHANUMERIC_PATTERN) {
        return TypeTag::Alphanumeric;
    }

    TypeTag::Text
}
