//! Date display formats and parsing.

use chrono::NaiveDate;

/// Display-format tokens accepted in `Date(<token>)` rules, with their parse formats.
pub const DATE_FORMAT_TABLE: &[(&str, &str)] = &[
    ("MM-DD-YYYY", "%m-%d-%Y"),
    ("DD-MM-YYYY", "%d-%m-%Y"),
    ("MM/DD/YYYY", "%m/%d/%Y"),
    ("DD/MM/YYYY", "%d/%m/%Y"),
    ("MM-YYYY", "%m-%Y"),
    ("MM-YY", "%m-%y"),
    ("MM/YYYY", "%m/%Y"),
    ("MM/YY", "%m/%y"),
];

/// Extra tokens understood by date transformation.
pub const TRANSFORM_ONLY_FORMATS: &[(&str, &str)] =
    &[("YYYY-MM-DD", "%Y-%m-%d"), ("YYYY/MM/DD", "%Y/%m/%d")];

/// Parse format used when a `Date(<token>)` token is not in the table.
pub const FALLBACK_PARSE_FORMAT: &str = "%d-%m-%Y";

/// Formats a plain `Date` rule accepts when none are configured, in probing order.
pub const DEFAULT_ACCEPTED_DATE_FORMATS: &[&str] = &[
    "%d-%m-%Y", "%m-%d-%Y", "%m/%d/%Y", "%d/%m/%Y", "%m-%Y", "%m-%y", "%m/%Y", "%m/%y",
];

/// Look up the parse format of a validation display token.
pub fn parse_format_for(token: &str) -> Option<&'static str> {
    lookup(DATE_FORMAT_TABLE, token)
}

/// Look up the parse format of a transformation display token.
pub fn transform_format_for(token: &str) -> Option<&'static str> {
    lookup(DATE_FORMAT_TABLE, token).or_else(|| lookup(TRANSFORM_ONLY_FORMATS, token))
}

fn lookup(table: &[(&str, &'static str)], token: &str) -> Option<&'static str> {
    let token = token.trim();
    table
        .iter()
        .find(|(display, _)| *display == token)
        .map(|(_, parse)| *parse)
}

/// Parse a date with a strftime-style format.
///
/// Formats without a day field (`%m-%Y`) resolve to the first of the month.
pub fn parse_date(value: &str, format: &str) -> Option<NaiveDate> {
    if format.contains("%d") || format.contains("%e") || format.contains("%j") {
        NaiveDate::parse_from_str(value, format).ok()
    } else {
        NaiveDate::parse_from_str(&format!("01 {}", value), &format!("%d {}", format)).ok()
    }
}

/// Check whether a value parses under any of the formats.
pub fn matches_any<S: AsRef<str>>(value: &str, formats: &[S]) -> bool {
    formats.iter().any(|f| parse_date(value, f.as_ref()).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_lookup() {
        assert_eq!(parse_format_for("DD-MM-YYYY"), Some("%d-%m-%Y"));
        assert_eq!(parse_format_for("MM/YY"), Some("%m/%y"));
        assert_eq!(parse_format_for("YYYY-MM-DD"), None);
        assert_eq!(transform_format_for("YYYY-MM-DD"), Some("%Y-%m-%d"));
        assert_eq!(transform_format_for("nonsense"), None);
    }

    #[test]
    fn test_parse_full_dates() {
        assert_eq!(
            parse_date("31-12-2023", "%d-%m-%Y"),
            NaiveDate::from_ymd_opt(2023, 12, 31)
        );
        assert!(parse_date("12-31-2023", "%d-%m-%Y").is_none());
        assert!(parse_date("31/12/2023", "%d-%m-%Y").is_none());
    }

    #[test]
    fn test_parse_month_year() {
        assert_eq!(parse_date("03-2024", "%m-%Y"), NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(parse_date("03/24", "%m/%y"), NaiveDate::from_ymd_opt(2024, 3, 1));
        assert!(parse_date("13-2024", "%m-%Y").is_none());
    }

    #[test]
    fn test_matches_any() {
        assert!(matches_any("12/31/2023", DEFAULT_ACCEPTED_DATE_FORMATS));
        assert!(matches_any("05-2024", DEFAULT_ACCEPTED_DATE_FORMATS));
        assert!(!matches_any("2023.12.31", DEFAULT_ACCEPTED_DATE_FORMATS));
    }
}
