//! CLI command implementations.

pub mod formula;
pub mod inspect;
pub mod validate;

use gridcheck::{ErrorLocation, GridcheckError, Result, Sheet, Workbook};

/// Command result: the process exit code on success.
pub type CommandResult = std::result::Result<i32, Box<dyn std::error::Error>>;

/// Pick the named sheet, or every non-empty sheet.
pub(crate) fn select_sheets<'a>(workbook: &'a Workbook, name: Option<&str>) -> Result<Vec<&'a Sheet>> {
    match name {
        Some(name) => workbook
            .get(name)
            .map(|s| vec![s])
            .ok_or_else(|| GridcheckError::SheetNotFound(name.to_string())),
        None => Ok(workbook.values().filter(|s| !s.is_empty()).collect()),
    }
}

/// One line per finding, indented under its column.
pub(crate) fn format_location(location: &ErrorLocation) -> String {
    if location.is_formula_level() {
        format!("{}: {}", location.rule_failed, location.reason)
    } else {
        format!(
            "row {:>4}  {:<20} {} ({})",
            location.row, location.value, location.reason, location.rule_failed
        )
    }
}
