//! Header row detection.

use tracing::{debug, warn};

use super::source::Sheet;

/// Rows scanned when no limit is configured.
pub const DEFAULT_MAX_SCAN_ROWS: usize = 10;

/// Find the row that looks like a header.
///
/// Scans the first `max_scan_rows` rows and returns the first one whose
/// non-null cells are all text, with at least one such cell. Falls back to
/// row 0 for a non-empty sheet, and returns `None` when the sheet has no
/// usable header at all.
///
/// This is a heuristic: a data row made only of text cells (every row of a
/// delimited-text input) is indistinguishable from a header.
pub fn find_header_row(sheet: &Sheet, max_scan_rows: usize) -> Option<usize> {
    for (index, row) in sheet.rows().take(max_scan_rows).enumerate() {
        let mut present = row.iter().filter(|c| !c.is_null()).peekable();
        if present.peek().is_none() {
            continue;
        }
        if present.all(|c| c.is_text()) {
            debug!(sheet = %sheet.name, row = index, "Header row detected");
            return Some(index);
        }
    }

    if !sheet.is_empty() {
        warn!(sheet = %sheet.name, "No header-like row found, using row 0");
        Some(0)
    } else {
        None
    }
}
