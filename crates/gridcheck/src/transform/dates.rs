//! Converting date values between display formats.

use tracing::{debug, warn};

use crate::error::{GridcheckError, Result};
use crate::input::{Cell, TypedFrame};
use crate::rules::{parse_date, transform_format_for};

/// Convert a date between display formats such as `DD-MM-YYYY` and `YYYY/MM/DD`.
///
/// Values that do not parse under `source`, and unknown format tokens, come
/// back unchanged.
pub fn transform_date(value: &str, source: &str, target: &str) -> String {
    let (Some(from), Some(to)) = (transform_format_for(source), transform_format_for(target)) else {
        warn!(source, target, "Unknown date format, leaving value unchanged");
        return value.to_string();
    };

    match parse_date(value.trim(), from) {
        Some(date) => date.format(to).to_string(),
        None => value.to_string(),
    }
}

/// Convert every non-null cell of a column, returning the number of cells changed.
pub fn transform_column_dates(
    frame: &mut TypedFrame,
    column: &str,
    source: &str,
    target: &str,
) -> Result<usize> {
    let col = frame
        .find_column(column)
        .ok_or_else(|| GridcheckError::ColumnNotFound(column.to_string()))?;

    let mut changed = 0;
    for row in 0..frame.row_count() {
        let Some(cell) = frame.get(row, col).filter(|c| !c.is_null()) else {
            continue;
        };

        let text = cell.to_text();
        let converted = transform_date(&text, source, target);
        if converted != text {
            frame.set(row, col, Cell::Text(converted));
            changed += 1;
        }
    }

    debug!(column, source, target, changed, "Transformed column dates");
    Ok(changed)
}
