//! Applying user corrections to a frame.

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::input::{Cell, TypedFrame};

/// Corrections keyed by column, then by 0-based row index as text.
pub type Corrections = IndexMap<String, IndexMap<String, String>>;

/// Write corrected values into the frame, returning the number of cells changed.
///
/// Unknown columns and row indexes that do not parse or fall outside the frame
/// are skipped with a warning. An empty value clears the cell to null.
pub fn apply_corrections(frame: &mut TypedFrame, corrections: &Corrections) -> usize {
    let mut applied = 0;

    for (column, edits) in corrections {
        let Some(col) = frame.column_index(column) else {
            warn!(column = %column, "Skipping corrections for unknown column");
            continue;
        };

        for (row_key, value) in edits {
            let Ok(row) = row_key.trim().parse::<usize>() else {
                warn!(column = %column, row = %row_key, "Skipping correction with invalid row index");
                continue;
            };

            let cell = if value.is_empty() {
                Cell::Null
            } else {
                Cell::from(value.as_str())
            };

            match frame.set(row, col, cell) {
                Some(previous) => {
                    debug!(column = %column, row, from = %previous, to = %value, "Applied correction");
                    applied += 1;
                }
                None => {
                    warn!(column = %column, row, rows = frame.row_count(), "Skipping correction outside the frame");
                }
            }
        }
    }

    applied
}
