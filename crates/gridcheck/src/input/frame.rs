//! Header-applied view of a sheet.

use tracing::debug;

use super::source::{Cell, Sheet};
use crate::error::{GridcheckError, Result};

/// A sheet sliced below its header row, with labeled columns.
///
/// Rows are 0-indexed here; every reported location is 1-indexed.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedFrame {
    /// Column labels, in column order.
    pub headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl TypedFrame {
    /// Create a frame from labels and rows, padding or truncating rows to the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Null);
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Build a frame from a text-only grid, treating empty strings as null.
    pub fn from_strings<S: AsRef<str>>(headers: &[S], rows: &[Vec<S>]) -> Self {
        let headers = headers.iter().map(|h| h.as_ref().to_string()).collect();
        let rows = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|v| match v.as_ref() {
                        "" => Cell::Null,
                        s => Cell::from(s),
                    })
                    .collect()
            })
            .collect();
        Self::new(headers, rows)
    }

    /// Apply `header_row` of `sheet` as labels and keep the rows below it.
    ///
    /// Labels are stringified and trimmed; a blank label becomes
    /// `column_<n>` (1-based). Fails when every label is blank.
    pub fn from_sheet(sheet: &Sheet, header_row: usize) -> Result<Self> {
        let header = sheet
            .row(header_row)
            .ok_or_else(|| GridcheckError::NoHeaderDetected(sheet.name.clone()))?;

        if header.iter().all(Cell::is_blank) {
            return Err(GridcheckError::NoValidHeaders(sheet.name.clone()));
        }

        let headers: Vec<String> = header
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let label = cell.to_text().trim().to_string();
                if label.is_empty() {
                    format!("column_{}", i + 1)
                } else {
                    label
                }
            })
            .collect();

        let rows: Vec<Vec<Cell>> = sheet
            .rows()
            .skip(header_row + 1)
            .map(<[Cell]>::to_vec)
            .collect();

        debug!(
            sheet = %sheet.name,
            header_row,
            columns = headers.len(),
            rows = rows.len(),
            "Frame built"
        );

        Ok(Self::new(headers, rows))
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Position of a column by exact label.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Position of a column, comparing trimmed labels case-insensitively.
    ///
    /// An exact match takes precedence.
    pub fn find_column(&self, name: &str) -> Option<usize> {
        if let Some(index) = self.column_index(name) {
            return Some(index);
        }
        let wanted = name.trim().to_lowercase();
        self.headers
            .iter()
            .position(|h| h.trim().to_lowercase() == wanted)
    }

    /// Cells of one column, top to bottom.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &Cell> {
        self.rows.iter().map(move |row| &row[index])
    }

    /// Non-null values of a column rendered as text.
    pub fn non_null_text(&self, index: usize) -> Vec<String> {
        self.column(index)
            .filter(|c| !c.is_null())
            .map(Cell::to_text)
            .collect()
    }

    /// Get a row by index.
    pub fn row(&self, index: usize) -> Option<&[Cell]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Iterate over all rows.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Get a specific cell.
    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Replace a cell, returning the previous value.
    pub fn set(&mut self, row: usize, col: usize, value: Cell) -> Option<Cell> {
        let slot = self.rows.get_mut(row)?.get_mut(col)?;
        Some(std::mem::replace(slot, value))
    }

    /// A one-row frame with the same headers, used to re-check an edited row.
    pub fn single_row(headers: Vec<String>, values: Vec<Cell>) -> Self {
        Self::new(headers, vec![values])
    }
}
