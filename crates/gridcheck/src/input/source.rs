//! Raw cell values, sheets and source metadata.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, NaiveDateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single raw cell as read from a file, before any rule is applied.
///
/// Workbook inputs keep their native cell types; delimited text only ever
/// produces [`Cell::Text`] and [`Cell::Null`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// Missing value (empty field, blank spreadsheet cell).
    Null,
    /// Boolean spreadsheet cell.
    Bool(bool),
    /// Whole-number spreadsheet cell.
    Int(i64),
    /// Fractional spreadsheet cell.
    Float(f64),
    /// Text value.
    Text(String),
    /// Date/time spreadsheet cell.
    DateTime(NaiveDateTime),
}

impl Cell {
    /// Check whether the cell is missing.
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Check whether the cell holds text.
    pub fn is_text(&self) -> bool {
        matches!(self, Cell::Text(_))
    }

    /// Render the cell as text. Null renders as the empty string.
    ///
    /// Floats keep a fractional part (`25.0`) and booleans render as
    /// `True`/`False`, which is how users see them in the correction grid.
    pub fn to_text(&self) -> String {
        match self {
            Cell::Null => String::new(),
            Cell::Bool(true) => "True".to_string(),
            Cell::Bool(false) => "False".to_string(),
            Cell::Int(n) => n.to_string(),
            Cell::Float(f) => format!("{:?}", f),
            Cell::Text(s) => s.clone(),
            Cell::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    /// Check whether the cell is null or renders to blank text.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Null => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::Null
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => write!(f, "NULL"),
            other => write!(f, "{}", other.to_text()),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Int(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Float(value)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Cell::Null)
    }
}

/// A named, rectangular grid of raw cells with no header applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    /// Sheet name (`Sheet1` for delimited text).
    pub name: String,
    /// Row-major cells. Every row has the same width.
    rows: Vec<Vec<Cell>>,
    width: usize,
}

impl Sheet {
    /// Create a sheet, padding short rows with nulls so the grid is rectangular.
    pub fn new(name: impl Into<String>, mut rows: Vec<Vec<Cell>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, Cell::Null);
        }
        Self {
            name: name.into(),
            rows,
            width,
        }
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Whether the sheet has no cells at all.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.width == 0
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

    /// Positional column labels (`"0"`, `"1"`, ...) used before a header is applied.
    pub fn positional_labels(&self) -> Vec<String> {
        (0..self.width).map(|i| i.to_string()).collect()
    }
}

/// Sheets of one input file, in file order.
pub type Workbook = IndexMap<String, Sheet>;

/// Metadata about the source data file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (xlsx, xls, csv, txt, dat).
    pub format: String,
    /// Text encoding used for delimited inputs.
    pub encoding: String,
    /// Field separator for delimited inputs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<char>,
    /// Sheet names in file order.
    pub sheets: Vec<String>,
    /// When the file was read.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a file that has been read.
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: String,
        delimiter: Option<u8>,
        sheets: Vec<String>,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            encoding: "utf-8".to_string(),
            delimiter: delimiter.map(char::from),
            sheets,
            loaded_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_cell_to_text() {
        assert_eq!(Cell::Null.to_text(), "");
        assert_eq!(Cell::Int(25).to_text(), "25");
        assert_eq!(Cell::Float(25.0).to_text(), "25.0");
        assert_eq!(Cell::Float(2.5).to_text(), "2.5");
        assert_eq!(Cell::Bool(true).to_text(), "True");
        assert_eq!(Cell::from("abc").to_text(), "abc");

        let dt = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(Cell::DateTime(dt).to_text(), "2024-03-05 00:00:00");
    }

    #[test]
    fn test_cell_blank() {
        assert!(Cell::Null.is_blank());
        assert!(Cell::from("   ").is_blank());
        assert!(!Cell::from("x").is_blank());
        assert!(!Cell::Int(0).is_blank());
    }

    #[test]
    fn test_sheet_is_rectangular() {
        let sheet = Sheet::new(
            "Sheet1",
            vec![
                vec![Cell::from("a"), Cell::from("b"), Cell::from("c")],
                vec![Cell::from("1")],
            ],
        );

        assert_eq!(sheet.width(), 3);
        assert_eq!(sheet.height(), 2);
        assert_eq!(sheet.get(1, 2), Some(&Cell::Null));
        assert_eq!(sheet.positional_labels(), vec!["0", "1", "2"]);
    }

    #[test]
    fn test_empty_sheet() {
        let sheet = Sheet::new("Sheet1", Vec::new());
        assert!(sheet.is_empty());
        assert_eq!(sheet.width(), 0);
    }
}
