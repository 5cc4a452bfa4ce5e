//! Tabular file loading for spreadsheets and delimited text.

use std::fs;
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use encoding_rs::UTF_8;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use super::sniffer::Sniffer;
use super::source::{Cell, Sheet, SourceMetadata, Workbook};
use crate::error::{GridcheckError, Result};

/// Extensions accepted when nothing else is configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &["xlsx", "xls", "csv", "txt", "dat"];

/// Extensions read as workbooks rather than delimited text.
const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xls", "xlsm", "xlsb", "ods"];

/// Name of the single sheet produced from a delimited-text file.
pub const TEXT_SHEET_NAME: &str = "Sheet1";

/// Loader configuration.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Accepted file extensions, lowercase, without the dot.
    pub allowed_extensions: Vec<String>,
    /// Delimiter to use for text inputs (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Quote character for text inputs.
    pub quote: u8,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            delimiter: None,
            quote: b'"',
        }
    }
}

/// Reads a file into raw, header-less sheets.
pub struct Loader {
    config: LoaderConfig,
    sniffer: Sniffer,
}

impl Loader {
    /// Create a loader with default configuration.
    pub fn new() -> Self {
        Self {
            config: LoaderConfig::default(),
            sniffer: Sniffer::default(),
        }
    }

    /// Create a loader with custom configuration.
    pub fn with_config(config: LoaderConfig, sniffer: Sniffer) -> Self {
        Self { config, sniffer }
    }

    /// Load every sheet of a file, along with metadata about the file.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<(Workbook, SourceMetadata)> {
        let path = path.as_ref();
        let extension = self.check_extension(path)?;

        let contents = fs::read(path).map_err(|e| GridcheckError::FileRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let (workbook, delimiter) = if WORKBOOK_EXTENSIONS.contains(&extension.as_str()) {
            (self.read_workbook(path)?, None)
        } else {
            let (sheet, delimiter) = self.read_text(path, &contents)?;
            let mut workbook = Workbook::new();
            workbook.insert(sheet.name.clone(), sheet);
            (workbook, Some(delimiter))
        };

        let metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            contents.len() as u64,
            extension,
            delimiter,
            workbook.keys().cloned().collect(),
        );

        info!(
            file = %metadata.file,
            format = %metadata.format,
            sheets = workbook.len(),
            "File loaded"
        );

        Ok((workbook, metadata))
    }

    /// Validate the extension against the accepted set, returning it lowercased.
    fn check_extension(&self, path: &Path) -> Result<String> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if extension.is_empty() || !self.config.allowed_extensions.contains(&extension) {
            let shown = if extension.is_empty() {
                path.display().to_string()
            } else {
                extension
            };
            return Err(GridcheckError::UnsupportedFileType(shown));
        }

        Ok(extension)
    }

    /// Read a delimited-text file into a single sheet.
    ///
    /// Invalid UTF-8 is replaced, never rejected. Every non-empty field is text.
    fn read_text(&self, path: &Path, contents: &[u8]) -> Result<(Sheet, u8)> {
        let (text, _) = UTF_8.decode_with_bom_removal(contents);
        if text.trim().is_empty() {
            return Err(GridcheckError::EmptyFile(path.to_path_buf()));
        }

        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => self.sniffer.detect_bytes(contents),
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| GridcheckError::FileRead {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

            let row: Vec<Cell> = record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        Cell::Null
                    } else {
                        Cell::from(field)
                    }
                })
                .collect();
            rows.push(row);
        }

        debug!(
            delimiter = %char::from(delimiter).escape_debug(),
            rows = rows.len(),
            "Delimited text parsed"
        );

        Ok((Sheet::new(TEXT_SHEET_NAME, rows), delimiter))
    }

    /// Read every worksheet of a workbook, keeping native cell types.
    fn read_workbook(&self, path: &Path) -> Result<Workbook> {
        let read_error = |e: calamine::Error| GridcheckError::FileRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        let mut source = open_workbook_auto(path).map_err(read_error)?;
        let names: Vec<String> = source.sheet_names().to_vec();

        let mut workbook = Workbook::new();
        for name in names {
            let range = source.worksheet_range(&name).map_err(read_error)?;

            // The range starts at the first used cell; keep absolute positions.
            let (row_offset, col_offset) = range
                .start()
                .map(|(r, c)| (r as usize, c as usize))
                .unwrap_or((0, 0));

            let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); row_offset];
            for row in range.rows() {
                let mut cells = vec![Cell::Null; col_offset];
                cells.extend(row.iter().map(convert_cell));
                rows.push(cells);
            }

            debug!(sheet = %name, rows = rows.len(), "Worksheet read");
            workbook.insert(name.clone(), Sheet::new(name, rows));
        }

        Ok(workbook)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a workbook cell onto a raw cell value.
fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Null,
        Data::String(s) if s.is_empty() => Cell::Null,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(n) => Cell::Int(*n),
        Data::Float(f) if f.is_nan() => Cell::Null,
        // Whole floats are how workbooks store integers.
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => Cell::Int(*f as i64),
        Data::Float(f) => Cell::Float(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) => Cell::DateTime(value),
            None => Cell::Float(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}
