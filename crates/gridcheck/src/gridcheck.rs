//! Main Gridcheck struct and public API.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::catalog::{InMemoryCatalog, RuleCatalog};
use crate::error::{GridcheckError, Result};
use crate::formula::{FormulaOptions, FormulaOutcome, evaluate_column_rule};
use crate::inference::{self, ColumnRules};
use crate::input::{
    Cell, DEFAULT_EXTENSIONS, DEFAULT_MAX_SCAN_ROWS, Loader, LoaderConfig, Sheet, Sniffer,
    SourceMetadata, TypedFrame, Workbook, find_header_row,
};
use crate::rules::DEFAULT_ACCEPTED_DATE_FORMATS;
use crate::schema::ColumnProfile;
use crate::validation::{
    EngineSettings, RowValidation, ValidationEngine, ValidationReport, ValidationResult,
};

/// Configuration for Gridcheck.
///
/// Every field has a default, so a config file only needs the fields it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridcheckConfig {
    /// File extensions the loader accepts, without the dot.
    pub allowed_extensions: Vec<String>,
    /// Rows scanned when locating the header.
    pub max_header_scan_rows: usize,
    /// Bytes read when sniffing a delimiter.
    pub sniff_sample_bytes: usize,
    /// Rows trial-parsed per delimiter candidate.
    pub sniff_sample_rows: usize,
    /// strftime formats a plain `Date` rule accepts.
    pub accepted_date_formats: Vec<String>,
    /// Report null cells before rule-specific checks.
    pub check_null_cells: bool,
    /// Tolerance for arithmetic formulas.
    pub formula_tolerance: f64,
    /// Composite rule recursion limit.
    pub max_rule_depth: usize,
}

impl Default for GridcheckConfig {
    fn default() -> Self {
        let engine = EngineSettings::default();
        Self {
            allowed_extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            max_header_scan_rows: DEFAULT_MAX_SCAN_ROWS,
            sniff_sample_bytes: 1024,
            sniff_sample_rows: 5,
            accepted_date_formats: DEFAULT_ACCEPTED_DATE_FORMATS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            check_null_cells: engine.check_null_cells,
            formula_tolerance: engine.formula.tolerance,
            max_rule_depth: engine.max_rule_depth,
        }
    }
}

impl GridcheckConfig {
    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| GridcheckError::io(path, e))?;
        let reader = BufReader::new(file);

        serde_json::from_reader(reader).map_err(|e| {
            GridcheckError::Config(format!("Invalid config file '{}': {}", path.display(), e))
        })
    }

    /// Engine settings derived from this configuration.
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            accepted_date_formats: self.accepted_date_formats.clone(),
            check_null_cells: self.check_null_cells,
            formula: FormulaOptions {
                tolerance: self.formula_tolerance,
            },
            max_rule_depth: self.max_rule_depth,
        }
    }

    fn loader(&self) -> Loader {
        let config = LoaderConfig {
            allowed_extensions: self.allowed_extensions.clone(),
            ..LoaderConfig::default()
        };
        Loader::with_config(
            config,
            Sniffer::new(self.sniff_sample_bytes, self.sniff_sample_rows),
        )
    }
}

/// Validation outcome for one sheet.
#[derive(Debug, Clone, Serialize)]
pub struct SheetReport {
    /// Sheet name.
    pub sheet: String,
    /// 0-based index of the header row in the raw sheet.
    pub header_row: usize,
    /// Column profiles of the typed frame.
    pub columns: Vec<ColumnProfile>,
    /// Rules that were run, by column.
    pub rules: ColumnRules,
    /// Findings.
    pub report: ValidationReport,
}

/// Validation outcome for a whole file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// Metadata about the source file.
    pub source: SourceMetadata,
    /// One report per checked sheet, in workbook order.
    pub sheets: Vec<SheetReport>,
}

impl FileReport {
    /// Total findings across all sheets.
    pub fn total_errors(&self) -> usize {
        self.sheets.iter().map(|s| s.report.total_errors()).sum()
    }

    /// Whether no sheet produced a finding.
    pub fn is_valid(&self) -> bool {
        self.sheets.iter().all(|s| s.report.is_valid())
    }
}

/// The main Gridcheck engine: load, profile and validate tabular files.
pub struct Gridcheck {
    config: GridcheckConfig,
    loader: Loader,
    catalog: Box<dyn RuleCatalog>,
}

impl Gridcheck {
    /// Create a Gridcheck instance with default configuration and the built-in rules.
    pub fn new() -> Self {
        Self::with_config(GridcheckConfig::default())
    }

    /// Create a Gridcheck instance with custom configuration.
    pub fn with_config(config: GridcheckConfig) -> Self {
        let loader = config.loader();
        Self {
            config,
            loader,
            catalog: Box::new(InMemoryCatalog::with_defaults()),
        }
    }

    /// Replace the rule catalog.
    pub fn with_catalog(mut self, catalog: impl RuleCatalog + 'static) -> Self {
        self.catalog = Box::new(catalog);
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &GridcheckConfig {
        &self.config
    }

    /// The active rule catalog.
    pub fn catalog(&self) -> &dyn RuleCatalog {
        self.catalog.as_ref()
    }

    /// Load every sheet of a file.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<(Workbook, SourceMetadata)> {
        self.loader.load(path)
    }

    /// Locate the header row of a sheet and slice it into a typed frame.
    ///
    /// Returns the frame along with the header row index.
    pub fn prepare(&self, sheet: &Sheet) -> Result<(TypedFrame, usize)> {
        let header_row = find_header_row(sheet, self.config.max_header_scan_rows)
            .ok_or_else(|| GridcheckError::NoHeaderDetected(sheet.name.clone()))?;
        let frame = TypedFrame::from_sheet(sheet, header_row)?;

        debug!(
            sheet = %sheet.name,
            header_row,
            columns = frame.column_count(),
            rows = frame.row_count(),
            "Prepared frame"
        );
        Ok((frame, header_row))
    }

    /// Profile every column of a frame.
    pub fn profile_columns(&self, frame: &TypedFrame) -> Vec<ColumnProfile> {
        inference::profile_columns(frame)
    }

    /// Default rules for the named columns.
    pub fn assign_default_rules<S: AsRef<str>>(
        &self,
        frame: &TypedFrame,
        columns: &[S],
    ) -> Result<ColumnRules> {
        inference::assign_default_rules(frame, columns)
    }

    /// Run one rule over one column.
    pub fn validate(&self, frame: &TypedFrame, column: &str, rule: &str) -> Result<ValidationResult> {
        self.engine().validate(frame, column, rule)
    }

    /// Run every (column, rule) pair.
    pub fn validate_frame(&self, frame: &TypedFrame, rules: &ColumnRules) -> Result<ValidationReport> {
        self.engine().validate_frame(frame, rules)
    }

    /// Re-check one edited row.
    pub fn validate_row(
        &self,
        headers: &[String],
        values: &[Cell],
        checks: &[(String, String)],
    ) -> RowValidation {
        self.engine().validate_row(headers, values, checks)
    }

    /// Evaluate a formula rule attached to `column`.
    pub fn evaluate_formula(&self, frame: &TypedFrame, column: &str, formula: &str) -> FormulaOutcome {
        let options = FormulaOptions {
            tolerance: self.config.formula_tolerance,
        };
        evaluate_column_rule(frame, column, formula, &options)
    }

    /// Load a file and validate its sheets.
    ///
    /// Without `rules`, every column gets its default rules. With `rules`,
    /// columns absent from a sheet are skipped with a warning. Without `sheet`,
    /// every non-empty sheet is checked.
    pub fn check_file(
        &self,
        path: impl AsRef<Path>,
        rules: Option<&ColumnRules>,
        sheet: Option<&str>,
    ) -> Result<FileReport> {
        let (workbook, source) = self.load(path)?;

        let selected: Vec<&Sheet> = match sheet {
            Some(name) => vec![
                workbook
                    .get(name)
                    .ok_or_else(|| GridcheckError::SheetNotFound(name.to_string()))?,
            ],
            None => workbook.values().filter(|s| !s.is_empty()).collect(),
        };

        let mut sheets = Vec::with_capacity(selected.len());
        for sheet in selected {
            sheets.push(self.check_sheet(sheet, rules)?);
        }

        let report = FileReport { source, sheets };
        info!(
            file = %report.source.file,
            sheets = report.sheets.len(),
            errors = report.total_errors(),
            "Checked file"
        );
        Ok(report)
    }

    fn check_sheet(&self, sheet: &Sheet, rules: Option<&ColumnRules>) -> Result<SheetReport> {
        let (frame, header_row) = self.prepare(sheet)?;

        let rules = match rules {
            Some(supplied) => {
                let mut present = ColumnRules::new();
                for (column, names) in supplied {
                    match frame.find_column(column) {
                        Some(_) => {
                            present.insert(column.clone(), names.clone());
                        }
                        None => {
                            warn!(sheet = %sheet.name, column = %column, "Column not in sheet, skipping its rules");
                        }
                    }
                }
                present
            }
            None => self.assign_default_rules(&frame, &frame.headers)?,
        };

        let report = self.validate_frame(&frame, &rules)?;
        Ok(SheetReport {
            sheet: sheet.name.clone(),
            header_row,
            columns: self.profile_columns(&frame),
            rules,
            report,
        })
    }

    fn engine(&self) -> ValidationEngine<'_> {
        ValidationEngine::with_settings(self.catalog.as_ref(), self.config.engine_settings())
    }
}

impl Default for Gridcheck {
    fn default() -> Self {
        Self::new()
    }
}
