//! Rule evaluation over frame columns.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::location::{EMPTY_VALUE, ErrorLocation, NULL_VALUE, ValidationReport, ValidationResult};
use crate::catalog::RuleCatalog;
use crate::error::{GridcheckError, Result};
use crate::formula::{FormulaOptions, evaluate_column_rule, parse_number};
use crate::inference::{
    ALPHANUMERIC_PATTERN, BOOLEAN_PATTERN, ColumnRules, EMAIL_VALIDATION_PATTERN, REQUIRED_RULE,
};
use crate::input::{Cell, TypedFrame};
use crate::rules::{
    DEFAULT_ACCEPTED_DATE_FORMATS, Logic, Rule, is_transform_rule, matches_any, parse_date,
    resolve_rule,
};

/// Settings shared by every rule the engine evaluates.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    /// Formats a plain `Date` rule accepts.
    pub accepted_date_formats: Vec<String>,
    /// Report null cells before any rule-specific check.
    pub check_null_cells: bool,
    /// Formula evaluation settings.
    pub formula: FormulaOptions,
    /// Deepest composite-rule nesting evaluated before giving up.
    pub max_rule_depth: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            accepted_date_formats: DEFAULT_ACCEPTED_DATE_FORMATS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            check_null_cells: true,
            formula: FormulaOptions::default(),
            max_rule_depth: 5,
        }
    }
}

/// One finding of a single-row re-validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowError {
    pub column: String,
    pub rule_failed: String,
    pub reason: String,
    pub value: String,
}

/// Outcome of re-validating one edited row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowValidation {
    /// True when no check produced a finding.
    pub valid: bool,
    pub errors: Vec<RowError>,
    /// Number of (column, rule) checks run.
    pub rules_checked: usize,
}

/// Per-call switches.
struct RunOptions<'a> {
    date_formats: &'a [String],
    check_null_cells: bool,
}

/// Evaluates rules against frame columns, resolving rule names through a catalog.
pub struct ValidationEngine<'c> {
    catalog: &'c dyn RuleCatalog,
    settings: EngineSettings,
}

impl<'c> ValidationEngine<'c> {
    /// Create an engine with default settings.
    pub fn new(catalog: &'c dyn RuleCatalog) -> Self {
        Self {
            catalog,
            settings: EngineSettings::default(),
        }
    }

    /// Create an engine with custom settings.
    pub fn with_settings(catalog: &'c dyn RuleCatalog, settings: EngineSettings) -> Self {
        Self { catalog, settings }
    }

    /// The engine's settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Run one rule over one column with the engine's settings.
    pub fn validate(&self, frame: &TypedFrame, column: &str, rule_name: &str) -> Result<ValidationResult> {
        let options = RunOptions {
            date_formats: &self.settings.accepted_date_formats,
            check_null_cells: self.settings.check_null_cells,
        };
        self.run(frame, column, rule_name, &options, 0)
    }

    /// Run one rule over one column with explicit date formats and null handling.
    pub fn validate_with(
        &self,
        frame: &TypedFrame,
        column: &str,
        rule_name: &str,
        accepted_date_formats: &[String],
        check_null_cells: bool,
    ) -> Result<ValidationResult> {
        let options = RunOptions {
            date_formats: accepted_date_formats,
            check_null_cells,
        };
        self.run(frame, column, rule_name, &options, 0)
    }

    /// Run every (column, rule) pair of a rule map, in assignment order.
    ///
    /// Transformation rules and rules marked inactive in the catalog are skipped.
    pub fn validate_frame(&self, frame: &TypedFrame, rules: &ColumnRules) -> Result<ValidationReport> {
        let mut report = ValidationReport::new(frame.row_count());

        for (column, rule_names) in rules {
            for rule_name in rule_names {
                if is_transform_rule(rule_name) {
                    debug!(column = %column, rule = %rule_name, "Skipping transformation rule");
                    continue;
                }
                if self.catalog.lookup_rule(rule_name).is_some_and(|d| !d.is_active) {
                    debug!(column = %column, rule = %rule_name, "Skipping inactive rule");
                    continue;
                }

                let result = self.validate(frame, column, rule_name)?;
                report.record(column, result);
            }
        }

        info!(
            rows = report.row_count,
            rules = report.rules_checked,
            errors = report.total_errors(),
            "Validation complete"
        );
        Ok(report)
    }

    /// Re-check one edited row against `(column, rule)` pairs.
    ///
    /// A rule that cannot be evaluated becomes a finding rather than an error,
    /// so one bad rule does not block the rest of the row.
    pub fn validate_row(
        &self,
        headers: &[String],
        values: &[Cell],
        checks: &[(String, String)],
    ) -> RowValidation {
        let frame = TypedFrame::single_row(headers.to_vec(), values.to_vec());
        let mut errors = Vec::new();

        for (column, rule_name) in checks {
            match self.validate(&frame, column, rule_name) {
                Ok(result) => {
                    errors.extend(result.into_locations().into_iter().map(|l| RowError {
                        column: column.clone(),
                        rule_failed: l.rule_failed,
                        reason: l.reason,
                        value: l.value,
                    }));
                }
                Err(e) => {
                    let value = frame
                        .find_column(column)
                        .and_then(|i| frame.get(0, i))
                        .filter(|c| !c.is_null())
                        .map(Cell::to_text)
                        .unwrap_or_else(|| NULL_VALUE.to_string());
                    errors.push(RowError {
                        column: column.clone(),
                        rule_failed: rule_name.clone(),
                        reason: format!("Validation error: {}", e),
                        value,
                    });
                }
            }
        }

        RowValidation {
            valid: errors.is_empty(),
            errors,
            rules_checked: checks.len(),
        }
    }

    fn run(
        &self,
        frame: &TypedFrame,
        column: &str,
        rule_name: &str,
        options: &RunOptions<'_>,
        depth: usize,
    ) -> Result<ValidationResult> {
        let index = frame
            .find_column(column)
            .ok_or_else(|| GridcheckError::ColumnNotFound(column.to_string()))?;

        let rule = resolve_rule(rule_name, self.catalog)?;
        debug!(column, rule = rule_name, ?rule, depth, "Validating column");

        let locations = match &rule {
            Rule::Formula(formula) => {
                evaluate_column_rule(frame, column, formula, &self.settings.formula).locations
            }
            Rule::Custom { logic, base_rules } => {
                if depth >= self.settings.max_rule_depth {
                    self.depth_exceeded(frame, index, rule_name)
                } else {
                    self.run_custom(frame, index, rule_name, *logic, base_rules, options, depth)?
                }
            }
            _ => self.run_cells(frame, index, rule_name, &rule, options),
        };

        Ok(ValidationResult::from(locations))
    }

    /// The per-cell state machine for non-composite rules.
    fn run_cells(
        &self,
        frame: &TypedFrame,
        index: usize,
        rule_name: &str,
        rule: &Rule,
        options: &RunOptions<'_>,
    ) -> Vec<ErrorLocation> {
        let mut locations = Vec::new();

        for (i, cell) in frame.column(index).enumerate() {
            let row = i + 1;

            if options.check_null_cells && cell.is_null() {
                locations.push(ErrorLocation::new(row, NULL_VALUE, rule_name, "Value is null"));
                continue;
            }

            let text = cell.to_text();
            let text = text.trim();

            if text.is_empty() && rule_name == REQUIRED_RULE {
                locations.push(ErrorLocation::new(row, EMPTY_VALUE, rule_name, "Value is empty"));
                continue;
            }

            if let Some((value, reason)) = check_cell(rule, cell, text, options.date_formats) {
                locations.push(ErrorLocation::new(row, value, rule_name, reason));
            }
        }

        locations
    }

    /// Evaluate a composite rule cell by cell through its base rules.
    ///
    /// Base-rule findings are re-tagged with the composite's name. A cell whose
    /// combination fails without any base finding gets a synthetic finding, but
    /// only while the column has no findings at all. Every built-in and formula
    /// rule reports its own failures, so the synthetic finding never appears for
    /// them.
    #[allow(clippy::too_many_arguments)]
    fn run_custom(
        &self,
        frame: &TypedFrame,
        index: usize,
        rule_name: &str,
        logic: Logic,
        base_rules: &[String],
        options: &RunOptions<'_>,
        depth: usize,
    ) -> Result<Vec<ErrorLocation>> {
        let column = &frame.headers[index];
        let mut locations = Vec::new();

        for (i, row_cells) in frame.rows().enumerate() {
            let row = i + 1;
            let cell = &row_cells[index];

            if options.check_null_cells && cell.is_null() {
                locations.push(ErrorLocation::new(row, NULL_VALUE, rule_name, "Value is null"));
                continue;
            }

            let text = cell.to_text().trim().to_string();
            let single = TypedFrame::single_row(frame.headers.clone(), row_cells.to_vec());

            let mut combined = logic.identity();
            for base in base_rules {
                let result = self.run(&single, column, base, options, depth + 1)?;
                combined = logic.combine(combined, result.is_valid());

                for finding in result.into_locations() {
                    locations.push(ErrorLocation::new(row, &text, rule_name, finding.reason));
                }
            }

            // Unreachable while every base rule reports its own failures.
            if !combined && locations.is_empty() {
                locations.push(ErrorLocation::new(
                    row,
                    &text,
                    rule_name,
                    format!("Failed custom rule {}", rule_name),
                ));
            }
        }

        Ok(locations)
    }

    fn depth_exceeded(&self, frame: &TypedFrame, index: usize, rule_name: &str) -> Vec<ErrorLocation> {
        let reason = format!(
            "Rule nesting exceeds maximum depth of {}",
            self.settings.max_rule_depth
        );
        frame
            .column(index)
            .enumerate()
            .map(|(i, cell)| ErrorLocation::new(i + 1, cell.to_text(), rule_name, reason.clone()))
            .collect()
    }
}

/// Check one non-null (or unchecked-null) cell against a single-cell rule.
///
/// Returns the offending value and the reason on failure.
fn check_cell(rule: &Rule, cell: &Cell, text: &str, date_formats: &[String]) -> Option<(String, String)> {
    let fail = |reason: &str| Some((text.to_string(), reason.to_string()));

    match rule {
        Rule::Required => None,
        Rule::Int => {
            let digits = text.strip_prefix('-').unwrap_or(text);
            if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
                None
            } else {
                fail("Must be an integer")
            }
        }
        Rule::Float => {
            if parse_number(text).is_some() {
                None
            } else {
                fail("Must be a number (integer or decimal)")
            }
        }
        Rule::Text => {
            let is_string = cell.is_text() || cell.is_null();
            if is_string && text.chars().all(is_text_char) {
                None
            } else {
                fail("Contains invalid characters")
            }
        }
        Rule::Email => {
            if EMAIL_VALIDATION_PATTERN.is_match(text) {
                None
            } else {
                fail("Invalid email format")
            }
        }
        Rule::Boolean => {
            if BOOLEAN_PATTERN.is_match(text) {
                None
            } else {
                fail("Must be a boolean (true/false or 0/1)")
            }
        }
        Rule::Alphanumeric => {
            if text.is_empty() {
                fail("Value is empty or contains only whitespace")
            } else if ALPHANUMERIC_PATTERN.is_match(text) {
                None
            } else {
                fail("Contains non-alphanumeric characters")
            }
        }
        Rule::Date => {
            if text.is_empty() {
                Some((EMPTY_VALUE.to_string(), "Value is empty".to_string()))
            } else if matches_any(text, date_formats) {
                None
            } else {
                fail(&format!(
                    "Invalid date format (expected one of {})",
                    date_formats.join(", ")
                ))
            }
        }
        Rule::DateWithFormat { source, parse } => {
            if text.is_empty() {
                Some((EMPTY_VALUE.to_string(), "Value is empty".to_string()))
            } else if parse_date(text, parse).is_some() {
                None
            } else {
                fail(&format!("Invalid date format (expected {})", source))
            }
        }
        // Evaluated column-wide, never per cell.
        Rule::Custom { .. } | Rule::Formula(_) => None,
    }
}

fn is_text_char(c: char) -> bool {
    c.is_alphabetic() || c == ' ' || c == '"' || c == '(' || c == ')'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{InMemoryCatalog, RuleDescriptor};

    fn catalog() -> InMemoryCatalog {
        let mut catalog = InMemoryCatalog::with_defaults();
        catalog.insert(
            RuleDescriptor::builtin("Date(MM/DD/YYYY)", r#"{"format": "%m/%d/%Y"}"#)
                .with_source_format("MM/DD/YYYY"),
        );
        catalog.insert(RuleDescriptor::custom(
            "IntOrCode",
            r#"{"logic": "OR", "base_rules": ["Int", "Alphanumeric"]}"#,
        ));
        catalog.insert(RuleDescriptor::custom(
            "IntAndBoolean",
            r#"{"logic": "AND", "base_rules": ["Int", "Boolean"]}"#,
        ));
        catalog.insert(RuleDescriptor::custom(
            "Loop",
            r#"{"logic": "AND", "base_rules": ["Loop"]}"#,
        ));
        catalog.insert(RuleDescriptor::custom("Positive", "'score' > 0"));
        catalog
    }

    fn frame(headers: &[&str], rows: &[Vec<&str>]) -> TypedFrame {
        TypedFrame::from_strings(headers, rows)
    }

    fn column(values: &[&str]) -> TypedFrame {
        let rows: Vec<Vec<&str>> = values.iter().map(|v| vec![*v]).collect();
        frame(&["col"], &rows)
    }

    // =========================================================================
    // Cell state machine
    // =========================================================================

    #[test]
    fn test_null_is_reported_first() {
        let catalog = catalog();
        let engine = ValidationEngine::new(&catalog);
        let result = engine.validate(&column(&["1", ""]), "col", "Int").unwrap();

        assert_eq!(
            result.locations(),
            &[ErrorLocation::new(2, "NULL", "Int", "Value is null")]
        );
    }

    #[test]
    fn test_required_empty_without_null_check() {
        let catalog = catalog();
        let engine = ValidationEngine::new(&catalog);
        let f = TypedFrame::new(
            vec!["col".to_string()],
            vec![vec![Cell::from("  ")], vec![Cell::Null], vec![Cell::from("x")]],
        );

        let result = engine
            .validate_with(&f, "col", "Required", &[], false)
            .unwrap();
        assert_eq!(
            result.locations(),
            &[
                ErrorLocation::new(1, "EMPTY", "Required", "Value is empty"),
                ErrorLocation::new(2, "EMPTY", "Required", "Value is empty"),
            ]
        );
    }

    #[test]
    fn test_int_rule() {
        let catalog = catalog();
        let engine = ValidationEngine::new(&catalog);
        let result = engine
            .validate(&column(&["25", "-3", "abc", "--4", "2.5", " 7 "]), "col", "Int")
            .unwrap();

        let rows: Vec<usize> = result.locations().iter().map(|l| l.row).collect();
        assert_eq!(rows, vec![3, 4, 5]);
        assert_eq!(result.locations()[0].reason, "Must be an integer");
    }

    #[test]
    fn test_float_rule() {
        let catalog = catalog();
        let engine = ValidationEngine::new(&catalog);
        let result = engine
            .validate(&column(&["1", "2.5", "-1e3", "1,5"]), "col", "Float")
            .unwrap();

        assert_eq!(
            result.locations(),
            &[ErrorLocation::new(4, "1,5", "Float", "Must be a number (integer or decimal)")]
        );
    }

    #[test]
    fn test_text_rule() {
        let catalog = catalog();
        let engine = ValidationEngine::new(&catalog);
        let result = engine
            .validate(&column(&["Hello World", "say \"hi\" (ok)", "R2D2", "a-b"]), "col", "Text")
            .unwrap();

        let rows: Vec<usize> = result.locations().iter().map(|l| l.row).collect();
        assert_eq!(rows, vec![3, 4]);
        assert_eq!(result.locations()[0].reason, "Contains invalid characters");
    }

    #[test]
    fn test_text_rule_rejects_non_string_cells() {
        let catalog = catalog();
        let engine = ValidationEngine::new(&catalog);
        let f = TypedFrame::new(vec!["col".to_string()], vec![vec![Cell::Bool(true)]]);

        let result = engine.validate(&f, "col", "Text").unwrap();
        assert_eq!(result.error_count(), 1);
    }

    #[test]
    fn test_email_boolean_alphanumeric() {
        let catalog = catalog();
        let engine = ValidationEngine::new(&catalog);

        let email = engine.validate(&column(&["a@b.com", "bad-email"]), "col", "Email").unwrap();
        assert_eq!(
            email.locations(),
            &[ErrorLocation::new(2, "bad-email", "Email", "Invalid email format")]
        );

        let accented = engine
            .validate(&column(&["first.last+tag@mail-host.co.uk", "jürgen@b.com"]), "col", "Email")
            .unwrap();
        assert_eq!(
            accented.locations(),
            &[ErrorLocation::new(2, "jürgen@b.com", "Email", "Invalid email format")]
        );

        let boolean = engine.validate(&column(&["TRUE", "0", "yes"]), "col", "Boolean").unwrap();
        assert_eq!(boolean.locations()[0].row, 3);
        assert_eq!(boolean.locations()[0].reason, "Must be a boolean (true/false or 0/1)");

        let f = TypedFrame::new(
            vec!["col".to_string()],
            vec![vec![Cell::from("abc1")], vec![Cell::from("a b")], vec![Cell::from("   ")]],
        );
        let alnum = engine.validate(&f, "col", "Alphanumeric").unwrap();
        assert_eq!(
            alnum.locations(),
            &[
                ErrorLocation::new(2, "a b", "Alphanumeric", "Contains non-alphanumeric characters"),
                ErrorLocation::new(3, "", "Alphanumeric", "Value is empty or contains only whitespace"),
            ]
        );
    }

    #[test]
    fn test_date_rules() {
        let catalog = catalog();
        let engine = ValidationEngine::new(&catalog);

        let specific = engine
            .validate(&column(&["12/31/2023", "31/12/2023"]), "col", "Date(MM/DD/YYYY)")
            .unwrap();
        assert_eq!(
            specific.locations(),
            &[ErrorLocation::new(2, "31/12/2023", "Date(MM/DD/YYYY)", "Invalid date format (expected MM/DD/YYYY)")]
        );

        let f = TypedFrame::new(vec!["col".to_string()], vec![vec![Cell::from(" ")]]);
        let empty = engine.validate(&f, "col", "Date(MM/DD/YYYY)").unwrap();
        assert_eq!(empty.locations(), &[ErrorLocation::new(1, "EMPTY", "Date(MM/DD/YYYY)", "Value is empty")]);

        let plain = engine
            .validate(&column(&["31-12-2023", "03/2024", "2023.12.31"]), "col", "Date")
            .unwrap();
        assert_eq!(plain.error_count(), 1);
        assert_eq!(plain.locations()[0].row, 3);
    }

    #[test]
    fn test_each_date_rule_uses_its_own_format() {
        let mut catalog = catalog();
        catalog.insert(
            RuleDescriptor::builtin("Date(DD-MM-YYYY)", "{}").with_source_format("DD-MM-YYYY"),
        );
        let engine = ValidationEngine::new(&catalog);
        let f = frame(&["us", "eu"], &[vec!["12/31/2023", "31-12-2023"]]);

        let mut rules = ColumnRules::new();
        rules.insert("us".to_string(), vec!["Date(MM/DD/YYYY)".to_string()]);
        rules.insert("eu".to_string(), vec!["Date(DD-MM-YYYY)".to_string()]);

        assert!(engine.validate_frame(&f, &rules).unwrap().is_valid());
    }

    // =========================================================================
    // Composite rules
    // =========================================================================

    #[test]
    fn test_composite_surfaces_base_failures() {
        let catalog = catalog();
        let engine = ValidationEngine::new(&catalog);
        let result = engine.validate(&column(&["12", "a-b"]), "col", "IntOrCode").unwrap();

        // Row 1 passes Int but fails nothing else; row 2 fails both base rules.
        assert_eq!(
            result.locations(),
            &[
                ErrorLocation::new(2, "a-b", "IntOrCode", "Must be an integer"),
                ErrorLocation::new(2, "a-b", "IntOrCode", "Contains non-alphanumeric characters"),
            ]
        );
    }

    #[test]
    fn test_composite_or_still_reports_failing_branch() {
        let catalog = catalog();
        let engine = ValidationEngine::new(&catalog);
        let result = engine.validate(&column(&["abc"]), "col", "IntOrCode").unwrap();

        assert_eq!(
            result.locations(),
            &[ErrorLocation::new(1, "abc", "IntOrCode", "Must be an integer")]
        );
    }

    #[test]
    fn test_composite_and() {
        let catalog = catalog();
        let engine = ValidationEngine::new(&catalog);
        let result = engine.validate(&column(&["1", "5"]), "col", "IntAndBoolean").unwrap();

        assert_eq!(
            result.locations(),
            &[ErrorLocation::new(2, "5", "IntAndBoolean", "Must be a boolean (true/false or 0/1)")]
        );
    }

    #[test]
    fn test_failed_composite_reports_base_findings_only() {
        let catalog = catalog();
        let engine = ValidationEngine::new(&catalog);

        let and = engine.validate(&column(&["x", "1"]), "col", "IntAndBoolean").unwrap();
        let or = engine.validate(&column(&["a-b"]), "col", "IntOrCode").unwrap();

        for result in [&and, &or] {
            assert!(!result.is_valid());
            assert!(result
                .locations()
                .iter()
                .all(|l| !l.reason.starts_with("Failed custom rule")));
        }

        // Row 1 fails both Int and Boolean; row 2 satisfies both.
        let rows: Vec<usize> = and.locations().iter().map(|l| l.row).collect();
        assert_eq!(rows, vec![1, 1]);
        assert_eq!(or.error_count(), 2);
    }

    #[test]
    fn test_composite_null_cell() {
        let catalog = catalog();
        let engine = ValidationEngine::new(&catalog);
        let result = engine.validate(&column(&[""]), "col", "IntOrCode").unwrap();

        assert_eq!(result.locations(), &[ErrorLocation::new(1, "NULL", "IntOrCode", "Value is null")]);
    }

    #[test]
    fn test_cyclic_composite_terminates() {
        let catalog = catalog();
        let engine = ValidationEngine::new(&catalog);
        let result = engine.validate(&column(&["x"]), "col", "Loop").unwrap();

        assert_eq!(result.error_count(), 1);
        assert_eq!(result.locations()[0].rule_failed, "Loop");
        assert_eq!(result.locations()[0].reason, "Rule nesting exceeds maximum depth of 5");
    }

    #[test]
    fn test_unknown_base_rule_is_an_error() {
        let mut catalog = catalog();
        catalog.insert(RuleDescriptor::custom(
            "Broken",
            r#"{"logic": "AND", "base_rules": ["Postcode"]}"#,
        ));
        let engine = ValidationEngine::new(&catalog);

        let err = engine.validate(&column(&["x"]), "col", "Broken").unwrap_err();
        assert!(matches!(err, GridcheckError::UnknownRule(ref n) if n == "Postcode"));
    }

    // =========================================================================
    // Formula rules, frames and rows
    // =========================================================================

    #[test]
    fn test_formula_rule_through_catalog() {
        let catalog = catalog();
        let engine = ValidationEngine::new(&catalog);
        let f = frame(&["score"], &[vec!["3"], vec!["-1"]]);

        let result = engine.validate(&f, "score", "Positive").unwrap();
        assert_eq!(result.error_count(), 1);
        assert_eq!(result.locations()[0].rule_failed, "score_Formula");
    }

    #[test]
    fn test_unknown_column_and_rule() {
        let catalog = catalog();
        let engine = ValidationEngine::new(&catalog);
        let f = column(&["1"]);

        assert!(matches!(
            engine.validate(&f, "missing", "Int"),
            Err(GridcheckError::ColumnNotFound(_))
        ));
        assert!(matches!(
            engine.validate(&f, "col", "Postcode"),
            Err(GridcheckError::UnknownRule(_))
        ));
    }

    #[test]
    fn test_validate_frame_skips_transforms_and_inactive() {
        let mut catalog = catalog();
        catalog.insert(RuleDescriptor::builtin("Email", "{}").inactive());
        let engine = ValidationEngine::new(&catalog);
        let f = frame(&["Name", "Age"], &[vec!["John", "25"], vec!["Jane", "abc"]]);

        let mut rules = ColumnRules::new();
        rules.insert("Name".to_string(), vec!["Required".to_string(), "Email".to_string()]);
        rules.insert(
            "Age".to_string(),
            vec!["Int".to_string(), "Transform-Date(DD-MM-YYYY)".to_string()],
        );

        let report = engine.validate_frame(&f, &rules).unwrap();
        assert_eq!(report.rules_checked, 2);
        assert_eq!(report.total_errors(), 1);
        assert_eq!(
            report.column_errors("Age"),
            &[ErrorLocation::new(2, "abc", "Int", "Must be an integer")]
        );
    }

    #[test]
    fn test_validate_row() {
        let catalog = catalog();
        let engine = ValidationEngine::new(&catalog);
        let headers = vec!["score".to_string(), "email".to_string()];
        let values = vec![Cell::from("-5"), Cell::from("a@b.com")];
        let checks = vec![
            ("score".to_string(), "Positive".to_string()),
            ("email".to_string(), "Email".to_string()),
            ("email".to_string(), "Postcode".to_string()),
        ];

        let outcome = engine.validate_row(&headers, &values, &checks);
        assert!(!outcome.valid);
        assert_eq!(outcome.rules_checked, 3);
        assert_eq!(outcome.errors.len(), 2);
        assert_eq!(outcome.errors[0].column, "score");
        assert_eq!(outcome.errors[0].rule_failed, "score_Formula");
        assert_eq!(outcome.errors[0].value, "-5");
        assert_eq!(outcome.errors[1].rule_failed, "Postcode");
        assert_eq!(outcome.errors[1].reason, "Validation error: Unknown rule: Postcode");
        assert_eq!(outcome.errors[1].value, "a@b.com");
    }
}
