//! Formula rules evaluated across every row of a frame.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use super::parser::Expr;
use super::{CompareOp, FormulaError};
use crate::input::{Cell, TypedFrame};
use crate::validation::{ErrorLocation, NULL_VALUE};

static QUOTED_COLUMN: Lazy<Regex> = Lazy::new(|| Regex::new(r"'([^']+)'").unwrap());

/// Separator that marks a formula as arithmetic.
const ARITHMETIC_SEPARATOR: &str = " = ";

/// Operators accepted by comparison formulas, longest first.
const COMPARISON_OPERATORS: &[(&str, CompareOp)] = &[
    (">=", CompareOp::Ge),
    ("<=", CompareOp::Le),
    (">", CompareOp::Gt),
    ("<", CompareOp::Lt),
    ("=", CompareOp::Eq),
];

/// Tuning for formula evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormulaOptions {
    /// Absolute tolerance when comparing computed and stored values.
    pub tolerance: f64,
}

impl Default for FormulaOptions {
    fn default() -> Self {
        Self { tolerance: 1e-10 }
    }
}

/// Outcome of a formula rule over a frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormulaOutcome {
    /// True only when no finding was produced.
    pub valid: bool,
    /// Findings, row-scoped or (row 0) formula-level.
    pub locations: Vec<ErrorLocation>,
}

impl FormulaOutcome {
    fn from_locations(locations: Vec<ErrorLocation>) -> Self {
        Self {
            valid: locations.is_empty(),
            locations,
        }
    }

    fn formula_level(rule_failed: &str, reason: String) -> Self {
        Self::from_locations(vec![ErrorLocation::new(0, "", rule_failed, reason)])
    }
}

/// Parse cell text as a number, ignoring surrounding whitespace.
pub fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        text.parse::<f64>().ok()
    }
}

/// Evaluate a formula rule attached to `column` against every row.
///
/// Two shapes are accepted. Arithmetic, `'<column>' = <expression>`, is
/// chosen whenever the text contains ` = `: every referenced column and the
/// target must be numeric on a row for the row to be evaluated, and the
/// stored value must match the computed one within `options.tolerance`.
/// Otherwise the formula is a comparison, `'<column>' <op> <operand>`, where
/// the operand is a number or another quoted column.
///
/// Column names are matched trimmed and case-insensitively against the
/// frame's own headers. The column's detected type plays no part. Problems
/// with the formula itself are reported as findings at row 0, never as errors.
pub fn evaluate_column_rule(
    frame: &TypedFrame,
    column: &str,
    formula: &str,
    options: &FormulaOptions,
) -> FormulaOutcome {
    let target = column.trim().to_lowercase();

    let Some(target_index) = frame.find_column(&target) else {
        return FormulaOutcome::formula_level(
            "ColumnNotFound",
            format!("Column '{}' not found in data", target),
        );
    };

    let outcome = if formula.contains(ARITHMETIC_SEPARATOR) {
        evaluate_arithmetic(frame, &target, target_index, formula, options)
    } else {
        evaluate_comparison(frame, &target, target_index, formula)
    };

    debug!(
        column = %target,
        formula,
        findings = outcome.locations.len(),
        "Formula evaluated"
    );
    outcome
}

/// Column name inside a quoted reference, trimmed and lowercased.
fn quoted_name(text: &str) -> Option<String> {
    let text = text.trim();
    let inner = text.strip_prefix('\'')?.strip_suffix('\'')?;
    if inner.is_empty() || inner.contains('\'') {
        return None;
    }
    Some(inner.trim().to_lowercase())
}

/// Columns referenced by expression text, in order without repeats.
fn referenced_columns(expression: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    QUOTED_COLUMN
        .captures_iter(expression)
        .map(|c| c[1].trim().to_lowercase())
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

fn is_missing(cell: &Cell) -> bool {
    cell.is_blank()
}

fn evaluate_arithmetic(
    frame: &TypedFrame,
    target: &str,
    target_index: usize,
    formula: &str,
    options: &FormulaOptions,
) -> FormulaOutcome {
    let Some((lhs, rhs)) = formula.trim().split_once(ARITHMETIC_SEPARATOR) else {
        return invalid_arithmetic();
    };
    if quoted_name(lhs).as_deref() != Some(target) {
        return invalid_arithmetic();
    }

    let referenced = referenced_columns(rhs);
    let mut indexes: Vec<(String, usize)> = Vec::with_capacity(referenced.len() + 1);
    for name in &referenced {
        match frame.find_column(name) {
            Some(index) => indexes.push((name.clone(), index)),
            None => {
                return FormulaOutcome::formula_level(
                    "ColumnNotFound",
                    format!("Referenced column '{}' not found in data", name),
                );
            }
        }
    }
    if !referenced.iter().any(|name| name == target) {
        indexes.push((target.to_string(), target_index));
    }

    let formula_tag = format!("{}_Formula", target);
    let type_tag = format!("{}_DataType", target);
    let mut locations = Vec::new();
    let mut bad_rows = HashSet::new();

    // Every involved column must be numeric, column by column.
    for (name, index) in &indexes {
        for (i, cell) in frame.column(*index).enumerate() {
            if is_missing(cell) {
                locations.push(ErrorLocation::new(
                    i + 1,
                    NULL_VALUE,
                    &formula_tag,
                    format!("Value is null or empty in column {}", name),
                ));
                bad_rows.insert(i);
            } else if parse_number(&cell.to_text()).is_none() {
                let text = cell.to_text();
                locations.push(ErrorLocation::new(
                    i + 1,
                    &text,
                    &type_tag,
                    format!("Invalid numeric value in column {}: {}", name, text),
                ));
                bad_rows.insert(i);
            }
        }
    }

    let expression = Expr::parse(rhs);

    for i in 0..frame.row_count() {
        if bad_rows.contains(&i) {
            continue;
        }

        let mut bindings = HashMap::with_capacity(indexes.len());
        for (name, index) in &indexes {
            if let Some(value) = frame.get(i, *index).and_then(|c| parse_number(&c.to_text())) {
                bindings.insert(name.clone(), value);
            }
        }

        let expected = match &expression {
            Ok(expr) => expr.evaluate(&bindings),
            Err(e) => Err::<f64, FormulaError>(e.clone()),
        };
        let expected = match expected {
            Ok(value) => value,
            Err(e) => {
                locations.push(ErrorLocation::new(
                    i + 1,
                    "",
                    "FormulaEvaluation",
                    format!("Error evaluating formula for row {}: {}", i + 1, e),
                ));
                continue;
            }
        };

        let actual_text = frame
            .get(i, target_index)
            .map(|c| c.to_text().trim().to_string())
            .unwrap_or_default();
        let Some(actual) = parse_number(&actual_text) else {
            continue;
        };

        if (actual - expected).abs() > options.tolerance {
            locations.push(ErrorLocation::new(
                i + 1,
                &actual_text,
                &formula_tag,
                format!(
                    "Data Error: {} ({}) does not match formula {} ({:?})",
                    target, actual_text, rhs, expected
                ),
            ));
        }
    }

    FormulaOutcome::from_locations(locations)
}

fn invalid_arithmetic() -> FormulaOutcome {
    FormulaOutcome::formula_level(
        "InvalidFormula",
        "Arithmetic formula must be 'column_name = expression'".to_string(),
    )
}

fn invalid_comparison() -> FormulaOutcome {
    FormulaOutcome::formula_level(
        "InvalidFormula",
        "Comparison formula must be 'column_name <operator> operand'".to_string(),
    )
}

fn evaluate_comparison(
    frame: &TypedFrame,
    target: &str,
    target_index: usize,
    formula: &str,
) -> FormulaOutcome {
    let text = formula.trim();

    // Left side: a quoted reference to the target column.
    let Some(close) = text.strip_prefix('\'').and_then(|rest| rest.find('\'')) else {
        return invalid_comparison();
    };
    let (left, rest) = text.split_at(close + 2);
    if quoted_name(left).as_deref() != Some(target) {
        return invalid_comparison();
    }

    let rest = rest.trim_start();
    let Some((symbol, op)) = COMPARISON_OPERATORS
        .iter()
        .find(|(symbol, _)| rest.starts_with(symbol))
        .copied()
    else {
        return invalid_comparison();
    };

    let operand = rest[symbol.len()..].trim();
    if operand.is_empty() {
        return invalid_comparison();
    }

    let formula_tag = format!("{}_Formula", target);
    let type_tag = format!("{}_DataType", target);
    let mut locations = Vec::new();

    if operand.starts_with('\'') {
        let Some(second) = quoted_name(operand) else {
            return invalid_comparison();
        };
        let Some(second_index) = frame.find_column(&second) else {
            return FormulaOutcome::formula_level(
                "ColumnNotFound",
                format!("Second column '{}' not found in data", second),
            );
        };

        for (i, row) in frame.rows().enumerate() {
            let left_cell = &row[target_index];
            let right_cell = &row[second_index];
            let left_text = left_cell.to_text();
            let right_text = right_cell.to_text();

            if is_missing(left_cell) {
                locations.push(ErrorLocation::new(
                    i + 1,
                    NULL_VALUE,
                    &formula_tag,
                    format!("Value is null in column {}", target),
                ));
                continue;
            }
            if is_missing(right_cell) {
                locations.push(ErrorLocation::new(
                    i + 1,
                    &left_text,
                    &formula_tag,
                    format!("Value is null in column {}", second),
                ));
                continue;
            }

            match (parse_number(&left_text), parse_number(&right_text)) {
                (Some(l), Some(r)) => {
                    if !op.holds(l, r) {
                        locations.push(ErrorLocation::new(
                            i + 1,
                            &left_text,
                            &formula_tag,
                            format!("Failed comparison: {} {} {}", left_text, symbol, right_text),
                        ));
                    }
                }
                _ => locations.push(ErrorLocation::new(
                    i + 1,
                    &left_text,
                    &type_tag,
                    format!(
                        "Invalid numeric value in column {}: {} or {}: {}",
                        target, left_text, second, right_text
                    ),
                )),
            }
        }
    } else {
        let Some(constant) = parse_number(operand) else {
            return FormulaOutcome::formula_level(
                "InvalidOperand",
                format!("Invalid operand for comparison: {}", operand),
            );
        };

        for (i, cell) in frame.column(target_index).enumerate() {
            if is_missing(cell) {
                locations.push(ErrorLocation::new(i + 1, NULL_VALUE, &formula_tag, "Value is null"));
                continue;
            }

            let text = cell.to_text();
            match parse_number(&text) {
                Some(value) => {
                    if !op.holds(value, constant) {
                        locations.push(ErrorLocation::new(
                            i + 1,
                            &text,
                            &formula_tag,
                            format!("Failed comparison: {} {} {:?}", text, symbol, constant),
                        ));
                    }
                }
                None => locations.push(ErrorLocation::new(
                    i + 1,
                    &text,
                    &type_tag,
                    format!("Invalid numeric value in column {}: {}", target, text),
                )),
            }
        }
    }

    FormulaOutcome::from_locations(locations)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(headers: &[&str], rows: &[Vec<&str>]) -> TypedFrame {
        TypedFrame::from_strings(headers, rows)
    }

    fn eval(frame: &TypedFrame, column: &str, formula: &str) -> FormulaOutcome {
        evaluate_column_rule(frame, column, formula, &FormulaOptions::default())
    }

    #[test]
    fn test_comparison_with_constant() {
        let f = frame(&["score"], &[vec!["49"], vec!["50"], vec!["51"]]);
        let outcome = eval(&f, "score", "'score' >= 50");

        assert!(!outcome.valid);
        assert_eq!(
            outcome.locations,
            vec![ErrorLocation::new(1, "49", "score_Formula", "Failed comparison: 49 >= 50.0")]
        );
    }

    #[test]
    fn test_comparison_with_column() {
        let f = frame(
            &["Start", "End"],
            &[vec!["1", "5"], vec!["7", "3"], vec!["", "1"], vec!["2", ""], vec!["x", "1"]],
        );
        let outcome = eval(&f, "Start", "'start' < 'end'");

        let reasons: Vec<(usize, &str, &str)> = outcome
            .locations
            .iter()
            .map(|l| (l.row, l.value.as_str(), l.reason.as_str()))
            .collect();
        assert_eq!(
            reasons,
            vec![
                (2, "7", "Failed comparison: 7 < 3"),
                (3, "NULL", "Value is null in column start"),
                (4, "2", "Value is null in column end"),
                (5, "x", "Invalid numeric value in column start: x or end: 1"),
            ]
        );
        assert_eq!(outcome.locations[3].rule_failed, "start_DataType");
    }

    #[test]
    fn test_comparison_nulls_and_text() {
        let f = frame(&["score"], &[vec![""], vec!["abc"]]);
        let outcome = eval(&f, "score", "'score' > 0");

        assert_eq!(outcome.locations[0], ErrorLocation::new(1, "NULL", "score_Formula", "Value is null"));
        assert_eq!(
            outcome.locations[1],
            ErrorLocation::new(2, "abc", "score_DataType", "Invalid numeric value in column score: abc")
        );
    }

    #[test]
    fn test_arithmetic_match() {
        let f = frame(&["a", "b", "total"], &[vec!["2", "3", "5"], vec!["1.5", "1", "2.5"]]);
        let outcome = eval(&f, "total", "'total' = 'a' + 'b'");
        assert!(outcome.valid, "{:?}", outcome.locations);
    }

    #[test]
    fn test_arithmetic_mismatch() {
        let f = frame(&["a", "b", "total"], &[vec!["2", "3", "6"]]);
        let outcome = eval(&f, "total", "'total' = 'a' + 'b'");

        assert_eq!(
            outcome.locations,
            vec![ErrorLocation::new(
                1,
                "6",
                "total_Formula",
                "Data Error: total (6) does not match formula 'a' + 'b' (5.0)"
            )]
        );
    }

    #[test]
    fn test_arithmetic_tolerance_both_branches() {
        let within = frame(&["a", "b", "total"], &[vec!["2.00000000005", "3", "5"]]);
        assert!(eval(&within, "total", "'total' = 'a' + 'b'").valid);

        let beyond = frame(&["a", "b", "total"], &[vec!["2.000000001", "3", "5"]]);
        let outcome = eval(&beyond, "total", "'total' = 'a' + 'b'");
        assert_eq!(outcome.locations.len(), 1);
        assert_eq!(outcome.locations[0].rule_failed, "total_Formula");
    }

    #[test]
    fn test_arithmetic_precheck_skips_rows() {
        let f = frame(
            &["a", "b", "total"],
            &[vec!["", "3", "3"], vec!["x", "1", "1"], vec!["1", "1", "2"]],
        );
        let outcome = eval(&f, "total", "'total' = 'a' + 'b'");

        assert_eq!(
            outcome.locations,
            vec![
                ErrorLocation::new(1, "NULL", "total_Formula", "Value is null or empty in column a"),
                ErrorLocation::new(2, "x", "total_DataType", "Invalid numeric value in column a: x"),
            ]
        );
    }

    #[test]
    fn test_arithmetic_evaluation_error_per_row() {
        let f = frame(&["a", "b", "ratio"], &[vec!["1", "0", "1"], vec!["4", "2", "2"]]);
        let outcome = eval(&f, "ratio", "'ratio' = 'a' / 'b'");

        assert_eq!(
            outcome.locations,
            vec![ErrorLocation::new(
                1,
                "",
                "FormulaEvaluation",
                "Error evaluating formula for row 1: float division by zero"
            )]
        );
    }

    #[test]
    fn test_malformed_expression_fails_every_row() {
        let f = frame(&["a", "total"], &[vec!["1", "1"], vec!["2", "2"]]);
        let outcome = eval(&f, "total", "'total' = 'a' +");

        assert_eq!(outcome.locations.len(), 2);
        assert!(outcome.locations.iter().all(|l| l.rule_failed == "FormulaEvaluation"));
    }

    #[test]
    fn test_logic_keywords_in_expression() {
        let f = frame(&["a", "b", "flag"], &[vec!["3", "0", "1"], vec!["0", "0", "0"]]);
        let outcome = eval(&f, "flag", "'flag' = 'a' > 1 AND 'b' < 1");
        assert!(outcome.valid, "{:?}", outcome.locations);
    }

    #[test]
    fn test_formula_level_findings() {
        let f = frame(&["a", "total"], &[vec!["1", "1"]]);

        let missing = eval(&f, "nope", "'nope' > 1");
        assert_eq!(missing.locations, vec![ErrorLocation::new(0, "", "ColumnNotFound", "Column 'nope' not found in data")]);

        let referenced = eval(&f, "total", "'total' = 'a' + 'c'");
        assert_eq!(referenced.locations[0].reason, "Referenced column 'c' not found in data");

        let second = eval(&f, "total", "'total' > 'c'");
        assert_eq!(second.locations[0].reason, "Second column 'c' not found in data");

        let wrong_target = eval(&f, "total", "'a' = 'total'");
        assert_eq!(wrong_target.locations[0].rule_failed, "InvalidFormula");

        let bad_shape = eval(&f, "total", "total > 1");
        assert_eq!(
            bad_shape.locations[0].reason,
            "Comparison formula must be 'column_name <operator> operand'"
        );

        let bad_operand = eval(&f, "total", "'total' > abc");
        assert_eq!(
            bad_operand.locations,
            vec![ErrorLocation::new(0, "", "InvalidOperand", "Invalid operand for comparison: abc")]
        );
        assert!(!bad_operand.valid);
    }

    #[test]
    fn test_case_insensitive_columns() {
        let f = frame(&["Score"], &[vec!["10"]]);
        assert!(eval(&f, "SCORE", "'Score' >= 5").valid);
    }

    #[test]
    fn test_referenced_columns_deduplicated() {
        assert_eq!(referenced_columns("'b' + 'A ' * 'b'"), vec!["b", "a"]);
    }
}
