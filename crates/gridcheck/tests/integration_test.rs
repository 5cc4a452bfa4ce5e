//! Integration tests for Gridcheck.

use std::io::Write;
use tempfile::NamedTempFile;

use gridcheck::catalog::RuleDescriptor;
use gridcheck::inference::detect_type;
use gridcheck::transform::{Corrections, apply_corrections, transform_column_dates};
use gridcheck::{
    Cell, ColumnRules, ErrorLocation, Gridcheck, GridcheckError, InMemoryCatalog, TypeTag,
    TypedFrame,
};

/// Helper to create a temporary file with given content and extension.
fn create_test_file(content: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

fn load_frame(gridcheck: &Gridcheck, content: &str, suffix: &str) -> TypedFrame {
    let file = create_test_file(content, suffix);
    let (workbook, _) = gridcheck.load(file.path()).expect("Load failed");
    let sheet = workbook.values().next().expect("No sheet");
    gridcheck.prepare(sheet).expect("Prepare failed").0
}

// =============================================================================
// Ingestion Tests
// =============================================================================

#[test]
fn test_load_csv_metadata() {
    let file = create_test_file("Name,Age\nJohn,25\nJane,abc\n", ".csv");
    let (workbook, source) = Gridcheck::new().load(file.path()).unwrap();

    assert_eq!(workbook.len(), 1);
    assert_eq!(source.format, "csv");
    assert_eq!(source.delimiter, Some(','));
    assert_eq!(source.sheets, vec!["Sheet1"]);
    assert!(source.hash.starts_with("sha256:"));
}

#[test]
fn test_semicolon_delimited_txt() {
    let gridcheck = Gridcheck::new();
    let frame = load_frame(&gridcheck, "id;city\n1;Paris\n2;Lyon\n", ".txt");

    assert_eq!(frame.headers, vec!["id", "city"]);
    assert_eq!(frame.row_count(), 2);
    assert_eq!(frame.get(1, 1), Some(&Cell::from("Lyon")));
}

#[test]
fn test_unsupported_extension() {
    let file = create_test_file("a,b\n", ".json");
    let err = Gridcheck::new().load(file.path()).unwrap_err();
    assert!(matches!(err, GridcheckError::UnsupportedFileType(ref ext) if ext == "json"));
}

#[test]
fn test_empty_text_file() {
    let file = create_test_file("  \n\n", ".csv");
    let err = Gridcheck::new().load(file.path()).unwrap_err();
    assert!(matches!(err, GridcheckError::EmptyFile(_)));
}

#[test]
fn test_corrupt_workbook() {
    let file = create_test_file("this is not a zip archive", ".xlsx");
    let err = Gridcheck::new().load(file.path()).unwrap_err();
    assert!(matches!(err, GridcheckError::FileRead { .. }));
}

// =============================================================================
// Validation Scenarios
// =============================================================================

#[test]
fn test_int_rule_on_csv() {
    let gridcheck = Gridcheck::new();
    let frame = load_frame(&gridcheck, "Name,Age\nJohn,25\nJane,abc", ".csv");

    let result = gridcheck.validate(&frame, "Age", "Int").unwrap();
    assert_eq!(result.error_count(), 1);
    assert_eq!(
        result.locations(),
        &[ErrorLocation::new(2, "abc", "Int", "Must be an integer")]
    );
}

#[test]
fn test_email_rule() {
    let gridcheck = Gridcheck::new();
    let frame = TypedFrame::from_strings(&["email"], &[vec!["a@b.com"], vec!["bad-email"]]);

    let result = gridcheck.validate(&frame, "email", "Email").unwrap();
    assert_eq!(result.error_count(), 1);
    assert_eq!(result.locations()[0].row, 2);
    assert_eq!(result.locations()[0].reason, "Invalid email format");
}

#[test]
fn test_valid_column_has_no_findings() {
    let gridcheck = Gridcheck::new();
    let frame = TypedFrame::from_strings(
        &["email"],
        &[vec!["a@b.com"], vec!["first.last+tag@example.org"]],
    );

    let result = gridcheck.validate(&frame, "email", "Email").unwrap();
    assert_eq!(result.error_count(), 0);
    assert!(result.locations().is_empty());
}

#[test]
fn test_type_detection_scenarios() {
    assert_eq!(detect_type(&["true", "0", "1"]), TypeTag::Boolean);
    assert_eq!(detect_type(&["0", "1", "2"]), TypeTag::Int);
    // "true" is not an integer, so the Int test fails and Alphanumeric wins.
    assert_eq!(detect_type(&["true", "0", "1", "2"]), TypeTag::Alphanumeric);
}

#[test]
fn test_comparison_formula_scenario() {
    let gridcheck = Gridcheck::new();
    let frame = TypedFrame::from_strings(&["score"], &[vec!["49"], vec!["50"], vec!["51"]]);

    let outcome = gridcheck.evaluate_formula(&frame, "score", "'score' >= 50");
    assert!(!outcome.valid);
    assert_eq!(outcome.locations.len(), 1);
    assert_eq!(outcome.locations[0].row, 1);
    assert_eq!(outcome.locations[0].value, "49");
}

#[test]
fn test_unknown_rule_fails_closed() {
    let gridcheck = Gridcheck::new();
    let frame = TypedFrame::from_strings(&["code"], &[vec!["x"]]);

    let err = gridcheck.validate(&frame, "code", "Postcode").unwrap_err();
    assert!(matches!(err, GridcheckError::UnknownRule(_)));
}

// =============================================================================
// Catalog-Driven Rules
// =============================================================================

fn custom_catalog() -> InMemoryCatalog {
    let mut catalog = InMemoryCatalog::with_defaults();
    catalog.insert(
        RuleDescriptor::builtin("Date(MM/DD/YYYY)", "{}").with_source_format("MM/DD/YYYY"),
    );
    catalog.insert(RuleDescriptor::custom(
        "IdOrNumber",
        r#"{"logic": "OR", "base_rules": ["Int", "Alphanumeric"]}"#,
    ));
    catalog.insert(RuleDescriptor::custom("TotalCheck", "'total' = 'a' + 'b'"));
    catalog
}

#[test]
fn test_whole_frame_with_catalog_rules() {
    let gridcheck = Gridcheck::new().with_catalog(custom_catalog());
    let frame = TypedFrame::from_strings(
        &["id", "joined", "a", "b", "total"],
        &[
            vec!["A1", "12/31/2023", "1", "2", "3"],
            vec!["B-2", "2023-12-31", "2", "2", "5"],
        ],
    );

    let mut rules = ColumnRules::new();
    rules.insert("id".to_string(), vec!["IdOrNumber".to_string()]);
    rules.insert("joined".to_string(), vec!["Date(MM/DD/YYYY)".to_string()]);
    rules.insert("total".to_string(), vec!["TotalCheck".to_string()]);

    let report = gridcheck.validate_frame(&frame, &rules).unwrap();
    assert_eq!(report.rules_checked, 3);
    // "A1" passes the OR but its failing Int branch is still reported; "B-2" fails both.
    let id_rows: Vec<usize> = report.column_errors("id").iter().map(|l| l.row).collect();
    assert_eq!(id_rows, vec![1, 2, 2]);
    assert_eq!(report.column_errors("joined")[0].row, 2);
    assert_eq!(report.column_errors("total")[0].rule_failed, "total_Formula");
    assert_eq!(report.total_errors(), 5);
}

#[test]
fn test_catalog_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rules.json");
    custom_catalog().save(&path).unwrap();

    let loaded = InMemoryCatalog::load(&path).unwrap();
    assert!(loaded.get("IdOrNumber").is_some_and(|d| d.is_custom));
    assert_eq!(loaded.len(), custom_catalog().len());
}

// =============================================================================
// Correction Loop
// =============================================================================

#[test]
fn test_correct_then_revalidate() {
    let gridcheck = Gridcheck::new();
    let mut frame = load_frame(&gridcheck, "Name,Age\nJohn,25\nJane,abc\n", ".csv");
    assert_eq!(gridcheck.validate(&frame, "Age", "Int").unwrap().error_count(), 1);

    let mut corrections = Corrections::new();
    corrections.insert(
        "Age".to_string(),
        [("1".to_string(), "31".to_string())].into_iter().collect(),
    );
    assert_eq!(apply_corrections(&mut frame, &corrections), 1);
    assert!(gridcheck.validate(&frame, "Age", "Int").unwrap().is_valid());

    let row = frame.row(1).unwrap().to_vec();
    let checks = vec![
        ("Name".to_string(), "Required".to_string()),
        ("Age".to_string(), "Int".to_string()),
    ];
    let outcome = gridcheck.validate_row(&frame.headers, &row, &checks);
    assert!(outcome.valid);
    assert_eq!(outcome.rules_checked, 2);
}

#[test]
fn test_transform_dates_in_frame() {
    let mut frame = TypedFrame::from_strings(&["joined"], &[vec!["31-12-2023"], vec!["01-02-2024"]]);
    let changed = transform_column_dates(&mut frame, "joined", "DD-MM-YYYY", "YYYY/MM/DD").unwrap();

    assert_eq!(changed, 2);
    assert_eq!(frame.get(1, 0), Some(&Cell::from("2024/02/01")));
}
