//! Integration tests for measuring and anonymizing datasets.
//!
//! These tests load the CSV fixtures through the public I/O layer and check
//! end-to-end behavior of the anonymizer.

use lex_privacy::io::{read_csv_bytes, read_csv_file, write_csv_bytes};
use lex_privacy::{
    AnonymizationConfig, AnonymizationError, Anonymizer, CellValue, PiiFinding, PiiKind,
    ReportGenerator, anonymize, generalize, measure_k, scan_dataframe,
};
use polars::prelude::*;
use pretty_assertions::assert_eq;
use std::path::PathBuf;

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_csv(filename: &str, text_columns: &[&str]) -> DataFrame {
    read_csv_file(fixtures_path().join(filename), text_columns).expect("Failed to read CSV file")
}

fn load_people() -> DataFrame {
    load_csv("people.csv", &["Pincode"])
}

fn column_strings(df: &DataFrame, name: &str) -> Vec<Option<String>> {
    let series = df.column(name).unwrap().as_materialized_series();
    (0..series.len())
        .map(|i| CellValue::from_any(&series.get(i).unwrap()).to_text())
        .collect()
}

fn config(quasi_identifiers: &[&str], target_k: usize) -> AnonymizationConfig {
    AnonymizationConfig::builder()
        .quasi_identifiers(quasi_identifiers.iter().copied())
        .target_k(target_k)
        .save_to_disk(false)
        .build()
        .unwrap()
}

// ============================================================================
// Worked Examples
// ============================================================================

#[test]
fn test_pincode_generalization() {
    let df = df!["Pincode" => ["560034", "560034", "560091"]].unwrap();

    let result = anonymize(&df, &["Pincode"], 2).unwrap();

    assert_eq!(result.k_before, 1);
    assert!(result.generalized);
    assert_eq!(
        column_strings(&result.anonymized, "Pincode"),
        vec![Some("560***".to_string()); 3]
    );
    assert_eq!(result.k_after, 3);
    assert!(result.target_met());
}

#[test]
fn test_age_generalization_groups_into_ranges() {
    let df = df!["Age" => [25i64, 26, 31]].unwrap();

    let result = anonymize(&df, &["Age"], 2).unwrap();

    assert_eq!(
        column_strings(&result.anonymized, "Age"),
        vec![
            Some("25-29".to_string()),
            Some("25-29".to_string()),
            Some("30-34".to_string()),
        ]
    );
    // "30-34" is still a class of one
    assert_eq!(result.k_after, 1);
    assert!(!result.target_met());
}

#[test]
fn test_email_generalization() {
    assert_eq!(
        generalize(&CellValue::from("john.doe@x.com")),
        CellValue::from("jo***@x.com")
    );
}

#[test]
fn test_already_anonymous_dataset_is_unchanged() {
    let df = load_csv("already_anonymous.csv", &[]);

    let result = anonymize(&df, &["City", "Gender"], 3).unwrap();

    assert_eq!(result.k_before, 5);
    assert_eq!(result.k_after, 5);
    assert!(!result.generalized);
    assert!(result.anonymized.equals_missing(&df));
}

#[test]
fn test_empty_quasi_identifiers_measure_zero() {
    let df = load_people();
    let none: [&str; 0] = [];

    assert_eq!(measure_k(&df, &none).unwrap(), 0);
}

// ============================================================================
// Anonymizer Tests
// ============================================================================

#[test]
fn test_anonymizer_end_to_end() {
    let df = load_people();
    let anonymizer = Anonymizer::new(config(&["Age", "Pincode"], 3)).unwrap();

    let outcome = anonymizer.process(&df).unwrap();
    let summary = &outcome.summary;

    assert_eq!(summary.k_before, 1);
    assert_eq!(summary.k_after, 3);
    assert!(summary.target_met);
    assert!(summary.generalization_applied);
    assert_eq!(summary.classes_after, 2);
    assert_eq!(summary.records_at_risk_after, 0);
    assert!(summary.warnings.is_empty());

    assert_eq!(
        column_strings(&outcome.result.anonymized, "Pincode"),
        vec![Some("560***".to_string()); 6]
    );
    assert_eq!(
        column_strings(&outcome.result.anonymized, "Age"),
        vec![
            Some("25-29".to_string()),
            Some("25-29".to_string()),
            Some("30-34".to_string()),
            Some("30-34".to_string()),
            Some("25-29".to_string()),
            Some("30-34".to_string()),
        ]
    );
}

#[test]
fn test_non_quasi_identifier_columns_untouched() {
    let df = load_people();
    let outcome = Anonymizer::new(config(&["Age", "Pincode"], 3))
        .unwrap()
        .process(&df)
        .unwrap();
    let anonymized = &outcome.result.anonymized;

    assert_eq!(anonymized.shape(), df.shape());
    assert_eq!(anonymized.get_column_names(), df.get_column_names());
    for name in ["Name", "Email", "Phone", "City", "Disease"] {
        assert!(
            anonymized
                .column(name)
                .unwrap()
                .as_materialized_series()
                .equals_missing(df.column(name).unwrap().as_materialized_series()),
            "Column {} should be unchanged",
            name
        );
    }
}

#[test]
fn test_original_is_preserved() {
    let df = load_people();
    let outcome = Anonymizer::new(config(&["Email"], 2))
        .unwrap()
        .process(&df)
        .unwrap();

    assert!(outcome.result.original.equals_missing(&df));
    assert_eq!(
        column_strings(&outcome.result.anonymized, "Email")[0],
        Some("as***@example.com".to_string())
    );
}

#[test]
fn test_k_never_decreases() {
    let df = load_people();
    let selections: [&[&str]; 4] = [&["Age"], &["Pincode"], &["City", "Age"], &["Email", "Disease"]];

    for qi in selections {
        let result = anonymize(&df, qi, 2).unwrap();
        assert!(
            result.k_after >= result.k_before,
            "k decreased for {:?}: {} -> {}",
            qi,
            result.k_before,
            result.k_after
        );
    }
}

#[test]
fn test_target_missed_warns() {
    let df = load_people();
    let outcome = Anonymizer::new(config(&["Name"], 2))
        .unwrap()
        .process(&df)
        .unwrap();

    assert_eq!(outcome.summary.k_after, 1);
    assert!(!outcome.summary.target_met);
    assert!(!outcome.summary.warnings.is_empty());
    assert_eq!(outcome.summary.records_at_risk_after, 6);
}

#[test]
fn test_measure_does_not_generalize() {
    let df = load_people();
    let summary = Anonymizer::new(config(&["Age", "Pincode"], 3))
        .unwrap()
        .measure(&df)
        .unwrap();

    assert_eq!(summary.k_before, 1);
    assert_eq!(summary.k_after, 1);
    assert!(!summary.generalization_applied);
    assert_eq!(summary.records_at_risk_before, 6);
}

#[test]
fn test_unknown_quasi_identifier() {
    let df = load_people();
    let err = Anonymizer::new(config(&["Salary"], 2))
        .unwrap()
        .process(&df)
        .unwrap_err();

    assert!(matches!(err, AnonymizationError::ColumnNotFound(ref name) if name == "Salary"));
    assert!(err.is_input_error());
}

#[test]
fn test_empty_selection_rejected_by_anonymizer() {
    let config = AnonymizationConfig::default();
    assert!(Anonymizer::new(config).is_err());
}

// ============================================================================
// I/O Tests
// ============================================================================

#[test]
fn test_text_columns_change_generalization() {
    let as_text = load_csv("leading_zeros.csv", &["Pincode"]);
    let result = anonymize(&as_text, &["Pincode", "Age"], 3).unwrap();
    assert_eq!(
        column_strings(&result.anonymized, "Pincode"),
        vec![Some("012***".to_string()); 3]
    );
    assert_eq!(result.k_after, 3);

    // Inferred as integers, the codes fall into different numeric ranges
    let inferred = load_csv("leading_zeros.csv", &[]);
    let result = anonymize(&inferred, &["Pincode", "Age"], 3).unwrap();
    assert_eq!(
        column_strings(&result.anonymized, "Pincode"),
        vec![
            Some("12345-12349".to_string()),
            Some("12395-12399".to_string()),
            Some("12300-12304".to_string()),
        ]
    );
    assert_eq!(result.k_after, 1);
}

#[test]
fn test_anonymized_csv_round_trip() {
    let df = load_people();
    let outcome = Anonymizer::new(config(&["Age", "Pincode"], 3))
        .unwrap()
        .process(&df)
        .unwrap();

    let bytes = write_csv_bytes(&outcome.result.anonymized).unwrap();
    let text = String::from_utf8(bytes.clone()).unwrap();
    assert!(text.starts_with("Name,Age,Pincode,Email,Phone,City,Disease\n"));
    assert!(text.contains("Asha Rao,25-29,560***,asha.rao@example.com,9876543210,Bangalore,Flu"));

    let reloaded = read_csv_bytes(&bytes, &["Pincode"]).unwrap();
    assert_eq!(measure_k(&reloaded, &["Age", "Pincode"]).unwrap(), 3);
}

#[test]
fn test_report_written_for_run() {
    let df = load_people();
    let outcome = Anonymizer::new(config(&["Age", "Pincode"], 3))
        .unwrap()
        .process(&df)
        .unwrap();

    let dir = std::env::temp_dir().join(format!("lex-privacy-it-{}", std::process::id()));
    let generator = ReportGenerator::new(dir.clone(), Some("people_k3".to_string()));
    let dataset = generator.write_dataset(&outcome.result.anonymized).unwrap();
    assert!(dataset.ends_with("people_k3.csv"));

    let report = ReportGenerator::build_report(
        "people.csv",
        dataset.to_str(),
        &outcome.summary,
        &outcome.result.quasi_identifiers,
        &[],
    );
    let path = generator.write_report_to_file(&report, "people").unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();

    assert_eq!(json["k_before"], 1);
    assert_eq!(json["k_after"], 3);
    assert_eq!(json["target_met"], true);
    assert_eq!(json["quasi_identifiers"], serde_json::json!(["Age", "Pincode"]));

    std::fs::remove_dir_all(&dir).unwrap();
}

// ============================================================================
// PII Scan Tests
// ============================================================================

#[test]
fn test_pii_scan_on_fixture() {
    let df = load_people();
    let findings = scan_dataframe(&df, 100).unwrap();

    assert_eq!(
        findings,
        vec![
            PiiFinding {
                column: "Email".to_string(),
                kinds: vec![PiiKind::Email],
            },
            PiiFinding {
                column: "Phone".to_string(),
                kinds: vec![PiiKind::Phone],
            },
        ]
    );
}
