//! Tests for typed dataset loading.

use std::fs;
use std::path::PathBuf;

use dash_ingest::{CsvDataSource, DataSource, normalize_numeric};
use dash_model::{DashError, DatasetKind, fields};
use proptest::prelude::*;
use tempfile::TempDir;

fn write_csv(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write csv");
    path
}

#[test]
fn loads_household_income_with_separators() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_csv(
        &dir,
        "household_income.csv",
        "Household Type,Year,Median Income(dollars)\n\
         Family households,2023,\"96,922\"\n\
         Married-couple,2023,\"1,119,100\"\n",
    );
    let source = CsvDataSource::new();
    let dataset = source
        .load_kind(&path, DatasetKind::HouseholdIncome)
        .expect("load");

    assert_eq!(dataset.len(), 2);
    assert!(dataset.issues.is_empty());
    assert_eq!(dataset.records[0].number(fields::MEDIAN_INCOME), Some(96_922.0));
    assert_eq!(dataset.records[1].number(fields::MEDIAN_INCOME), Some(1_119_100.0));
    assert_eq!(dataset.records[0].label(fields::CENSUS_YEAR).as_deref(), Some("2023"));
    assert_eq!(
        dataset.records[1].text(fields::HOUSEHOLD_TYPE),
        Some("Married-couple")
    );
}

#[test]
fn malformed_numbers_degrade_to_excluded_sentinel() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_csv(
        &dir,
        "gsp.csv",
        "State,Year,GSP\nOhio,2000,410.5\nOhio,2001,n/a\nOhio,2002,\n",
    );
    let dataset = CsvDataSource::new()
        .load_kind(&path, DatasetKind::Gsp)
        .expect("load keeps the dataset");

    assert_eq!(dataset.len(), 3);
    assert_eq!(dataset.issues.len(), 1);
    assert_eq!(dataset.issues[0].row, 2);
    assert_eq!(dataset.issues[0].field, fields::GSP);
    assert_eq!(dataset.issues[0].raw, "n/a");
    assert_eq!(dataset.records[1].number(fields::GSP), None);
    assert!(dataset.records[2].get(fields::GSP).is_some_and(|v| v.is_missing()));
}

#[test]
fn missing_required_column_is_schema_mismatch() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_csv(&dir, "gsp.csv", "State,Year\nOhio,2000\n");
    let err = CsvDataSource::new()
        .load_kind(&path, DatasetKind::Gsp)
        .expect_err("GSP column missing");
    match err {
        DashError::SchemaMismatch { field, .. } => assert_eq!(field, "GSP"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn column_blank_in_every_record_is_schema_mismatch() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_csv(&dir, "gsp.csv", "State,Year,GSP\nOhio,2000,\nUtah,2000,\n");
    let err = CsvDataSource::new()
        .load_kind(&path, DatasetKind::Gsp)
        .expect_err("GSP never present");
    assert!(matches!(err, DashError::SchemaMismatch { .. }));
}

#[test]
fn missing_file_is_data_unavailable() {
    let dir = TempDir::new().expect("temp dir");
    let err = CsvDataSource::new()
        .load_kind(&dir.path().join("absent.csv"), DatasetKind::Gsp)
        .expect_err("no file");
    assert!(matches!(err, DashError::DataUnavailable { .. }));
}

#[test]
fn cache_reuses_unchanged_files_and_reloads_edits() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_csv(&dir, "gsp.csv", "State,Year,GSP\nOhio,2000,1\n");
    let source = CsvDataSource::new();

    let first = source.load_kind(&path, DatasetKind::Gsp).expect("load");
    let second = source.load_kind(&path, DatasetKind::Gsp).expect("load");
    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert_eq!(source.cached_len(), 1);

    fs::write(&path, "State,Year,GSP\nOhio,2000,1\nOhio,2001,2\n").expect("rewrite");
    let third = source.load_kind(&path, DatasetKind::Gsp).expect("reload");
    assert_eq!(third.len(), 2);
    assert!(!std::sync::Arc::ptr_eq(&first, &third));
}

proptest! {
    #[test]
    fn grouped_integers_normalize_to_their_value(n in 0u64..10_000_000_000) {
        let digits = n.to_string();
        let mut grouped = String::new();
        for (idx, ch) in digits.chars().enumerate() {
            if idx > 0 && (digits.len() - idx) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        prop_assert_eq!(normalize_numeric(&grouped).as_f64(), Some(n as f64));
    }
}
