//! Tests for reading lineage workbooks from disk.

use std::path::{Path, PathBuf};

use lineage_ingest::{IngestError, parse_lineage, read_workbook};
use lineage_model::{LegacyCode, SchemaVariant};

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/Linaje_APET_v1.0.xlsx")
}

#[test]
fn reads_every_worksheet_in_order() {
    let sheets = read_workbook(&fixture()).expect("read workbook");

    let names: Vec<&str> = sheets.iter().map(|sheet| sheet.name.as_str()).collect();
    assert_eq!(names, vec!["Portada", "Linaje RUU"]);
    assert_eq!(sheets[1].rows.len(), 4);
    assert_eq!(sheets[1].width(), 13);
}

#[test]
fn numeric_cells_become_plain_text() {
    let sheets = read_workbook(&fixture()).expect("read workbook");

    assert_eq!(sheets[0].cell(1, 1), "1");
    assert_eq!(sheets[1].cell(3, 4), "50");
}

#[test]
fn merged_cells_are_blank_after_the_first() {
    let sheets = read_workbook(&fixture()).expect("read workbook");
    let lineage = &sheets[1];

    assert_eq!(lineage.cell(0, 0), "Tabla Legacy VM [FUENTE]");
    assert_eq!(lineage.cell(0, 1), "");
    assert_eq!(lineage.cell(0, 5), "LANDING");
    assert_eq!(lineage.cell(2, 0), "APET_VM_X");
    assert_eq!(lineage.cell(3, 0), "");
}

#[test]
fn workbook_sheets_parse_into_lineage() {
    let sheets = read_workbook(&fixture()).expect("read workbook");

    let records = parse_lineage(&sheets, SchemaVariant::Ruu, LegacyCode::Apet);
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].legacy_view, "APET_VM_X");
    assert_eq!(records[1].legacy_field, "NOMBRE");
    assert_eq!(records[1].landing_type.as_deref(), Some("VARCHAR2(50)"));
    assert!(!records[1].landing_obligatory);

    assert!(parse_lineage(&sheets, SchemaVariant::Russ, LegacyCode::Apet).is_empty());
}

#[test]
fn non_workbook_file_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("Linaje_APET_v1.0.xlsx");
    std::fs::write(&path, "not a zip archive").expect("write file");

    let error = read_workbook(&path).expect_err("invalid workbook");
    assert!(matches!(error, IngestError::Workbook { .. }));
}
