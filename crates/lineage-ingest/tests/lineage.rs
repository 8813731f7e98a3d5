//! Tests for lineage sheet normalization.

use lineage_ingest::{RawSheet, parse_lineage};
use lineage_model::{LegacyCode, SchemaVariant};

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|cell| (*cell).to_string()).collect()
}

fn ruu_sheet(name: &str) -> RawSheet {
    RawSheet::new(
        name,
        vec![
            row(&[
                "Tabla Legacy VM [FUENTE]", "", "", "", "", "LANDING", "", "", "", "STAGING", "",
                "", "", "Otros",
            ]),
            row(&[
                "Nombre Vista", "Nombre Campo", "Tipo de dato", "Obligatorio", "Comentarios",
                "Nombre Campo", "Tipo de dato", "Obligatorio", "Comentarios", "Campo",
                "Tipo de dato", "Obligatorio", "Comentarios", "Notas",
            ]),
            row(&[
                "APET_VM_X", "ID", "NUMBER(10)", "Si", "c", "ID", "NUMBER(10)", "S", "c", "ID",
                "NUMBER", "S", "c", "z",
            ]),
            row(&[
                "", "NOMBRE", "VARCHAR2(50)", "No", "", "NOMBRE_LND", "VARCHAR2(50)", "", "",
                "NOMBRE", "VARCHAR2(50)", "No", "", "",
            ]),
            row(&["", "", "", "", "", "", "", "", "", "", "", "", "", ""]),
            row(&[
                "APET_VM_HSTA_DET_EPISODIO", "CODIGO", "DATE", "", "", "", "", "", "", "", "",
                "", "", "",
            ]),
        ],
    )
}

#[test]
fn parses_records_from_matching_sheet() {
    let sheets = vec![
        RawSheet::new("Resumen", vec![row(&["x"])]),
        ruu_sheet("Linaje RUU"),
    ];
    let records = parse_lineage(&sheets, SchemaVariant::Ruu, LegacyCode::Apet);

    assert_eq!(records.len(), 3);
    let id = &records[0];
    assert_eq!(id.legacy_view, "APET_VM_X");
    assert_eq!(id.legacy_field, "ID");
    assert!(id.legacy_obligatory);
    assert_eq!(id.check_field_type.as_deref(), Some("NUMBER(10)"));
    assert_eq!(id.landing_field.as_deref(), Some("ID"));
    assert_eq!(id.landing_type.as_deref(), Some("NUMBER(10)"));
    assert!(id.landing_obligatory);
    assert_eq!(id.staging_field.as_deref(), Some("ID"));
    assert_eq!(id.staging_type.as_deref(), Some("NUMBER"));
    assert!(id.staging_obligatory);
}

#[test]
fn view_name_is_forward_filled() {
    let records = parse_lineage(&[ruu_sheet("ruu")], SchemaVariant::Ruu, LegacyCode::Apet);
    let nombre = &records[1];
    assert_eq!(nombre.legacy_view, "APET_VM_X");
    assert_eq!(nombre.landing_field.as_deref(), Some("NOMBRE_LND"));
    assert!(!nombre.landing_obligatory);
    assert!(!nombre.legacy_obligatory);
}

#[test]
fn blank_cells_become_absent() {
    let records = parse_lineage(&[ruu_sheet("ruu")], SchemaVariant::Ruu, LegacyCode::Apet);
    let codigo = &records[2];
    assert_eq!(codigo.landing_field, None);
    assert_eq!(codigo.landing_type, None);
    assert_eq!(codigo.staging_field, None);
    assert!(!codigo.staging_obligatory);
}

#[test]
fn singular_view_names_are_corrected() {
    let records = parse_lineage(&[ruu_sheet("ruu")], SchemaVariant::Ruu, LegacyCode::Apet);
    assert_eq!(records[2].legacy_view, "APET_VM_HSTA_DET_EPISODIOS");
}

#[test]
fn missing_sheet_yields_no_records() {
    let records = parse_lineage(&[ruu_sheet("ruu")], SchemaVariant::Russ, LegacyCode::Apet);
    assert!(records.is_empty());
}

#[test]
fn russ_sheet_uses_its_own_legacy_label() {
    let mut sheet = ruu_sheet("russ");
    sheet.rows[0][0] = "Tabla Legacy [FUENTE]".to_string();
    let records = parse_lineage(&[sheet], SchemaVariant::Russ, LegacyCode::Apet);
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].legacy_field, "ID");
    assert_eq!(records[0].landing_field.as_deref(), Some("ID"));
}

#[test]
fn vm_label_is_not_read_for_russ() {
    let records = parse_lineage(&[ruu_sheet("russ")], SchemaVariant::Russ, LegacyCode::Apet);
    // Without the legacy group the landing columns lead, so the first landing
    // column plays the view role and the landing type the field role.
    assert_eq!(records[0].legacy_view, "ID");
    assert_eq!(records[0].legacy_field, "NUMBER(10)");
    assert_eq!(records[0].landing_field.as_deref(), Some("ID"));
}

#[test]
fn short_sheet_yields_no_records() {
    let sheet = RawSheet::new("ruu", vec![row(&["Tabla Legacy VM [FUENTE]"])]);
    assert!(parse_lineage(&[sheet], SchemaVariant::Ruu, LegacyCode::Apet).is_empty());
}
