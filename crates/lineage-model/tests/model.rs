//! Tests for joined-field accessors and code parsing.

use lineage_model::{
    FieldCatalogEntry, JoinKey, JoinedField, LegacyCode, LineageRecord, ModelError, SchemaVariant,
};

#[test]
fn check_type_prefers_catalog_value() {
    let mut record = LineageRecord::new("APET_VM_X", "ID");
    record.check_field_type = Some("NUMBER(10)".to_string());

    let declared = JoinedField::matched(
        FieldCatalogEntry::new("RUU", "APET_VM_X", "ID", "T_X").with_check_field_type("NUMBER"),
        record.clone(),
    );
    assert_eq!(declared.check_type(), Some("NUMBER"));

    let inherited = JoinedField::matched(
        FieldCatalogEntry::new("RUU", "APET_VM_X", "ID", "T_X"),
        record,
    );
    assert_eq!(inherited.check_type(), Some("NUMBER(10)"));
}

#[test]
fn unmatched_field_is_never_obligatory() {
    let field = JoinedField::unmatched(FieldCatalogEntry::new("RUU", "V", "F", "T"));
    assert!(!field.exists());
    assert!(!field.landing_obligatory());
    assert_eq!(field.check_type(), None);
}

#[test]
fn join_key_reads_the_matching_lineage_column() {
    let record = LineageRecord::new("V", "LEGACY_NAME").with_landing("LANDING_NAME", "DATE", false);
    assert_eq!(JoinKey::LegacyField.lineage_value(&record), Some("LEGACY_NAME"));
    assert_eq!(JoinKey::LandingField.lineage_value(&record), Some("LANDING_NAME"));
    assert_eq!(
        JoinKey::LandingField.lineage_value(&LineageRecord::new("V", "X")),
        None
    );
}

#[test]
fn codes_parse_case_insensitively() {
    assert_eq!("apet".parse::<LegacyCode>().ok(), Some(LegacyCode::Apet));
    assert_eq!(" RUSS ".parse::<SchemaVariant>().ok(), Some(SchemaVariant::Russ));
    assert!(matches!(
        "XYZ".parse::<SchemaVariant>(),
        Err(ModelError::UnknownSchema(_))
    ));
}

#[test]
fn schema_variants_use_their_own_legacy_label() {
    assert_eq!(SchemaVariant::Ruu.legacy_group_label(), "Tabla Legacy VM [FUENTE]");
    assert_eq!(SchemaVariant::Russ.legacy_group_label(), "Tabla Legacy [FUENTE]");
}
