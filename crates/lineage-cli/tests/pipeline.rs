//! End-to-end tests for the generation pipeline.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use lineage_cli::config::{FolderConfig, OutputLayout, RunConfig};
use lineage_cli::pipeline::{PipelineContext, prepare_output_folders, process_schema, run_legacy};
use lineage_ingest::{IngestError, RawSheet};
use lineage_model::{FieldCatalogEntry, LegacyCode, SchemaVariant};
use lineage_report::QualitySettings;
use serde_json::Value;

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|cell| (*cell).to_string()).collect()
}

fn lineage_sheet() -> RawSheet {
    RawSheet::new(
        "Linaje RUU",
        vec![
            row(&[
                "Tabla Legacy VM [FUENTE]", "", "", "", "", "LANDING", "", "", "", "STAGING", "",
                "", "",
            ]),
            row(&[
                "Nombre Vista", "Nombre Campo", "Tipo de dato", "Obligatorio", "Comentarios",
                "Nombre Campo", "Tipo de dato", "Obligatorio", "Comentarios", "Campo",
                "Tipo de dato", "Obligatorio", "Comentarios",
            ]),
            row(&[
                "APET_VM_X", "ID", "NUMBER(10)", "S", "", "ID", "NUMBER(10)", "S", "", "ID",
                "NUMBER", "S", "",
            ]),
            row(&[
                "", "NOMBRE", "VARCHAR2(50)", "N", "", "NOMBRE", "VARCHAR2(50)", "N", "",
                "NOMBRE", "VARCHAR2(50)", "N", "",
            ]),
        ],
    )
}

fn catalog() -> Vec<FieldCatalogEntry> {
    vec![
        FieldCatalogEntry::new("RUU", "LEGADO_VM_X", "ID", "T_PACIENTE")
            .with_primary_key(true)
            .with_check_field_type("NUMBER"),
        FieldCatalogEntry::new("RUU", "LEGADO_VM_X", "NOMBRE", "T_PACIENTE")
            .with_field_length("50"),
        FieldCatalogEntry::new("RUU", "LEGADO_VM_X", "CD_ORIGEN", "T_PACIENTE")
            .with_field_type("STRING")
            .with_field_length("10"),
    ]
}

fn layout(root: &Path) -> OutputLayout {
    let folders = FolderConfig {
        output_root: root.to_path_buf(),
        ..FolderConfig::default()
    };
    OutputLayout::new(&folders, LegacyCode::Apet)
}

#[test]
fn generates_all_artifacts_for_a_view() {
    let dir = tempfile::tempdir().expect("tempdir");
    let layout = layout(dir.path());
    prepare_output_folders(&layout).expect("prepare folders");
    let quality = QualitySettings::default();
    let context = PipelineContext {
        legacy: LegacyCode::Apet,
        layout: &layout,
        quality: &quality,
        dry_run: false,
    };

    let views = process_schema(&context, SchemaVariant::Ruu, &catalog(), &[lineage_sheet()])
        .expect("process schema");

    assert_eq!(views.len(), 1);
    let view = &views[0];
    assert_eq!(view.legacy_view, "APET_VM_X");
    assert_eq!(view.target_table, "T_PACIENTE");
    assert_eq!(view.catalog_fields, 3);
    assert_eq!(view.matched_legacy, 2);
    assert_eq!(view.matched_landing, 2);
    assert_eq!(view.replication_rules, 7);

    let outputs = view.outputs.as_ref().expect("outputs written");
    assert_eq!(
        outputs.replication,
        dir.path().join("dmstask/apet/t_paciente_apet.json")
    );
    let rules: Value = serde_json::from_str(
        &std::fs::read_to_string(&outputs.replication).expect("read rules"),
    )
    .expect("parse rules");
    let include = &rules["rules"][2];
    assert_eq!(include["rule-action"], "include-column");
    assert_eq!(include["object-locator"]["table-name"], "LEGADO_VM_X");
    assert_eq!(rules["rules"][1]["object-locator"]["table-name"], "LEGADO_VM_X");
    assert_eq!(rules["rules"][1]["value"], "t_paciente");
    assert_eq!(include["object-locator"]["column-name"], "ID");
    assert_eq!(rules["rules"][4]["rule-action"], "add-column");

    assert_eq!(outputs.quality.len(), 3);
    let dev = dir
        .path()
        .join("dataquality/APET/ruleset_01_stg_T_PACIENTE/value-dev.txt");
    let text = std::fs::read_to_string(dev).expect("read quality rules");
    assert!(text.contains("ColumnExists \"ID\""));
    assert!(text.contains("IsUnique \"ID\""));
    assert!(text.contains("ColumnLength \"NOMBRE\" <= 50.0"));
    assert!(!text.contains("ColumnExists \"CD_ORIGEN\""));

    let governance = dir.path().join("government/APET/t_paciente_error.csv");
    assert_eq!(outputs.governance.errors, governance);
    let csv = std::fs::read_to_string(governance).expect("read governance");
    assert_eq!(csv.lines().count(), 1 + 3 + 5);
    assert!(csv.contains("DBA_APET;T_PACIENTE;ID;ID;NUMBER;int;int;;10;N;;True;True"));
}

#[test]
fn dry_run_writes_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let layout = layout(dir.path());
    let quality = QualitySettings::default();
    let context = PipelineContext {
        legacy: LegacyCode::Apet,
        layout: &layout,
        quality: &quality,
        dry_run: true,
    };

    let views = process_schema(&context, SchemaVariant::Ruu, &catalog(), &[lineage_sheet()])
        .expect("process schema");

    assert_eq!(views.len(), 1);
    assert!(views[0].outputs.is_none());
    assert!(!layout.replication.exists());
}

#[test]
fn schema_without_sheet_is_skipped() {
    let dir = tempfile::tempdir().expect("tempdir");
    let layout = layout(dir.path());
    let quality = QualitySettings::default();
    let context = PipelineContext {
        legacy: LegacyCode::Apet,
        layout: &layout,
        quality: &quality,
        dry_run: true,
    };

    let views = process_schema(&context, SchemaVariant::Russ, &catalog(), &[lineage_sheet()])
        .expect("process schema");
    assert!(views.is_empty());
}

#[test]
fn preparation_clears_previous_outputs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let layout = layout(dir.path());
    prepare_output_folders(&layout).expect("prepare folders");
    let stale = layout.governance.join("old.csv");
    std::fs::write(&stale, "x").expect("write stale file");

    prepare_output_folders(&layout).expect("prepare folders again");

    assert!(!stale.exists());
    for folder in layout.legacy_folders() {
        assert!(folder.is_dir());
    }
}

#[test]
fn missing_lineage_file_is_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");
    let lineage_folder = dir.path().join("lineage");
    std::fs::create_dir_all(&lineage_folder).expect("create lineage folder");
    std::fs::write(lineage_folder.join("Linaje_APMV_v1.0.xlsx"), "").expect("write file");

    let config = RunConfig::default().with_overrides(
        Some(lineage_folder),
        Some(dir.path().join("fields.csv")),
        Some(dir.path().join("out")),
    );
    let error = run_legacy(&config, LegacyCode::Apet, true).expect_err("no APET lineage");
    let ingest = error
        .downcast_ref::<IngestError>()
        .expect("ingest error in chain");
    assert!(matches!(ingest, IngestError::LineageNotFound { .. }));
}

const CATALOG: &str = "\
schema;legacy_view;field_name;target_table;primary_key;valores_formateados;field_length;field_type;check_field_type
ruu;LEGADO_VM_X;ID;T_PACIENTE;Y;;10;NUMERIC;NUMBER
;;NOMBRE;;N;'H', 'M';50;STRING;VARCHAR2(50)
;;CD_ORIGEN;;N;;10;STRING;VARCHAR2(10)
russ;LEGADO_VM_Y;CODIGO;T_EPISODIO;N;;10,2;NUMERIC;NUMBER(10,2)
";

fn workbook_fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../lineage-ingest/tests/fixtures/Linaje_APET_v1.0.xlsx")
}

/// Lay out a lineage folder holding `workbook` and a config pointing at it.
fn run_config(root: &Path, workbook: Option<&Path>, with_catalog: bool) -> RunConfig {
    let lineage_folder = root.join("lineage");
    std::fs::create_dir_all(&lineage_folder).expect("create lineage folder");
    let target = lineage_folder.join("Linaje_APET_v1.0.xlsx");
    match workbook {
        Some(source) => {
            std::fs::copy(source, &target).expect("copy workbook");
        }
        None => std::fs::write(&target, "not a zip archive").expect("write broken workbook"),
    }
    let catalog = root.join("fields.csv");
    if with_catalog {
        std::fs::write(&catalog, CATALOG).expect("write catalog");
    }
    RunConfig::default().with_overrides(Some(lineage_folder), Some(catalog), Some(root.join("out")))
}

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().expect("log buffer").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn with_error_logs<T>(run: impl FnOnce() -> T) -> (T, String) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::ERROR)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, run);
    let text = String::from_utf8_lossy(&logs.0.lock().expect("log buffer")).into_owned();
    (result, text)
}

#[test]
fn run_legacy_writes_artifacts_from_workbook() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = run_config(dir.path(), Some(&workbook_fixture()), true);

    let report = run_legacy(&config, LegacyCode::Apet, false).expect("run legacy");

    assert!(report.lineage_file.ends_with("Linaje_APET_v1.0.xlsx"));
    assert_eq!(report.skipped_schemas, vec![SchemaVariant::Russ]);
    assert_eq!(report.views.len(), 1);
    let view = &report.views[0];
    assert_eq!(view.schema, SchemaVariant::Ruu);
    assert_eq!(view.matched_legacy, 2);
    assert_eq!(view.replication_rules, 7);

    let out = dir.path().join("out");
    let rules: Value = serde_json::from_str(
        &std::fs::read_to_string(out.join("dmstask/apet/t_paciente_apet.json"))
            .expect("read rules"),
    )
    .expect("parse rules");
    assert_eq!(rules["rules"][1]["object-locator"]["table-name"], "LEGADO_VM_X");
    assert_eq!(rules["rules"][4]["rule-action"], "add-column");
    assert_eq!(rules["rules"][4]["value"], "CD_ORIGEN");

    for env in ["dev", "pre", "pro"] {
        let path = out.join(format!(
            "dataquality/APET/ruleset_01_stg_T_PACIENTE/value-{env}.txt"
        ));
        let text = std::fs::read_to_string(path).expect("read quality rules");
        assert!(text.contains("ColumnValues \"NOMBRE\" in ['H', 'M']"));
    }

    let governance =
        std::fs::read_to_string(out.join("government/APET/t_paciente.csv")).expect("read governance");
    assert_eq!(governance.lines().count(), 1 + 3);
    assert!(out.join("government/APET/t_paciente_error.csv").is_file());
}

#[test]
fn unreadable_workbook_is_logged_before_failing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = run_config(dir.path(), None, true);

    let (result, logs) = with_error_logs(|| run_legacy(&config, LegacyCode::Apet, true));

    let error = result.expect_err("broken workbook");
    assert!(matches!(
        error.downcast_ref::<IngestError>(),
        Some(IngestError::Workbook { .. })
    ));
    assert!(logs.contains("lineage workbook unreadable"), "logs: {logs}");
    assert!(logs.contains("legacy=APET"), "logs: {logs}");
}

#[test]
fn missing_catalog_is_logged_with_schema() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = run_config(dir.path(), Some(&workbook_fixture()), false);

    let (result, logs) = with_error_logs(|| run_legacy(&config, LegacyCode::Apet, true));

    assert!(result.is_err());
    assert!(logs.contains("field catalog unreadable"), "logs: {logs}");
    assert!(logs.contains("schema=ruu"), "logs: {logs}");
}
