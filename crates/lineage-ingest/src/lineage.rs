//! Lineage sheet normalization.
//!
//! A lineage worksheet has a two-row header: row 0 carries group labels
//! (merged across the columns of each group, so only the first cell is
//! filled) and row 1 carries the per-column sub-labels. Three groups are
//! kept, the schema's legacy group, `LANDING` and `STAGING`, and
//! concatenated positionally into one flat row per legacy field.

use tracing::{debug, warn};

use lineage_model::{LegacyCode, LineageRecord, SchemaVariant};

use crate::workbook::RawSheet;

const LANDING_GROUP: &str = "LANDING";
const STAGING_GROUP: &str = "STAGING";

const LEGACY_OBLIGATORY: &str = "LEGACY_OBLIGATORIO";
const LEGACY_TYPE: &str = "LEGACY_TIPO_DE_DATO";
const LANDING_FIELD: &str = "LANDING_NOMBRE_CAMPO";
const LANDING_TYPE: &str = "LANDING_TIPO_DE_DATO";
const LANDING_OBLIGATORY: &str = "LANDING_OBLIGATORIO";
const STAGING_FIELD: &str = "STAGING_CAMPO";
const STAGING_FIELD_ALT: &str = "STAGING_NOMBRE_CAMPO";
const STAGING_TYPE: &str = "STAGING_TIPO_DE_DATO";
const STAGING_OBLIGATORY: &str = "STAGING_OBLIGATORIO";

/// View names that the source sheets spell in singular form.
const SINGULAR_VIEW_SUFFIXES: [(&str, &str); 2] = [
    ("_VM_HSTA_DET_EPISODIO", "_VM_HSTA_DET_EPISODIOS"),
    ("_VM_HSTA_DET_APUNTE", "_VM_HSTA_DET_APUNTES"),
];

/// Parse the worksheet of `schema` into lineage records.
///
/// Returns an empty vector when no worksheet name contains the schema
/// token; callers treat that as "nothing to generate" for the pair.
pub fn parse_lineage(
    sheets: &[RawSheet],
    schema: SchemaVariant,
    legacy: LegacyCode,
) -> Vec<LineageRecord> {
    let Some(sheet) = sheets.iter().find(|sheet| schema.matches_sheet(&sheet.name)) else {
        warn!(schema = %schema, legacy = %legacy, "no sheet found for schema");
        return Vec::new();
    };
    debug!(schema = %schema, sheet = %sheet.name, "parsing lineage sheet");

    let table = LineageTable::extract(sheet, schema);
    let records = table.into_records(legacy);
    debug!(
        schema = %schema,
        record_count = records.len(),
        "lineage sheet normalized"
    );
    records
}

/// The three extracted column groups, concatenated left to right.
#[derive(Debug, Default)]
struct LineageTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl LineageTable {
    fn extract(sheet: &RawSheet, schema: SchemaVariant) -> Self {
        if sheet.rows.len() < 2 {
            return Self::default();
        }
        let groups = group_labels(sheet);
        let mut selected: Vec<(usize, String)> = Vec::new();
        for (label, prefix) in [
            (schema.legacy_group_label(), "LEGACY"),
            (LANDING_GROUP, LANDING_GROUP),
            (STAGING_GROUP, STAGING_GROUP),
        ] {
            for column in group_columns(&groups, label) {
                let name = format!(
                    "{prefix}_{}",
                    sheet.cell(1, column).to_uppercase().replace(' ', "_")
                );
                selected.push((column, name));
            }
        }

        let rows = sheet.rows[2..]
            .iter()
            .map(|row| {
                selected
                    .iter()
                    .map(|(column, _)| row.get(*column).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();
        Self {
            columns: selected.into_iter().map(|(_, name)| name).collect(),
            rows,
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    fn into_records(mut self, legacy: LegacyCode) -> Vec<LineageRecord> {
        if self.columns.len() < 2 {
            return Vec::new();
        }
        // Merged view-name cells leave the rows below them blank.
        let mut current_view = String::new();
        for row in &mut self.rows {
            if row[0].is_empty() {
                row[0].clone_from(&current_view);
            } else {
                current_view.clone_from(&row[0]);
            }
        }

        let lookup = RecordColumns::locate(&self);
        self.rows
            .iter()
            .filter(|row| !row[1].is_empty())
            .map(|row| lookup.record(row, legacy))
            .collect()
    }
}

/// Top-level header labels with merged (blank) cells filled from the left.
fn group_labels(sheet: &RawSheet) -> Vec<String> {
    let mut labels = Vec::with_capacity(sheet.width());
    let mut last = String::new();
    for column in 0..sheet.width() {
        let label = sheet.cell(0, column);
        if !label.is_empty() {
            last = label.to_string();
        }
        labels.push(last.clone());
    }
    labels
}

/// Columns of one group, minus the group's trailing remarks column.
fn group_columns(groups: &[String], label: &str) -> std::ops::Range<usize> {
    let Some(first) = groups.iter().position(|group| group == label) else {
        return 0..0;
    };
    let count = groups.iter().filter(|group| *group == label).count();
    first..first + count - 1
}

struct RecordColumns {
    legacy_obligatory: Option<usize>,
    legacy_type: Option<usize>,
    landing_field: Option<usize>,
    landing_type: Option<usize>,
    landing_obligatory: Option<usize>,
    staging_field: Option<usize>,
    staging_type: Option<usize>,
    staging_obligatory: Option<usize>,
}

impl RecordColumns {
    fn locate(table: &LineageTable) -> Self {
        Self {
            legacy_obligatory: table.position(LEGACY_OBLIGATORY),
            legacy_type: table.position(LEGACY_TYPE),
            landing_field: table.position(LANDING_FIELD),
            landing_type: table.position(LANDING_TYPE),
            landing_obligatory: table.position(LANDING_OBLIGATORY),
            staging_field: table
                .position(STAGING_FIELD)
                .or_else(|| table.position(STAGING_FIELD_ALT)),
            staging_type: table.position(STAGING_TYPE),
            staging_obligatory: table.position(STAGING_OBLIGATORY),
        }
    }

    fn record(&self, row: &[String], legacy: LegacyCode) -> LineageRecord {
        let text = |idx: Option<usize>| {
            idx.and_then(|idx| row.get(idx))
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };
        let flag = |idx: Option<usize>| text(idx).is_some_and(|value| is_obligatory(&value));
        LineageRecord {
            legacy_view: correct_view_name(row[0].trim(), legacy),
            legacy_field: row[1].trim().to_string(),
            legacy_obligatory: flag(self.legacy_obligatory),
            check_field_type: text(self.legacy_type),
            landing_field: text(self.landing_field),
            landing_type: text(self.landing_type),
            landing_obligatory: flag(self.landing_obligatory),
            staging_field: text(self.staging_field),
            staging_type: text(self.staging_type),
            staging_obligatory: flag(self.staging_obligatory),
        }
    }
}

/// Obligatory cells hold free text such as `Si`/`S`/`No`; any `S` means yes.
pub fn is_obligatory(value: &str) -> bool {
    value.to_uppercase().contains('S')
}

/// Normalize the known singular spellings of plural legacy views.
pub fn correct_view_name(view: &str, legacy: LegacyCode) -> String {
    for (singular, plural) in SINGULAR_VIEW_SUFFIXES {
        if view == format!("{legacy}{singular}") {
            return format!("{legacy}{plural}");
        }
    }
    view.to_string()
}
