//! Field catalog loading.
//!
//! The catalog is a `;`-delimited file listing, per schema and legacy view,
//! every target column with its key flag, allowed values, and declared
//! length and type. Spreadsheet exports leave merged cells blank, so every
//! column is forward-filled before rows are filtered by schema.

use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use lineage_model::{FieldCatalogEntry, SchemaVariant};

use crate::error::{IngestError, Result};

const COL_SCHEMA: &str = "SCHEMA";
const COL_LEGACY_VIEW: &str = "LEGACY_VIEW";
const COL_FIELD_NAME: &str = "FIELD_NAME";
const COL_TARGET_TABLE: &str = "TARGET_TABLE";
const COL_PRIMARY_KEY: &str = "PRIMARY_KEY";
const COL_ALLOWED_VALUES: &str = "VALORES_FORMATEADOS";
const COL_FIELD_LENGTH: &str = "FIELD_LENGTH";
const COL_FIELD_TYPE: &str = "FIELD_TYPE";
const COL_CHECK_FIELD_TYPE: &str = "CHECK_FIELD_TYPE";

/// Load the catalog entries belonging to one schema variant.
pub fn load_catalog(path: &Path, schema: SchemaVariant) -> Result<Vec<FieldCatalogEntry>> {
    let file = std::fs::File::open(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    read_catalog(file, schema, path)
}

/// Parse catalog rows from any reader; `path` is only used in error messages.
pub fn read_catalog<R: Read>(
    reader: R,
    schema: SchemaVariant,
    path: &Path,
) -> Result<Vec<FieldCatalogEntry>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers: Vec<String> = reader
        .headers()
        .map_err(|source| IngestError::CsvParse {
            path: path.to_path_buf(),
            source,
        })?
        .iter()
        .map(normalize_header)
        .collect();

    let columns = CatalogColumns::locate(&headers, path)?;

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::CsvParse {
            path: path.to_path_buf(),
            source,
        })?;
        let row: Vec<String> = (0..headers.len())
            .map(|idx| record.get(idx).unwrap_or("").trim().to_string())
            .collect();
        if row.iter().all(String::is_empty) {
            continue;
        }
        rows.push(row);
    }
    forward_fill(&mut rows);

    let entries: Vec<FieldCatalogEntry> = rows
        .iter()
        .filter(|row| {
            row.get(columns.schema)
                .is_some_and(|value| value.eq_ignore_ascii_case(schema.token()))
        })
        .map(|row| columns.entry(row))
        .collect();
    debug!(
        schema = %schema,
        entry_count = entries.len(),
        source = %path.display(),
        "catalog loaded"
    );
    Ok(entries)
}

fn normalize_header(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_uppercase()
}

/// Copy the last non-blank value of each column into the blank cells below it.
fn forward_fill(rows: &mut [Vec<String>]) {
    let width = rows.first().map_or(0, Vec::len);
    let mut last: Vec<Option<String>> = vec![None; width];
    for row in rows.iter_mut() {
        for (idx, cell) in row.iter_mut().enumerate() {
            if cell.is_empty() {
                if let Some(previous) = &last[idx] {
                    cell.clone_from(previous);
                }
            } else {
                last[idx] = Some(cell.clone());
            }
        }
    }
}

struct CatalogColumns {
    schema: usize,
    legacy_view: usize,
    field_name: usize,
    target_table: usize,
    primary_key: Option<usize>,
    allowed_values: Option<usize>,
    field_length: Option<usize>,
    field_type: Option<usize>,
    check_field_type: Option<usize>,
}

impl CatalogColumns {
    fn locate(headers: &[String], path: &Path) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|header| header == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| IngestError::MissingColumn {
                column: name.to_string(),
                path: path.to_path_buf(),
            })
        };
        Ok(Self {
            schema: require(COL_SCHEMA)?,
            legacy_view: require(COL_LEGACY_VIEW)?,
            field_name: require(COL_FIELD_NAME)?,
            target_table: require(COL_TARGET_TABLE)?,
            primary_key: find(COL_PRIMARY_KEY),
            allowed_values: find(COL_ALLOWED_VALUES),
            field_length: find(COL_FIELD_LENGTH),
            field_type: find(COL_FIELD_TYPE),
            check_field_type: find(COL_CHECK_FIELD_TYPE),
        })
    }

    fn entry(&self, row: &[String]) -> FieldCatalogEntry {
        FieldCatalogEntry::new(
            upper_cell(row, self.schema),
            upper_cell(row, self.legacy_view),
            upper_cell(row, self.field_name),
            upper_cell(row, self.target_table),
        )
        .with_primary_key(optional_cell(row, self.primary_key) == "Y")
        .with_allowed_values(&optional_cell(row, self.allowed_values))
        .with_field_length(&optional_cell(row, self.field_length))
        .with_field_type(&optional_cell(row, self.field_type))
        .with_check_field_type(&optional_cell(row, self.check_field_type))
    }
}

fn upper_cell(row: &[String], idx: usize) -> String {
    row.get(idx).map(|value| value.to_uppercase()).unwrap_or_default()
}

fn optional_cell(row: &[String], idx: Option<usize>) -> String {
    idx.map(|idx| upper_cell(row, idx)).unwrap_or_default()
}
