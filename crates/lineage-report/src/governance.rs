//! Governance tables.
//!
//! Every target table gets a column catalog (`<table>.csv`) and an error
//! variant (`<table>_error.csv`) that flags staging columns and appends the
//! bookkeeping columns the load process adds.

use std::path::{Path, PathBuf};

use tracing::debug;

use lineage_model::{CanonicalType, JoinedField, LegacyCode, TypeContext};
use lineage_transform::infer_type;

use crate::error::{ReportError, Result};

/// Prefix of the owning database user.
pub const OWNER_PREFIX: &str = "DBA_";

pub const GOVERNANCE_COLUMNS: [&str; 12] = [
    "owner",
    "table_name",
    "column_namedata_type",
    "column_namedata_type_aurora",
    "check_type",
    "type_create_lnd",
    "type_create",
    "char_length",
    "data_precisiondata_scale",
    "nullable",
    "format_data",
    "is_landing",
];

pub const STAGING_FLAG_COLUMN: &str = "is_stg";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nullable {
    Y,
    N,
}

impl Nullable {
    pub fn from_obligatory(obligatory: bool) -> Self {
        if obligatory { Nullable::N } else { Nullable::Y }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Nullable::Y => "Y",
            Nullable::N => "N",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GovernanceRow {
    pub owner: String,
    pub table_name: String,
    /// Landing column name.
    pub column_name: String,
    /// Staging column name.
    pub column_name_staging: String,
    pub check_type: Option<String>,
    pub type_create_landing: CanonicalType,
    pub type_create_staging: CanonicalType,
    pub char_length: Option<String>,
    pub precision_scale: Option<String>,
    pub nullable: Nullable,
    pub is_landing: bool,
    /// Only written in the error variant.
    pub is_stg: Option<bool>,
}

impl GovernanceRow {
    fn bookkeeping(
        owner: &str,
        table_name: &str,
        column: &str,
        check_type: &str,
        is_stg: bool,
    ) -> Self {
        Self {
            owner: owner.to_string(),
            table_name: table_name.to_string(),
            column_name: column.to_string(),
            column_name_staging: column.to_string(),
            check_type: Some(check_type.to_string()),
            type_create_landing: CanonicalType::String,
            type_create_staging: CanonicalType::String,
            char_length: None,
            precision_scale: None,
            nullable: Nullable::Y,
            is_landing: true,
            is_stg: Some(is_stg),
        }
    }

    fn record(&self, with_staging_flag: bool) -> Vec<String> {
        let mut record = vec![
            self.owner.clone(),
            self.table_name.clone(),
            self.column_name.clone(),
            self.column_name_staging.clone(),
            self.check_type.clone().unwrap_or_default(),
            type_cell(self.type_create_landing),
            type_cell(self.type_create_staging),
            self.char_length.clone().unwrap_or_default(),
            self.precision_scale.clone().unwrap_or_default(),
            self.nullable.as_str().to_string(),
            String::new(),
            bool_cell(self.is_landing),
        ];
        if with_staging_flag {
            record.push(self.is_stg.map(bool_cell).unwrap_or_default());
        }
        record
    }
}

/// Unknown types are written as empty cells.
fn type_cell(canonical: CanonicalType) -> String {
    if canonical.is_known() {
        canonical.as_str().to_string()
    } else {
        String::new()
    }
}

fn bool_cell(value: bool) -> String {
    if value { "True" } else { "False" }.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GovernanceTables {
    pub target_table: String,
    pub main: Vec<GovernanceRow>,
    pub errors: Vec<GovernanceRow>,
}

/// Build both governance tables from fields joined on the landing name.
pub fn emit_governance(
    fields: &[JoinedField],
    legacy: LegacyCode,
    target_table: &str,
) -> GovernanceTables {
    let owner = format!("{OWNER_PREFIX}{legacy}");
    let main: Vec<GovernanceRow> = fields
        .iter()
        .map(|field| governance_row(field, &owner))
        .collect();

    let mut errors: Vec<GovernanceRow> = main
        .iter()
        .map(|row| GovernanceRow {
            is_stg: Some(true),
            ..row.clone()
        })
        .collect();
    for (column, check_type, is_stg) in [
        ("TIMESTAMP_CARGA", "DATE", true),
        ("FK_CRUZA_MDM", "VARCHAR2", false),
        ("CD_FK_INCUMPLE", "VARCHAR2", false),
        ("ERROR", "VARCHAR2", true),
        ("DataQualityRulesSkip", "VARCHAR2", false),
    ] {
        errors.push(GovernanceRow::bookkeeping(
            &owner,
            target_table,
            column,
            check_type,
            is_stg,
        ));
    }

    debug!(target_table, columns = main.len(), "governance tables built");
    GovernanceTables {
        target_table: target_table.to_string(),
        main,
        errors,
    }
}

fn governance_row(field: &JoinedField, owner: &str) -> GovernanceRow {
    let lineage = field.lineage.as_ref();
    let check_type = field.check_type();

    let landing = infer_type(
        type_or_check(
            lineage.and_then(|record| record.landing_type.as_deref()),
            check_type,
        ),
        TypeContext::Landing,
    );
    let staging = infer_type(
        type_or_check(
            lineage.and_then(|record| record.staging_type.as_deref()),
            check_type,
        ),
        TypeContext::Staging,
    );

    GovernanceRow {
        owner: owner.to_string(),
        table_name: field.entry.target_table.clone(),
        column_name: lineage
            .and_then(|record| record.landing_field.clone())
            .unwrap_or_else(|| field.field_name().to_string()),
        column_name_staging: lineage
            .and_then(|record| record.staging_field.clone())
            .unwrap_or_else(|| field.field_name().to_string()),
        check_type: check_type.map(str::to_string),
        type_create_landing: landing.canonical,
        type_create_staging: staging.canonical,
        char_length: landing.char_length,
        precision_scale: landing.numeric_length,
        nullable: Nullable::from_obligatory(field.landing_obligatory()),
        is_landing: true,
        is_stg: None,
    }
}

/// A blank context type falls back to the check type.
fn type_or_check<'a>(context_type: Option<&'a str>, check_type: Option<&'a str>) -> &'a str {
    context_type.or(check_type).unwrap_or_default()
}

/// Paths of the two governance files of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GovernancePaths {
    pub main: PathBuf,
    pub errors: PathBuf,
}

impl GovernancePaths {
    pub fn for_table(folder: &Path, target_table: &str) -> Self {
        let stem = target_table.to_lowercase();
        Self {
            main: folder.join(format!("{stem}.csv")),
            errors: folder.join(format!("{stem}_error.csv")),
        }
    }
}

/// Write both tables below `folder` as `;`-delimited CSV.
pub fn write_governance(folder: &Path, tables: &GovernanceTables) -> Result<GovernancePaths> {
    std::fs::create_dir_all(folder).map_err(|source| ReportError::Io {
        path: folder.to_path_buf(),
        source,
    })?;
    let paths = GovernancePaths::for_table(folder, &tables.target_table);
    write_table(&paths.main, &tables.main, false)?;
    write_table(&paths.errors, &tables.errors, true)?;
    debug!(
        main = %paths.main.display(),
        errors = %paths.errors.display(),
        "wrote governance tables"
    );
    Ok(paths)
}

fn write_table(path: &Path, rows: &[GovernanceRow], with_staging_flag: bool) -> Result<()> {
    let csv_error = |source| ReportError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_path(path)
        .map_err(csv_error)?;

    let mut header: Vec<&str> = GOVERNANCE_COLUMNS.to_vec();
    if with_staging_flag {
        header.push(STAGING_FLAG_COLUMN);
    }
    writer.write_record(&header).map_err(csv_error)?;
    for row in rows {
        writer
            .write_record(row.record(with_staging_flag))
            .map_err(csv_error)?;
    }
    writer.flush().map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
