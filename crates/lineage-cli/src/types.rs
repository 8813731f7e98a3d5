use std::path::PathBuf;

use lineage_model::{LegacyCode, SchemaVariant};
use lineage_report::GovernancePaths;

#[derive(Debug)]
pub struct RunReport {
    pub legacy: LegacyCode,
    pub lineage_file: PathBuf,
    pub output_root: PathBuf,
    pub dry_run: bool,
    pub views: Vec<ViewSummary>,
    /// Schemas whose worksheet was missing or empty.
    pub skipped_schemas: Vec<SchemaVariant>,
}

#[derive(Debug)]
pub struct ViewSummary {
    pub schema: SchemaVariant,
    pub legacy_view: String,
    pub target_table: String,
    pub catalog_fields: usize,
    /// Catalog fields found by legacy field name.
    pub matched_legacy: usize,
    /// Catalog fields found by landing field name.
    pub matched_landing: usize,
    pub replication_rules: usize,
    pub quality_rules: usize,
    pub governance_rows: usize,
    /// `None` on dry runs.
    pub outputs: Option<ViewOutputs>,
}

#[derive(Debug)]
pub struct ViewOutputs {
    pub replication: PathBuf,
    pub quality: Vec<PathBuf>,
    pub governance: GovernancePaths,
}
