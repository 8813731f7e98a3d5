//! Per-legacy generation pipeline.
//!
//! One run covers a single legacy system: the latest lineage workbook is
//! read once, then each schema variant is joined against its catalog subset
//! and every legacy view produces its three artifacts.

use anyhow::{Context, Result};
use tracing::{error, info, info_span, warn};

use lineage_ingest::{
    RawSheet, create_folder, find_latest_lineage, load_catalog, parse_lineage, read_workbook,
    reset_folder,
};
use lineage_model::{FieldCatalogEntry, JoinKey, LegacyCode, LineageRecord, SchemaVariant};
use lineage_report::{
    QualityRuleEmitter, QualitySettings, emit_governance, emit_replication_rules,
    write_governance, write_rule_document,
};
use lineage_transform::{ViewGroup, group_by_view, join_fields};

use crate::config::{OutputLayout, RunConfig};
use crate::types::{RunReport, ViewOutputs, ViewSummary};

/// Everything a view needs besides its own data.
pub struct PipelineContext<'a> {
    pub legacy: LegacyCode,
    pub layout: &'a OutputLayout,
    pub quality: &'a QualitySettings,
    pub dry_run: bool,
}

/// Ensure the output root exists and empty this legacy's folders.
pub fn prepare_output_folders(layout: &OutputLayout) -> Result<()> {
    create_folder(&layout.root)?;
    for folder in layout.legacy_folders() {
        if let Some(kind_folder) = folder.parent() {
            create_folder(kind_folder)?;
        }
        reset_folder(folder)?;
    }
    Ok(())
}

/// Generate every artifact of one legacy system.
pub fn run_legacy(config: &RunConfig, legacy: LegacyCode, dry_run: bool) -> Result<RunReport> {
    let span = info_span!("legacy", legacy = %legacy);
    let _guard = span.enter();

    let layout = OutputLayout::new(&config.folders, legacy);
    if !dry_run {
        prepare_output_folders(&layout)
            .inspect_err(|err| error!(error = %err, "output folder preparation failed"))
            .context("prepare output folders")?;
    }

    let lineage_file = find_latest_lineage(&config.folders.lineage_folder, legacy)
        .inspect_err(|err| error!(error = %err, "no usable lineage file"))
        .with_context(|| format!("locate lineage file for {legacy}"))?;
    info!(file = %lineage_file.display(), "using lineage file");
    let sheets = read_workbook(&lineage_file)
        .inspect_err(|err| error!(error = %err, "lineage workbook unreadable"))
        .with_context(|| format!("read lineage workbook {}", lineage_file.display()))?;

    let quality = config.dataquality.settings();
    let context = PipelineContext {
        legacy,
        layout: &layout,
        quality: &quality,
        dry_run,
    };

    let mut report = RunReport {
        legacy,
        lineage_file,
        output_root: layout.root.clone(),
        dry_run,
        views: Vec::new(),
        skipped_schemas: Vec::new(),
    };
    for &schema in &config.schemas {
        let catalog = load_catalog(&config.folders.catalog_file, schema)
            .inspect_err(|err| error!(error = %err, schema = %schema, "field catalog unreadable"))
            .with_context(|| format!("load field catalog for {schema}"))?;
        let views = process_schema(&context, schema, &catalog, &sheets)?;
        if views.is_empty() {
            report.skipped_schemas.push(schema);
        }
        report.views.extend(views);
    }
    info!(
        views = report.views.len(),
        skipped = report.skipped_schemas.len(),
        "legacy run complete"
    );
    Ok(report)
}

/// Process one schema variant. An absent or empty worksheet is a skip.
pub fn process_schema(
    context: &PipelineContext<'_>,
    schema: SchemaVariant,
    catalog: &[FieldCatalogEntry],
    sheets: &[RawSheet],
) -> Result<Vec<ViewSummary>> {
    let span = info_span!("schema", schema = %schema);
    let _guard = span.enter();

    let lineage = parse_lineage(sheets, schema, context.legacy);
    if lineage.is_empty() {
        info!("no lineage rows, skipping schema");
        return Ok(Vec::new());
    }

    let groups = group_by_view(catalog, context.legacy);
    let mut summaries = Vec::with_capacity(groups.len());
    for group in &groups {
        if group.entries.is_empty() {
            continue;
        }
        summaries.push(process_view(context, schema, group, &lineage)?);
    }
    info!(views = summaries.len(), "schema processed");
    Ok(summaries)
}

fn process_view(
    context: &PipelineContext<'_>,
    schema: SchemaVariant,
    group: &ViewGroup,
    lineage: &[LineageRecord],
) -> Result<ViewSummary> {
    let span = info_span!(
        "view",
        legacy_view = %group.legacy_view,
        target_table = %group.target_table
    );
    let _guard = span.enter();

    let by_legacy = join_fields(&group.entries, lineage, JoinKey::LegacyField);
    let by_landing = join_fields(&group.entries, lineage, JoinKey::LandingField);

    // Replication tasks keep the catalog spelling, placeholder included.
    let document = emit_replication_rules(&by_legacy, &group.catalog_view, &group.target_table);
    let quality_emitter = QualityRuleEmitter::new(context.quality);
    let ruleset = quality_emitter.emit(&by_legacy, &group.target_table);
    let governance = emit_governance(&by_landing, context.legacy, &group.target_table);

    let matched_legacy = by_legacy.iter().filter(|field| field.exists()).count();
    if matched_legacy == 0 {
        warn!("no catalog field found in the lineage");
    }

    let outputs = if context.dry_run {
        None
    } else {
        let layout = context.layout;
        let replication = layout.replication_file(&group.target_table, context.legacy);
        write_rule_document(&replication, &document)
            .inspect_err(|err| error!(error = %err, "writing replication rules failed"))?;
        let quality = quality_emitter
            .write(&layout.dataquality, &ruleset)
            .inspect_err(|err| error!(error = %err, "writing quality rules failed"))?;
        let governance_paths = write_governance(&layout.governance, &governance)
            .inspect_err(|err| error!(error = %err, "writing governance tables failed"))?;
        Some(ViewOutputs {
            replication,
            quality,
            governance: governance_paths,
        })
    };

    info!(
        fields = group.entries.len(),
        matched = matched_legacy,
        rules = document.len(),
        "view processed"
    );
    Ok(ViewSummary {
        schema,
        legacy_view: group.legacy_view.clone(),
        target_table: group.target_table.clone(),
        catalog_fields: group.entries.len(),
        matched_legacy,
        matched_landing: by_landing.iter().filter(|field| field.exists()).count(),
        replication_rules: document.len(),
        quality_rules: ruleset.rules.len(),
        governance_rows: governance.main.len(),
        outputs,
    })
}
