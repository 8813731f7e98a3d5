use anyhow::Result;
use comfy_table::Table;
use tracing::info;

use lineage_cli::config::RunConfig;
use lineage_cli::pipeline::run_legacy;
use lineage_cli::types::RunReport;
use lineage_model::{LegacyCode, SchemaVariant};

use crate::cli::GenerateArgs;
use crate::summary::apply_table_style;

pub fn run_legacies() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Legacy", "Schemas"]);
    apply_table_style(&mut table);
    let schemas = SchemaVariant::ALL
        .iter()
        .map(SchemaVariant::token)
        .collect::<Vec<_>>()
        .join(", ");
    for legacy in LegacyCode::ALL {
        table.add_row(vec![legacy.to_string(), schemas.clone()]);
    }
    println!("{table}");
    Ok(())
}

/// Run one legacy with the loaded config and the command-line overrides.
pub fn run_generate(args: &GenerateArgs, config: RunConfig) -> Result<RunReport> {
    let legacy = LegacyCode::from(args.legacy);
    let config = config
        .with_overrides(
            args.lineage_folder.clone(),
            args.catalog.clone(),
            args.output_dir.clone(),
        )
        .with_schemas(&args.schemas);
    info!(
        legacy = %legacy,
        dry_run = args.dry_run,
        schemas = ?config.schemas,
        output_root = %config.folders.output_root.display(),
        "starting generation"
    );
    run_legacy(&config, legacy, args.dry_run)
}
