//! CLI argument definitions for lineage rule generation.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use lineage_model::{LegacyCode, SchemaVariant};

#[derive(Parser)]
#[command(
    name = "lineage-rules",
    version,
    about = "Generate migration artifacts from legacy lineage workbooks",
    long_about = "Generate migration artifacts from legacy lineage workbooks.\n\n\
                  For one legacy system, writes replication task rules (JSON),\n\
                  data-quality rulesets, and governance tables (CSV) per target table."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate all artifacts for one legacy system.
    Generate(GenerateArgs),

    /// List supported legacy systems.
    Legacies,
}

#[derive(Parser)]
pub struct GenerateArgs {
    /// Legacy system code.
    #[arg(long = "legacy", value_enum, ignore_case = true)]
    pub legacy: LegacyArg,

    /// Process only these schema variants (repeatable; default: all configured).
    #[arg(long = "schema", value_name = "SCHEMA")]
    pub schemas: Vec<SchemaVariant>,

    /// Build everything and report without writing files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Configuration file (default: ./lineage.toml when present).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Folder holding the versioned lineage workbooks.
    #[arg(long = "lineage-folder", value_name = "DIR")]
    pub lineage_folder: Option<PathBuf>,

    /// Field catalog CSV.
    #[arg(long = "catalog", value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Root folder for generated artifacts.
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LegacyArg {
    Apet,
    Apmv,
    Aymv,
    Bduc,
    Gtfn,
    Hssr,
    Piso,
    Pnc,
    Rgm,
    Rmin,
    Sidm,
    Simp,
    Soic,
}

impl From<LegacyArg> for LegacyCode {
    fn from(value: LegacyArg) -> Self {
        match value {
            LegacyArg::Apet => LegacyCode::Apet,
            LegacyArg::Apmv => LegacyCode::Apmv,
            LegacyArg::Aymv => LegacyCode::Aymv,
            LegacyArg::Bduc => LegacyCode::Bduc,
            LegacyArg::Gtfn => LegacyCode::Gtfn,
            LegacyArg::Hssr => LegacyCode::Hssr,
            LegacyArg::Piso => LegacyCode::Piso,
            LegacyArg::Pnc => LegacyCode::Pnc,
            LegacyArg::Rgm => LegacyCode::Rgm,
            LegacyArg::Rmin => LegacyCode::Rmin,
            LegacyArg::Sidm => LegacyCode::Sidm,
            LegacyArg::Simp => LegacyCode::Simp,
            LegacyArg::Soic => LegacyCode::Soic,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
