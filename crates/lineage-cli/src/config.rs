//! Run configuration loaded from `lineage.toml`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

use lineage_model::{LegacyCode, SchemaVariant};
use lineage_report::QualitySettings;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "lineage.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Schema variants processed per legacy, in order.
    pub schemas: Vec<SchemaVariant>,
    pub folders: FolderConfig,
    pub dataquality: DataQualityConfig,
    pub logging: LoggingConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            schemas: SchemaVariant::ALL.to_vec(),
            folders: FolderConfig::default(),
            dataquality: DataQualityConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolderConfig {
    /// Folder holding versioned lineage workbooks.
    pub lineage_folder: PathBuf,
    /// `;`-delimited field catalog.
    pub catalog_file: PathBuf,
    pub output_root: PathBuf,
    /// Output kind folders, relative to `output_root`.
    pub replication_folder: String,
    pub governance_folder: String,
    pub dataquality_folder: String,
}

impl Default for FolderConfig {
    fn default() -> Self {
        Self {
            lineage_folder: PathBuf::from("inputs/lineage"),
            catalog_file: PathBuf::from("inputs/fields.csv"),
            output_root: PathBuf::from("outputs"),
            replication_folder: "dmstask".to_string(),
            governance_folder: "government".to_string(),
            dataquality_folder: "dataquality".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataQualityConfig {
    pub database: String,
    pub environments: Vec<String>,
    /// Emit `IsComplete` checks for fields missing from the lineage.
    pub is_complete: bool,
}

impl Default for DataQualityConfig {
    fn default() -> Self {
        let settings = QualitySettings::default();
        Self {
            database: settings.database,
            environments: settings.environments,
            is_complete: settings.check_completeness,
        }
    }
}

impl DataQualityConfig {
    pub fn settings(&self) -> QualitySettings {
        QualitySettings {
            database: self.database.clone(),
            environments: self.environments.clone(),
            check_completeness: self.is_complete,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level name used when no verbosity flag is given.
    pub level: Option<String>,
}

impl LoggingConfig {
    /// Parsed level; names that are not a level fall back to `warn`.
    pub fn level_filter(&self) -> Option<LevelFilter> {
        self.level
            .as_deref()
            .map(|level| level.trim().parse().unwrap_or(LevelFilter::WARN))
    }
}

impl RunConfig {
    /// Load the config file.
    ///
    /// An explicit path must exist. Without one, `lineage.toml` in the
    /// working directory is used when present, defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !path.is_file() {
                    return Ok(Self::default());
                }
                path
            }
        };
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("parse config {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply command-line overrides.
    #[must_use]
    pub fn with_overrides(
        mut self,
        lineage_folder: Option<PathBuf>,
        catalog_file: Option<PathBuf>,
        output_root: Option<PathBuf>,
    ) -> Self {
        if let Some(folder) = lineage_folder {
            self.folders.lineage_folder = folder;
        }
        if let Some(file) = catalog_file {
            self.folders.catalog_file = file;
        }
        if let Some(root) = output_root {
            self.folders.output_root = root;
        }
        self
    }

    /// Restrict the run to `schemas`; an empty list keeps the configured set.
    #[must_use]
    pub fn with_schemas(mut self, schemas: &[SchemaVariant]) -> Self {
        if !schemas.is_empty() {
            self.schemas = schemas.to_vec();
        }
        self
    }
}

/// Per-legacy output folders of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub root: PathBuf,
    /// Lowercase legacy folder; replication file names are lowercase too.
    pub replication: PathBuf,
    pub governance: PathBuf,
    pub dataquality: PathBuf,
}

impl OutputLayout {
    pub fn new(folders: &FolderConfig, legacy: LegacyCode) -> Self {
        let root = folders.output_root.clone();
        Self {
            replication: root
                .join(&folders.replication_folder)
                .join(legacy.as_str().to_lowercase()),
            governance: root.join(&folders.governance_folder).join(legacy.as_str()),
            dataquality: root.join(&folders.dataquality_folder).join(legacy.as_str()),
            root,
        }
    }

    /// Legacy folders in the order they are prepared.
    pub fn legacy_folders(&self) -> [&Path; 3] {
        [
            self.replication.as_path(),
            self.governance.as_path(),
            self.dataquality.as_path(),
        ]
    }

    pub fn replication_file(&self, target_table: &str, legacy: LegacyCode) -> PathBuf {
        let legacy = legacy.as_str().to_lowercase();
        let table = target_table.to_lowercase();
        self.replication.join(format!("{table}_{legacy}.json"))
    }
}
