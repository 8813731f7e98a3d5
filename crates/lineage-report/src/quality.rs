//! Data-quality rulesets.
//!
//! Each staging table gets one bracketed rule expression, written once per
//! target environment under `ruleset_01_stg_<TABLE>/value-<env>.txt`.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use lineage_model::JoinedField;

use crate::error::{ReportError, Result};

/// Token in the rule text replaced with the environment name on write.
pub const ENVIRONMENT_TOKEN: &str = "environment";

/// Settings the data-quality emitter is constructed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualitySettings {
    /// Staging database the schema check points at.
    pub database: String,
    pub environments: Vec<String>,
    /// Emit `IsComplete` for fields the lineage does not provide.
    pub check_completeness: bool,
}

impl Default for QualitySettings {
    fn default() -> Self {
        Self {
            database: "stg_database".to_string(),
            environments: vec!["dev".to_string(), "pre".to_string(), "pro".to_string()],
            check_completeness: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QualityRule {
    SchemaMatch { database: String, table: String },
    ColumnExists(String),
    IsComplete(String),
    ColumnValues { column: String, values: String },
    IsUnique(String),
    ColumnLength { column: String, max: f64 },
}

impl fmt::Display for QualityRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityRule::SchemaMatch { database, table } => {
                write!(f, "SchemaMatch \"{database}.{table}\"= 1.0")
            }
            QualityRule::ColumnExists(column) => write!(f, "ColumnExists \"{column}\""),
            QualityRule::IsComplete(column) => write!(f, "IsComplete \"{column}\""),
            QualityRule::ColumnValues { column, values } => {
                write!(f, "ColumnValues \"{column}\" in [{values}]")
            }
            QualityRule::IsUnique(column) => write!(f, "IsUnique \"{column}\""),
            QualityRule::ColumnLength { column, max } => {
                write!(f, "ColumnLength \"{column}\" <= {max:?}")
            }
        }
    }
}

/// Rules for one table, rendered as `Rules = [...]`.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityRuleset {
    pub table: String,
    pub rules: Vec<QualityRule>,
}

impl QualityRuleset {
    /// Text written for one environment.
    pub fn for_environment(&self, environment: &str) -> String {
        self.to_string().replace(ENVIRONMENT_TOKEN, environment)
    }
}

impl fmt::Display for QualityRuleset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Rules = [")?;
        for (index, rule) in self.rules.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{rule}")?;
        }
        f.write_str("]")
    }
}

pub struct QualityRuleEmitter<'a> {
    settings: &'a QualitySettings,
}

impl<'a> QualityRuleEmitter<'a> {
    pub fn new(settings: &'a QualitySettings) -> Self {
        Self { settings }
    }

    /// Build the ruleset for `table` from fields joined on the legacy name.
    pub fn emit(&self, fields: &[JoinedField], table: &str) -> QualityRuleset {
        let schema_match = QualityRule::SchemaMatch {
            database: self.settings.database.clone(),
            table: table.to_lowercase(),
        };
        // The schema check is listed twice in every published ruleset.
        let mut rules = vec![schema_match.clone(), schema_match];

        rules.extend(
            fields
                .iter()
                .filter(|field| field.exists())
                .map(|field| QualityRule::ColumnExists(field.field_name().to_string())),
        );
        if self.settings.check_completeness {
            rules.extend(
                fields
                    .iter()
                    .filter(|field| !field.exists())
                    .map(|field| QualityRule::IsComplete(field.field_name().to_string())),
            );
        }
        rules.extend(fields.iter().filter_map(|field| {
            let values = field.entry.allowed_values.as_ref()?;
            if values.is_not_applicable() {
                return None;
            }
            Some(QualityRule::ColumnValues {
                column: field.field_name().to_string(),
                values: values.as_str().to_string(),
            })
        }));
        rules.extend(
            fields
                .iter()
                .filter(|field| field.entry.is_primary_key)
                .map(|field| QualityRule::IsUnique(field.field_name().to_string())),
        );
        rules.extend(fields.iter().filter_map(|field| {
            let max = field.entry.field_length.as_ref()?.as_number()?;
            Some(QualityRule::ColumnLength {
                column: field.field_name().to_string(),
                max,
            })
        }));

        debug!(table, rule_count = rules.len(), "quality rules built");
        QualityRuleset {
            table: table.to_string(),
            rules,
        }
    }

    /// Write one file per configured environment below `folder`.
    pub fn write(&self, folder: &Path, ruleset: &QualityRuleset) -> Result<Vec<PathBuf>> {
        let table_folder = folder.join(ruleset_folder_name(&ruleset.table));
        std::fs::create_dir_all(&table_folder).map_err(|source| ReportError::Io {
            path: table_folder.clone(),
            source,
        })?;
        let mut written = Vec::with_capacity(self.settings.environments.len());
        for environment in &self.settings.environments {
            let path = table_folder.join(format!("value-{environment}.txt"));
            std::fs::write(&path, ruleset.for_environment(environment)).map_err(|source| {
                ReportError::Io {
                    path: path.clone(),
                    source,
                }
            })?;
            written.push(path);
        }
        debug!(
            folder = %table_folder.display(),
            files = written.len(),
            "wrote quality rules"
        );
        Ok(written)
    }
}

pub fn ruleset_folder_name(table: &str) -> String {
    format!("ruleset_01_stg_{table}")
}
