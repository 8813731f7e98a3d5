//! Replication task rules.
//!
//! A view becomes one rule document: schema and table renames, one rule per
//! catalog field, then the load timestamp column and the incremental
//! selection filter. Rule ids are assigned sequentially from 0.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::ser::{Serialize, Serializer};
use serde_json::ser::PrettyFormatter;
use tracing::debug;

use lineage_model::{ColumnDataType, JoinedField};
use lineage_transform::catalog_data_type;

use crate::error::{ReportError, Result};

/// Schema name on the replication source side.
pub const SOURCE_SCHEMA: &str = "nombre_schema";
/// Schema every table is renamed into.
pub const TARGET_SCHEMA: &str = "carnet";
/// Column appended to every table with the load time.
pub const LOAD_TIMESTAMP_COLUMN: &str = "TIMESTAMP_CARGA";
pub const LOAD_TIMESTAMP_EXPRESSION: &str = "{{timestamp_carga}}";
/// Column compared against the previous run for incremental extraction.
pub const INCREMENTAL_COLUMN: &str = "FC_ULTIMA_ACT";
pub const LAST_EXECUTION_PLACEHOLDER: &str = "{{lastExecution}}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaRule {
    pub rule_id: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRule {
    pub rule_id: u32,
    pub legacy_view: String,
    pub target_table: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeColumnRule {
    pub rule_id: u32,
    pub legacy_view: String,
    pub column_name: String,
}

/// A column the source lacks; it carries no column locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddColumnRule {
    pub rule_id: u32,
    pub legacy_view: String,
    pub column_name: String,
    pub data_type: ColumnDataType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampColumnRule {
    pub rule_id: u32,
    pub legacy_view: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionFilterRule {
    pub rule_id: u32,
    pub legacy_view: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Schema(SchemaRule),
    Table(TableRule),
    IncludeColumn(IncludeColumnRule),
    AddColumn(AddColumnRule),
    TimestampColumn(TimestampColumnRule),
    SelectionFilter(SelectionFilterRule),
}

impl Rule {
    pub fn id(&self) -> u32 {
        match self {
            Rule::Schema(rule) => rule.rule_id,
            Rule::Table(rule) => rule.rule_id,
            Rule::IncludeColumn(rule) => rule.rule_id,
            Rule::AddColumn(rule) => rule.rule_id,
            Rule::TimestampColumn(rule) => rule.rule_id,
            Rule::SelectionFilter(rule) => rule.rule_id,
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            Rule::Schema(_) | Rule::Table(_) => "rename",
            Rule::IncludeColumn(_) => "include-column",
            Rule::AddColumn(_) | Rule::TimestampColumn(_) => "add-column",
            Rule::SelectionFilter(_) => "include",
        }
    }

    fn wire(&self) -> WireRule<'_> {
        let id = self.id();
        let action = self.action();
        match self {
            Rule::Schema(_) => WireRule {
                value: Some(Some(TARGET_SCHEMA.to_string())),
                old_value: Some(None),
                ..WireRule::transformation(id, "schema", ObjectLocator::schema(), action)
            },
            Rule::Table(rule) => WireRule {
                value: Some(Some(rule.target_table.to_lowercase())),
                old_value: Some(None),
                ..WireRule::transformation(
                    id,
                    "table",
                    ObjectLocator::table(&rule.legacy_view),
                    action,
                )
            },
            Rule::IncludeColumn(rule) => WireRule {
                value: Some(None),
                old_value: Some(None),
                ..WireRule::transformation(
                    id,
                    "column",
                    ObjectLocator::column(&rule.legacy_view, &rule.column_name),
                    action,
                )
            },
            Rule::AddColumn(rule) => WireRule {
                value: Some(Some(rule.column_name.clone())),
                expression: Some(""),
                data_type: Some(rule.data_type),
                ..WireRule::transformation(
                    id,
                    "column",
                    ObjectLocator::table(&rule.legacy_view),
                    action,
                )
            },
            Rule::TimestampColumn(rule) => WireRule {
                value: Some(Some(LOAD_TIMESTAMP_COLUMN.to_string())),
                expression: Some(LOAD_TIMESTAMP_EXPRESSION),
                data_type: Some(ColumnDataType::TIMESTAMP_STRING),
                ..WireRule::transformation(
                    id,
                    "column",
                    ObjectLocator::table(&rule.legacy_view),
                    action,
                )
            },
            Rule::SelectionFilter(rule) => WireRule {
                filters: Some([SourceFilter::incremental()]),
                ..WireRule::new("selection", id, None, ObjectLocator::table(&rule.legacy_view), action)
            },
        }
    }
}

impl Serialize for Rule {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.wire().serialize(serializer)
    }
}

#[derive(serde::Serialize)]
#[serde(rename_all = "kebab-case")]
struct ObjectLocator<'a> {
    schema_name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    table_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    column_name: Option<&'a str>,
}

impl<'a> ObjectLocator<'a> {
    fn schema() -> Self {
        Self {
            schema_name: SOURCE_SCHEMA,
            table_name: None,
            column_name: None,
        }
    }

    fn table(table_name: &'a str) -> Self {
        Self {
            table_name: Some(table_name),
            ..Self::schema()
        }
    }

    fn column(table_name: &'a str, column_name: &'a str) -> Self {
        Self {
            column_name: Some(column_name),
            ..Self::table(table_name)
        }
    }
}

#[derive(serde::Serialize)]
#[serde(rename_all = "kebab-case")]
struct FilterCondition {
    filter_operator: &'static str,
    value: &'static str,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "kebab-case")]
struct SourceFilter {
    filter_type: &'static str,
    column_name: &'static str,
    filter_conditions: [FilterCondition; 1],
}

impl SourceFilter {
    fn incremental() -> Self {
        Self {
            filter_type: "source",
            column_name: INCREMENTAL_COLUMN,
            filter_conditions: [FilterCondition {
                filter_operator: "gte",
                value: LAST_EXECUTION_PLACEHOLDER,
            }],
        }
    }
}

/// Serialized form of a rule. `Some(None)` writes an explicit `null`.
#[derive(serde::Serialize)]
#[serde(rename_all = "kebab-case")]
struct WireRule<'a> {
    rule_type: &'static str,
    rule_id: String,
    rule_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    rule_target: Option<&'static str>,
    object_locator: ObjectLocator<'a>,
    rule_action: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    old_value: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expression: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data_type: Option<ColumnDataType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filters: Option<[SourceFilter; 1]>,
}

impl<'a> WireRule<'a> {
    fn new(
        rule_type: &'static str,
        id: u32,
        rule_target: Option<&'static str>,
        object_locator: ObjectLocator<'a>,
        rule_action: &'static str,
    ) -> Self {
        Self {
            rule_type,
            rule_id: id.to_string(),
            rule_name: id.to_string(),
            rule_target,
            object_locator,
            rule_action,
            value: None,
            old_value: None,
            expression: None,
            data_type: None,
            filters: None,
        }
    }

    fn transformation(
        id: u32,
        target: &'static str,
        object_locator: ObjectLocator<'a>,
        rule_action: &'static str,
    ) -> Self {
        Self::new("transformation", id, Some(target), object_locator, rule_action)
    }
}

/// Ordered rules of one replication task.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RuleDocument {
    pub rules: Vec<Rule>,
}

impl RuleDocument {
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules that reference a column by its source name.
    pub fn included_columns(&self) -> usize {
        self.rules
            .iter()
            .filter(|rule| matches!(rule, Rule::IncludeColumn(_)))
            .count()
    }

    pub fn added_columns(&self) -> usize {
        self.rules
            .iter()
            .filter(|rule| matches!(rule, Rule::AddColumn(_)))
            .count()
    }
}

/// Build the rule document for one legacy view.
///
/// `fields` must be joined on the legacy field name. Fields found in the
/// lineage are included as-is; the others are added with the catalog's
/// declared type.
pub fn emit_replication_rules(
    fields: &[JoinedField],
    legacy_view: &str,
    target_table: &str,
) -> RuleDocument {
    let mut rules = Vec::with_capacity(fields.len() + 4);
    let mut next_id = 0u32;
    let mut take_id = || {
        let id = next_id;
        next_id += 1;
        id
    };

    rules.push(Rule::Schema(SchemaRule { rule_id: take_id() }));
    rules.push(Rule::Table(TableRule {
        rule_id: take_id(),
        legacy_view: legacy_view.to_string(),
        target_table: target_table.to_string(),
    }));

    for field in fields {
        let rule = match &field.lineage {
            Some(record) => Rule::IncludeColumn(IncludeColumnRule {
                rule_id: take_id(),
                legacy_view: legacy_view.to_string(),
                column_name: record.legacy_field.clone(),
            }),
            None => Rule::AddColumn(AddColumnRule {
                rule_id: take_id(),
                legacy_view: legacy_view.to_string(),
                column_name: field.field_name().to_string(),
                data_type: catalog_data_type(
                    field.entry.field_type.as_deref(),
                    field.entry.field_length.as_ref(),
                ),
            }),
        };
        rules.push(rule);
    }

    rules.push(Rule::TimestampColumn(TimestampColumnRule {
        rule_id: take_id(),
        legacy_view: legacy_view.to_string(),
    }));
    rules.push(Rule::SelectionFilter(SelectionFilterRule {
        rule_id: take_id(),
        legacy_view: legacy_view.to_string(),
    }));

    debug!(
        legacy_view,
        target_table,
        rule_count = rules.len(),
        "replication rules built"
    );
    RuleDocument { rules }
}

/// Render a document as 4-space indented JSON.
pub fn render_rule_document(document: &RuleDocument) -> serde_json::Result<String> {
    let mut buffer = Vec::new();
    write_pretty(&mut buffer, document)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Write a document to `path`, creating parent folders as needed.
pub fn write_rule_document(path: &Path, document: &RuleDocument) -> Result<()> {
    let io_error = |source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    write_pretty(&mut writer, document).map_err(|source| ReportError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(io_error)?;
    debug!(path = %path.display(), rules = document.len(), "wrote replication rules");
    Ok(())
}

fn write_pretty<W: Write>(writer: W, document: &RuleDocument) -> serde_json::Result<()> {
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
    document.serialize(&mut serializer)
}
