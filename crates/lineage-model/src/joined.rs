use serde::{Deserialize, Serialize};

use crate::catalog::FieldCatalogEntry;
use crate::lineage::LineageRecord;

/// Which lineage column a catalog field name is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinKey {
    /// Legacy field name; used by replication and data-quality output.
    LegacyField,
    /// Landing field name; used by governance output.
    LandingField,
}

impl JoinKey {
    pub fn lineage_value<'a>(&self, record: &'a LineageRecord) -> Option<&'a str> {
        match self {
            JoinKey::LegacyField => Some(record.legacy_field.as_str()),
            JoinKey::LandingField => record.landing_field.as_deref(),
        }
    }
}

/// A catalog entry paired with its lineage row, if one matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinedField {
    #[serde(flatten)]
    pub entry: FieldCatalogEntry,
    pub lineage: Option<LineageRecord>,
}

impl JoinedField {
    pub fn matched(entry: FieldCatalogEntry, lineage: LineageRecord) -> Self {
        Self {
            entry,
            lineage: Some(lineage),
        }
    }

    pub fn unmatched(entry: FieldCatalogEntry) -> Self {
        Self {
            entry,
            lineage: None,
        }
    }

    /// True iff a lineage row matched this catalog entry.
    pub fn exists(&self) -> bool {
        self.lineage.is_some()
    }

    pub fn field_name(&self) -> &str {
        &self.entry.field_name
    }

    pub fn landing_obligatory(&self) -> bool {
        self.lineage
            .as_ref()
            .is_some_and(|record| record.landing_obligatory)
    }

    /// Catalog check type, falling back to the lineage's legacy type.
    pub fn check_type(&self) -> Option<&str> {
        self.entry.check_field_type.as_deref().or_else(|| {
            self.lineage
                .as_ref()
                .and_then(|record| record.check_field_type.as_deref())
        })
    }
}
