//! Catalog/lineage joins.
//!
//! Catalog view names carry the `LEGADO` placeholder; they are rewritten with
//! the legacy code before any lookup. Joins are left joins: every catalog
//! entry yields exactly one [`JoinedField`], matched or not.

use std::collections::HashMap;

use tracing::{debug, warn};

use lineage_model::{FieldCatalogEntry, JoinKey, JoinedField, LegacyCode, LineageRecord};

/// Catalog entries of one legacy view, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewGroup {
    /// View name as the catalog spells it, placeholder included.
    pub catalog_view: String,
    /// View name with the legacy code substituted; the lineage join key.
    pub legacy_view: String,
    pub target_table: String,
    pub entries: Vec<FieldCatalogEntry>,
}

/// Replace the legacy placeholder in every catalog view name.
pub fn substitute_legacy(catalog: &[FieldCatalogEntry], legacy: LegacyCode) -> Vec<FieldCatalogEntry> {
    catalog
        .iter()
        .map(|entry| FieldCatalogEntry {
            legacy_view: legacy.substitute(&entry.legacy_view),
            ..entry.clone()
        })
        .collect()
}

/// Group catalog entries by view, keeping first-appearance order.
///
/// Grouping uses the catalog spelling; the grouped entries carry the
/// substituted view name so they can be joined directly.
pub fn group_by_view(catalog: &[FieldCatalogEntry], legacy: LegacyCode) -> Vec<ViewGroup> {
    let mut groups: Vec<ViewGroup> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for (raw, entry) in catalog.iter().zip(substitute_legacy(catalog, legacy)) {
        if let Some(&position) = index.get(raw.legacy_view.as_str()) {
            let group = &mut groups[position];
            if group.target_table != entry.target_table {
                warn!(
                    legacy_view = %group.legacy_view,
                    target_table = %group.target_table,
                    other_table = %entry.target_table,
                    "view maps to more than one target table; keeping the first"
                );
            }
            group.entries.push(entry);
        } else {
            index.insert(raw.legacy_view.as_str(), groups.len());
            groups.push(ViewGroup {
                catalog_view: raw.legacy_view.clone(),
                legacy_view: entry.legacy_view.clone(),
                target_table: entry.target_table.clone(),
                entries: vec![entry],
            });
        }
    }
    groups
}

/// Left-join catalog entries against lineage records on (view, field).
///
/// `key` selects the lineage column compared with the catalog field name.
/// When several lineage rows share a key, the first one is used.
pub fn join_fields(
    entries: &[FieldCatalogEntry],
    lineage: &[LineageRecord],
    key: JoinKey,
) -> Vec<JoinedField> {
    let mut lookup: HashMap<(&str, &str), &LineageRecord> = HashMap::new();
    for record in lineage {
        if let Some(field) = key.lineage_value(record) {
            lookup
                .entry((record.legacy_view.as_str(), field))
                .or_insert(record);
        }
    }

    let joined: Vec<JoinedField> = entries
        .iter()
        .map(|entry| {
            match lookup.get(&(entry.legacy_view.as_str(), entry.field_name.as_str())) {
                Some(record) => JoinedField::matched(entry.clone(), (*record).clone()),
                None => JoinedField::unmatched(entry.clone()),
            }
        })
        .collect();
    debug!(
        join_key = ?key,
        field_count = joined.len(),
        matched = joined.iter().filter(|field| field.exists()).count(),
        "catalog joined with lineage"
    );
    joined
}
