//! Field catalog entries: the declared target columns of every legacy view.

use serde::{Deserialize, Serialize};

/// Declared field length exactly as written in the catalog.
///
/// Lengths are either a character count (`"10"`) or a numeric `"p,s"` pair.
/// A blank cell or `"0"` means the length is unset and is represented by
/// `None` at the entry level, never by this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldLength(String);

impl FieldLength {
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == "0" {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Single numeric bound, when the length is a plain nonzero number.
    pub fn as_number(&self) -> Option<f64> {
        self.0
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite() && *value != 0.0)
    }
}

/// Formatted list of allowed values, kept verbatim for the quality rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllowedValues(String);

impl AllowedValues {
    /// Marker that disqualifies a whole list from value checks.
    pub const NOT_APPLICABLE: &'static str = "N/A";

    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when any entry of the list is `N/A`.
    pub fn is_not_applicable(&self) -> bool {
        self.0.contains(Self::NOT_APPLICABLE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldCatalogEntry {
    pub schema: String,
    pub legacy_view: String,
    pub field_name: String,
    pub target_table: String,
    pub is_primary_key: bool,
    pub allowed_values: Option<AllowedValues>,
    pub field_length: Option<FieldLength>,
    /// Declared type for columns added when the source lacks them (`STRING`, `NUMERIC`, ...).
    pub field_type: Option<String>,
    /// Raw legacy type string used for governance checks.
    pub check_field_type: Option<String>,
}

impl FieldCatalogEntry {
    pub fn new(
        schema: impl Into<String>,
        legacy_view: impl Into<String>,
        field_name: impl Into<String>,
        target_table: impl Into<String>,
    ) -> Self {
        Self {
            schema: schema.into(),
            legacy_view: legacy_view.into(),
            field_name: field_name.into(),
            target_table: target_table.into(),
            is_primary_key: false,
            allowed_values: None,
            field_length: None,
            field_type: None,
            check_field_type: None,
        }
    }

    #[must_use]
    pub fn with_primary_key(mut self, is_primary_key: bool) -> Self {
        self.is_primary_key = is_primary_key;
        self
    }

    #[must_use]
    pub fn with_allowed_values(mut self, raw: &str) -> Self {
        self.allowed_values = AllowedValues::parse(raw);
        self
    }

    #[must_use]
    pub fn with_field_length(mut self, raw: &str) -> Self {
        self.field_length = FieldLength::parse(raw);
        self
    }

    #[must_use]
    pub fn with_field_type(mut self, raw: &str) -> Self {
        self.field_type = non_blank(raw);
        self
    }

    #[must_use]
    pub fn with_check_field_type(mut self, raw: &str) -> Self {
        self.check_field_type = non_blank(raw);
        self
    }
}

fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_and_blank_lengths_are_unset() {
        assert_eq!(FieldLength::parse(""), None);
        assert_eq!(FieldLength::parse(" 0 "), None);
        assert_eq!(FieldLength::parse("12").map(|l| l.as_str().to_string()), Some("12".into()));
    }

    #[test]
    fn length_number_ignores_precision_pairs() {
        assert_eq!(FieldLength::parse("10").and_then(|l| l.as_number()), Some(10.0));
        assert_eq!(FieldLength::parse("10,2").and_then(|l| l.as_number()), None);
    }

    #[test]
    fn not_applicable_marker_anywhere_in_list() {
        let values = AllowedValues::parse("'S', 'N', 'N/A'").expect("values");
        assert!(values.is_not_applicable());
        let values = AllowedValues::parse("'S', 'N'").expect("values");
        assert!(!values.is_not_applicable());
    }
}
