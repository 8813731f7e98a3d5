use serde::{Deserialize, Serialize};

/// One normalized row of the lineage sheet: a legacy field and its
/// landing and staging counterparts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageRecord {
    pub legacy_view: String,
    pub legacy_field: String,
    pub legacy_obligatory: bool,
    /// Legacy-side type string, used when the catalog declares no check type.
    pub check_field_type: Option<String>,
    pub landing_field: Option<String>,
    pub landing_type: Option<String>,
    pub landing_obligatory: bool,
    pub staging_field: Option<String>,
    pub staging_type: Option<String>,
    pub staging_obligatory: bool,
}

impl LineageRecord {
    pub fn new(legacy_view: impl Into<String>, legacy_field: impl Into<String>) -> Self {
        Self {
            legacy_view: legacy_view.into(),
            legacy_field: legacy_field.into(),
            legacy_obligatory: false,
            check_field_type: None,
            landing_field: None,
            landing_type: None,
            landing_obligatory: false,
            staging_field: None,
            staging_type: None,
            staging_obligatory: false,
        }
    }

    #[must_use]
    pub fn with_landing(mut self, field: &str, data_type: &str, obligatory: bool) -> Self {
        self.landing_field = Some(field.to_string());
        self.landing_type = Some(data_type.to_string());
        self.landing_obligatory = obligatory;
        self
    }

    #[must_use]
    pub fn with_staging(mut self, field: &str, data_type: &str, obligatory: bool) -> Self {
        self.staging_field = Some(field.to_string());
        self.staging_type = Some(data_type.to_string());
        self.staging_obligatory = obligatory;
        self
    }
}
