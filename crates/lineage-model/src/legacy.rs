use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Token in catalog view names that stands for the legacy system code.
pub const LEGACY_PLACEHOLDER: &str = "LEGADO";

/// Legacy source systems whose lineage can be converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LegacyCode {
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

impl LegacyCode {
    pub const ALL: [LegacyCode; 13] = [
        LegacyCode::Apet,
        LegacyCode::Apmv,
        LegacyCode::Aymv,
        LegacyCode::Bduc,
        LegacyCode::Gtfn,
        LegacyCode::Hssr,
        LegacyCode::Piso,
        LegacyCode::Pnc,
        LegacyCode::Rgm,
        LegacyCode::Rmin,
        LegacyCode::Sidm,
        LegacyCode::Simp,
        LegacyCode::Soic,
    ];

    /// Uppercase code as it appears in file names and view names.
    pub fn as_str(&self) -> &'static str {
        match self {
            LegacyCode::Apet => "APET",
            LegacyCode::Apmv => "APMV",
            LegacyCode::Aymv => "AYMV",
            LegacyCode::Bduc => "BDUC",
            LegacyCode::Gtfn => "GTFN",
            LegacyCode::Hssr => "HSSR",
            LegacyCode::Piso => "PISO",
            LegacyCode::Pnc => "PNC",
            LegacyCode::Rgm => "RGM",
            LegacyCode::Rmin => "RMIN",
            LegacyCode::Sidm => "SIDM",
            LegacyCode::Simp => "SIMP",
            LegacyCode::Soic => "SOIC",
        }
    }

    /// Replace the placeholder token in a catalog view name with this code.
    pub fn substitute(&self, view: &str) -> String {
        view.replace(LEGACY_PLACEHOLDER, self.as_str())
    }
}

impl fmt::Display for LegacyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LegacyCode {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        LegacyCode::ALL
            .into_iter()
            .find(|code| code.as_str() == normalized)
            .ok_or_else(|| ModelError::UnknownLegacy(s.to_string()))
    }
}

/// Target schema variants; each has its own lineage worksheet and catalog subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVariant {
    Ruu,
    Russ,
}

impl SchemaVariant {
    /// Processing order used for every legacy run.
    pub const ALL: [SchemaVariant; 2] = [SchemaVariant::Ruu, SchemaVariant::Russ];

    pub fn token(&self) -> &'static str {
        match self {
            SchemaVariant::Ruu => "ruu",
            SchemaVariant::Russ => "russ",
        }
    }

    /// Top-level header label of the legacy column group in this variant's sheet.
    pub fn legacy_group_label(&self) -> &'static str {
        match self {
            SchemaVariant::Ruu => "Tabla Legacy VM [FUENTE]",
            SchemaVariant::Russ => "Tabla Legacy [FUENTE]",
        }
    }

    /// Case-insensitive substring match against a worksheet name.
    pub fn matches_sheet(&self, sheet_name: &str) -> bool {
        sheet_name.to_lowercase().contains(self.token())
    }
}

impl fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for SchemaVariant {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ruu" => Ok(SchemaVariant::Ruu),
            "russ" => Ok(SchemaVariant::Russ),
            _ => Err(ModelError::UnknownSchema(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitute_replaces_placeholder() {
        assert_eq!(LegacyCode::Apet.substitute("LEGADO_VM_X"), "APET_VM_X");
        assert_eq!(LegacyCode::Pnc.substitute("OTHER_VIEW"), "OTHER_VIEW");
    }

    #[test]
    fn sheet_match_is_case_insensitive() {
        assert!(SchemaVariant::Ruu.matches_sheet("Linaje RUU v2"));
        assert!(SchemaVariant::Russ.matches_sheet("linaje_Russ"));
        assert!(!SchemaVariant::Ruu.matches_sheet("Resumen"));
    }
}
