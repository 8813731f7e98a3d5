use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical column types derived from free-text legacy type strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanonicalType {
    String,
    Int,
    Float,
    Timestamp,
    Unknown,
}

impl CanonicalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalType::String => "string",
            CanonicalType::Int => "int",
            CanonicalType::Float => "float",
            CanonicalType::Timestamp => "timestamp",
            CanonicalType::Unknown => "unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, CanonicalType::Unknown)
    }
}

impl fmt::Display for CanonicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pipeline stage a type string belongs to; only landing types yield lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeContext {
    Landing,
    Staging,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferredType {
    pub canonical: CanonicalType,
    /// Text between the parentheses of a `VARCHAR2(...)`, verbatim.
    pub char_length: Option<String>,
    /// Text between the parentheses of a `NUMBER(...)`/`FLOAT(...)`, verbatim.
    pub numeric_length: Option<String>,
}

impl InferredType {
    pub fn of(canonical: CanonicalType) -> Self {
        Self {
            canonical,
            char_length: None,
            numeric_length: None,
        }
    }

    pub fn unknown() -> Self {
        Self::of(CanonicalType::Unknown)
    }
}

/// Physical type of a column added by the replication engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ColumnDataType {
    String { length: i64 },
    Numeric { precision: i64, scale: i64 },
}

impl ColumnDataType {
    /// Load timestamps are carried as `yyyyMMddHHmmss` strings.
    pub const TIMESTAMP_STRING: ColumnDataType = ColumnDataType::String { length: 14 };
}
