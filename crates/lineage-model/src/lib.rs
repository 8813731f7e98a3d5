pub mod catalog;
pub mod error;
pub mod joined;
pub mod legacy;
pub mod lineage;
pub mod types;

pub use catalog::{AllowedValues, FieldCatalogEntry, FieldLength};
pub use error::{ModelError, Result};
pub use joined::{JoinKey, JoinedField};
pub use legacy::{LEGACY_PLACEHOLDER, LegacyCode, SchemaVariant};
pub use lineage::LineageRecord;
pub use types::{CanonicalType, ColumnDataType, InferredType, TypeContext};
