//! Type inference and catalog/lineage joins.

pub mod inference;
pub mod join;

pub use inference::{catalog_data_type, extract_length, infer_type, parse_precision_scale};
pub use join::{ViewGroup, group_by_view, join_fields, substitute_legacy};
