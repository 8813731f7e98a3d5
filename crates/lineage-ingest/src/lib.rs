//! Input side of rule generation: field catalog, lineage workbooks, and
//! output folder housekeeping.

pub mod catalog;
pub mod discovery;
pub mod error;
pub mod folders;
pub mod lineage;
pub mod workbook;

pub use catalog::{load_catalog, read_catalog};
pub use discovery::{find_latest_lineage, latest_version, list_lineage_files, version_of};
pub use error::{IngestError, Result};
pub use folders::{create_folder, delete_folder, reset_folder};
pub use lineage::{correct_view_name, is_obligatory, parse_lineage};
pub use workbook::{RawSheet, read_workbook};
