//! Output folder preparation.

use std::path::Path;

use tracing::debug;

use crate::error::{IngestError, Result};

/// Create `folder` (and missing parents) if it does not exist yet.
pub fn create_folder(folder: &Path) -> Result<()> {
    if folder.exists() {
        return Ok(());
    }
    debug!(folder = %folder.display(), "creating folder");
    std::fs::create_dir_all(folder).map_err(|source| IngestError::FolderCreate {
        path: folder.to_path_buf(),
        source,
    })
}

/// Remove `folder` and its contents if it exists.
pub fn delete_folder(folder: &Path) -> Result<()> {
    if !folder.exists() {
        return Ok(());
    }
    debug!(folder = %folder.display(), "deleting folder");
    std::fs::remove_dir_all(folder).map_err(|source| IngestError::FolderDelete {
        path: folder.to_path_buf(),
        source,
    })
}

/// Replace `folder` with an empty directory.
pub fn reset_folder(folder: &Path) -> Result<()> {
    delete_folder(folder)?;
    create_folder(folder)
}
