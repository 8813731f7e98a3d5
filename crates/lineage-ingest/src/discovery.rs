//! Lineage file discovery.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info};

use lineage_model::LegacyCode;

use crate::error::{IngestError, Result};

/// Version token in lineage file names, e.g. `Linaje_APET_v1.3.xlsx`.
static VERSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"v([0-9]+\.[0-9]+)").expect("Invalid version regex"));

/// Lists the file names in `folder` that mention the legacy code.
///
/// Returns names sorted so that discovery is deterministic.
pub fn list_lineage_files(folder: &Path, legacy: LegacyCode) -> Result<Vec<String>> {
    let entries = std::fs::read_dir(folder).map_err(|source| IngestError::DirectoryRead {
        path: folder.to_path_buf(),
        source,
    })?;

    let mut names = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|source| IngestError::DirectoryRead {
            path: folder.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        if name.contains(legacy.as_str()) {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}

/// Extract the `vMAJOR.MINOR` token of a file name as a decimal number.
pub fn version_of(file_name: &str) -> Option<f64> {
    VERSION_PATTERN
        .captures(file_name)
        .and_then(|captures| captures.get(1))
        .and_then(|version| version.as_str().parse::<f64>().ok())
}

/// Pick the candidate with the greatest version; the first one wins ties.
pub fn latest_version(candidates: &[String]) -> Result<&str> {
    let mut best: Option<(&str, f64)> = None;
    for name in candidates {
        let Some(version) = version_of(name) else {
            debug!(file = %name, "skipping lineage file without version");
            continue;
        };
        if best.is_none_or(|(_, current)| version > current) {
            best = Some((name.as_str(), version));
        }
    }
    best.map(|(name, _)| name)
        .ok_or_else(|| IngestError::VersionNotFound {
            candidates: candidates.to_vec(),
        })
}

/// Locate the most recent lineage workbook for a legacy system.
pub fn find_latest_lineage(folder: &Path, legacy: LegacyCode) -> Result<PathBuf> {
    info!(legacy = %legacy, folder = %folder.display(), "getting last lineage file");
    let candidates = list_lineage_files(folder, legacy)?;
    if candidates.is_empty() {
        return Err(IngestError::LineageNotFound {
            legacy: legacy.to_string(),
            folder: folder.to_path_buf(),
        });
    }
    let latest = latest_version(&candidates)?;
    info!(legacy = %legacy, file = %latest, "got the last lineage file");
    Ok(folder.join(latest))
}
