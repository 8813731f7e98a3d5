//! Error types for catalog and lineage ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while locating or reading input files.
#[derive(Debug, Error)]
pub enum IngestError {
    // === Discovery Errors ===
    /// No lineage file mentions the legacy code.
    #[error("no lineage file found for {legacy} in {folder}")]
    LineageNotFound { legacy: String, folder: PathBuf },

    /// Candidate lineage files carry no `vX.Y` version token.
    #[error("no version found among lineage files: {candidates:?}")]
    VersionNotFound { candidates: Vec<String> },

    // === File System Errors ===
    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to open an input file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create an output folder.
    #[error("error creating folder {path}: {source}")]
    FolderCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to delete an output folder.
    #[error("error deleting folder {path}: {source}")]
    FolderDelete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Catalog Errors ===
    /// Failed to read the catalog CSV.
    #[error("failed to parse CSV {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Required column not found in the catalog.
    #[error("required column '{column}' not found in {path}")]
    MissingColumn { column: String, path: PathBuf },

    // === Workbook Errors ===
    /// Failed to open the lineage workbook or read one of its sheets.
    #[error("failed to read workbook {path}: {message}")]
    Workbook { path: PathBuf, message: String },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
