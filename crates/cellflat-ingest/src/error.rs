//! Error types for annotation ingestion.

use std::path::PathBuf;

use cellflat_model::ModelError;
use thiserror::Error;

/// Errors that can occur while discovering or loading annotation files.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Input directory not found or not a directory.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Container Errors ===
    /// The file looks like a zip archive but cannot be opened as one.
    #[error("failed to open archive {path}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// The archive has no `db` entry.
    #[error("archive {path} has no db entry")]
    MissingDbEntry { path: PathBuf },

    // === Database Text Errors ===
    /// The database text is not valid UTF-8.
    #[error("database text in {path} is not valid UTF-8: {source}")]
    InvalidUtf8 {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// The database text does not start with a `#<version>` line.
    #[error("missing version header in {path}")]
    MissingVersionHeader { path: PathBuf },

    /// The database text uses a format version this loader does not read.
    #[error("unsupported database version '{version}' in {path}")]
    UnsupportedVersion { path: PathBuf, version: String },

    /// A line could not be parsed.
    #[error("{path}:{line}: {reason}")]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// A cell line carries an interval the model rejects.
    #[error("{path}:{line}: {source}")]
    InvalidCell {
        path: PathBuf,
        line: usize,
        #[source]
        source: ModelError,
    },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
