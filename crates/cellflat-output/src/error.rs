//! Output error types.

use std::path::PathBuf;

use thiserror::Error;

/// Output operation error.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Delimiters must be a single ASCII character.
    #[error("delimiter {0:?} is not a single ASCII character")]
    InvalidDelimiter(String),

    /// File I/O error.
    #[error("failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Record encoding failed.
    #[error("failed to write delimited record")]
    Csv {
        #[from]
        source: csv::Error,
    },

    /// Temp file couldn't be renamed over the target.
    #[error("failed to move {temp_path} into place at {target_path}")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, OutputError>;
