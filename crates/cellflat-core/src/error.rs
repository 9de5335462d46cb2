//! Errors raised while flattening one annotation file.
//!
//! Every variant is fatal for the file being processed; callers abort the
//! whole run rather than emitting partial output.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlattenError {
    /// A column named by the schema is absent from the database.
    #[error("column '{column}' not found in database")]
    MissingColumn { column: String },

    /// A static column has no cells to take its values from.
    #[error("static column '{column}' has no cells")]
    MissingStaticCell { column: String },

    /// A requested code is not present on a cell.
    #[error("cell {ordinal} in column '{column}' has no code '{code}'")]
    MissingCode {
        column: String,
        ordinal: u32,
        code: String,
    },

    /// No cell in an outer nested column contains the inner cell.
    #[error("no cell in column '{container}' contains cell {ordinal} in column '{column}'")]
    NoContainingCell {
        column: String,
        ordinal: u32,
        container: String,
    },
}

pub type Result<T> = std::result::Result<T, FlattenError>;
