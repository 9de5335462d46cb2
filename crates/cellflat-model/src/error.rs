//! Error types for the annotation model.

use thiserror::Error;

use crate::schema::ColumnRole;

/// Errors raised while constructing model values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    /// Interval bounds are negative or inverted.
    #[error("invalid interval [{onset}, {offset}]: onset must be non-negative and not after offset")]
    InvalidInterval { onset: i64, offset: i64 },
}

/// Errors raised while validating a schema.
///
/// These are startup errors: they are reported before any input file is read.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// A role list names a column that has no entry in the code map.
    #[error("{role} column '{column}' is not declared in code_map")]
    UnknownColumn { role: ColumnRole, column: String },
}
