//! Data model for hierarchical interval annotations.
//!
//! Annotation databases hold named columns of time-interval cells. Columns are
//! related to each other only through temporal containment, which is what the
//! flattening engine in `cellflat-core` joins on.
//!
//! # Types
//!
//! - [`Interval`], [`Cell`], [`CodeValue`]: a single annotation and its codes
//! - [`Column`], [`AnnotationDb`]: one loaded annotation file
//! - [`Schema`], [`FlattenOptions`]: read-only export configuration
//! - [`FlatTable`]: the accumulated output rows

pub mod cell;
pub mod column;
pub mod error;
pub mod options;
pub mod schema;
pub mod table;

pub use cell::{BuiltinCode, Cell, CodeValue, Interval};
pub use column::{AnnotationDb, Column};
pub use error::{ModelError, SchemaError};
pub use options::FlattenOptions;
pub use schema::{ColumnRole, Schema};
pub use table::{FlatTable, Row};
