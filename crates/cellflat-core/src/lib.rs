//! Containment-driven flattening of nested interval annotations.
//!
//! The [`Flattener`] turns one [`cellflat_model::AnnotationDb`] into flat rows:
//! static columns contribute one value set per file, nested columns form a
//! containment chain from outermost to innermost, and each sequential cell
//! contained by an innermost nested cell yields its own row.
//!
//! # Example
//!
//! ```ignore
//! use cellflat_core::Flattener;
//!
//! let flattener = Flattener::new(schema, options)?;
//! let mut table = flattener.new_table();
//! for db in databases {
//!     table.extend_rows(flattener.flatten(&db)?.rows);
//! }
//! ```

pub mod containment;
pub mod engine;
pub mod error;
pub mod extract;
pub mod row;

pub use containment::{contained_cells, find_container};
pub use engine::{FlattenOutcome, Flattener};
pub use error::{FlattenError, Result};
pub use extract::extract_codes;
pub use row::{RowLayout, SequentialSlot};
