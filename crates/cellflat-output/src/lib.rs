//! Output generation for flattened annotation tables.
//!
//! Delimited text (header line plus one line per row), written atomically.

mod delimited;
mod error;

pub use delimited::{DEFAULT_DELIMITER, parse_delimiter, write_table, write_table_file};
pub use error::{OutputError, Result};
