//! Annotation file ingestion.
//!
//! This crate finds annotation databases under an input folder and loads
//! them into the [`cellflat_model::AnnotationDb`] model.
//!
//! # Features
//!
//! - **Discovery**: Recursive, extension-filtered, deterministically ordered
//! - **OPF Loading**: Zip-packaged `.opf` files or bare database text
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use cellflat_ingest::{list_annotation_files, load_database};
//!
//! for path in list_annotation_files(Path::new("sessions"), "opf")? {
//!     let db = load_database(&path)?;
//!     println!("{}: {} columns", db.source(), db.columns().len());
//! }
//! ```

mod discovery;
mod error;
mod opf;

// === Error Types ===
pub use error::{IngestError, Result};

// === File Discovery ===
pub use discovery::{DEFAULT_EXTENSION, list_annotation_files};

// === Database Loading ===
pub use opf::{load_database, parse_database};
