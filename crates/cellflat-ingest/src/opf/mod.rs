//! Loading of `.opf` annotation databases.
//!
//! An `.opf` file is a zip archive whose `db` entry holds the database text.
//! Files without the zip signature are treated as bare database text.

mod parser;

use std::io::{Cursor, Read};
use std::path::Path;

use cellflat_model::{AnnotationDb, Column};
use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::{IngestError, Result};

pub use parser::parse_database;

const ZIP_SIGNATURE: &[u8] = b"PK\x03\x04";
const DB_ENTRY: &str = "db";

/// Load an annotation database from disk.
pub fn load_database(path: &Path) -> Result<AnnotationDb> {
    let bytes = std::fs::read(path).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let raw = if bytes.starts_with(ZIP_SIGNATURE) {
        read_db_entry(bytes, path)?
    } else {
        bytes
    };
    let text = String::from_utf8(raw).map_err(|e| IngestError::InvalidUtf8 {
        path: path.to_path_buf(),
        source: e,
    })?;

    let db = parse_database(&text, path)?;
    tracing::debug!(
        source = %db.source(),
        column_count = db.columns().len(),
        cell_count = db.columns().iter().map(Column::len).sum::<usize>(),
        "loaded annotation database"
    );
    Ok(db)
}

fn read_db_entry(bytes: Vec<u8>, path: &Path) -> Result<Vec<u8>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(|e| IngestError::Archive {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut entry = match archive.by_name(DB_ENTRY) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => {
            return Err(IngestError::MissingDbEntry {
                path: path.to_path_buf(),
            });
        }
        Err(e) => {
            return Err(IngestError::Archive {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    let mut raw = Vec::new();
    entry
        .read_to_end(&mut raw)
        .map_err(|e| IngestError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
    Ok(raw)
}
