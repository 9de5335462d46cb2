//! Delimited text writer.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use cellflat_model::FlatTable;
use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::error::{OutputError, Result};

/// Default field separator.
pub const DEFAULT_DELIMITER: &str = ",";

/// Validate a configured delimiter and return its byte.
pub fn parse_delimiter(value: &str) -> Result<u8> {
    match value.as_bytes() {
        [byte] if byte.is_ascii() => Ok(*byte),
        _ => Err(OutputError::InvalidDelimiter(value.to_string())),
    }
}

/// Write the header line followed by one line per row.
///
/// Fields are quoted only when they contain the delimiter, a quote or a line break.
/// A row made of one empty field is written as an empty line.
pub fn write_table<W: Write>(writer: W, table: &FlatTable, delimiter: u8) -> Result<()> {
    let mut out = WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    out.write_record(table.header())?;
    for row in table.rows() {
        match row.as_slice() {
            // A lone empty field would otherwise be written as `""`.
            [field] if field.is_empty() => {
                out.flush().map_err(csv::Error::from)?;
                out.get_mut().write_all(b"\n").map_err(csv::Error::from)?;
            }
            _ => out.write_record(row)?,
        }
    }
    out.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write a table to `path`.
///
/// The table is written to a temporary sibling and renamed into place, so
/// the target either holds the complete table or is left untouched.
pub fn write_table_file(path: &Path, table: &FlatTable, delimiter: u8) -> Result<()> {
    let temp_path = temp_path_for(path)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| OutputError::Io {
            operation: "create directory",
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let result = write_temp(&temp_path, table, delimiter).and_then(|()| {
        fs::rename(&temp_path, path).map_err(|e| OutputError::AtomicWriteFailed {
            temp_path: temp_path.clone(),
            target_path: path.to_path_buf(),
            source: e,
        })
    });
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
        return result;
    }

    tracing::info!(
        path = %path.display(),
        rows = table.len(),
        "wrote table"
    );
    Ok(())
}

fn write_temp(temp_path: &Path, table: &FlatTable, delimiter: u8) -> Result<()> {
    let mut file = File::create(temp_path).map_err(|e| OutputError::Io {
        operation: "create",
        path: temp_path.to_path_buf(),
        source: e,
    })?;
    write_table(&mut file, table, delimiter)?;
    file.sync_all().map_err(|e| OutputError::Io {
        operation: "sync",
        path: temp_path.to_path_buf(),
        source: e,
    })
}

fn temp_path_for(path: &Path) -> Result<PathBuf> {
    let Some(name) = path.file_name() else {
        return Err(OutputError::Io {
            operation: "create",
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
        });
    };
    let mut temp_name = name.to_os_string();
    temp_name.push(".tmp");
    Ok(path.with_file_name(temp_name))
}
