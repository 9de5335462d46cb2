//! Parser for Datavyu database text (format version 4).
//!
//! ```text
//! #4
//! ID (MATRIX,true,)-sub|NOMINAL,sex|NOMINAL
//! 00:00:00:000,00:00:00:000,(5,F)
//! Notes (TEXT,true,)
//! 00:00:01:500,00:00:02:000,free text\, with a comma
//! ```
//!
//! Matrix columns declare their codes after the `-`. Every other column type
//! carries a single code named `val`. A backslash escapes the next character.

use std::path::Path;

use cellflat_model::{AnnotationDb, Cell, Column, Interval, ModelError};

use crate::error::{IngestError, Result};

const SUPPORTED_VERSION: &str = "4";
const MATRIX_TYPE: &str = "MATRIX";
const SINGLE_VALUE_CODE: &str = "val";

enum CellError {
    Syntax(String),
    Interval(ModelError),
}

struct ColumnBuilder {
    column: Column,
    is_matrix: bool,
}

/// Parse database text. `path` is used for the source label and error context.
pub fn parse_database(text: &str, path: &Path) -> Result<AnnotationDb> {
    let source = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let mut db = AnnotationDb::new(source);

    let mut lines = text
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty());

    match lines.next() {
        Some((_, header)) if header.starts_with('#') => {
            let version = header[1..].trim();
            if version != SUPPORTED_VERSION {
                return Err(IngestError::UnsupportedVersion {
                    path: path.to_path_buf(),
                    version: version.to_string(),
                });
            }
        }
        _ => {
            return Err(IngestError::MissingVersionHeader {
                path: path.to_path_buf(),
            });
        }
    }

    let mut current: Option<ColumnBuilder> = None;
    for (line_no, line) in lines {
        let parse_err = |reason: String| IngestError::Parse {
            path: path.to_path_buf(),
            line: line_no,
            reason,
        };

        if let Some(fields) = split_cell_line(line) {
            let (onset, offset, values) = fields.map_err(parse_err)?;
            let Some(builder) = current.as_mut() else {
                return Err(parse_err(
                    "cell appears before any column declaration".to_string(),
                ));
            };
            let cell = parse_cell(builder, onset, offset, values).map_err(|e| match e {
                CellError::Syntax(reason) => parse_err(reason),
                CellError::Interval(source) => IngestError::InvalidCell {
                    path: path.to_path_buf(),
                    line: line_no,
                    source,
                },
            })?;
            builder.column.push_cell(cell);
        } else {
            if let Some(done) = current.take() {
                db.push_column(finish_column(done));
            }
            current = Some(parse_declaration(line).map_err(parse_err)?);
        }
    }
    if let Some(done) = current.take() {
        db.push_column(finish_column(done));
    }

    Ok(db)
}

fn finish_column(builder: ColumnBuilder) -> Column {
    let mut column = builder.column;
    column.order_by_onset();
    column
}

/// Split `onset,offset,rest`.
///
/// Returns `None` when the line does not start with a timestamp-shaped
/// field, i.e. it is a column declaration.
fn split_cell_line(line: &str) -> Option<std::result::Result<(i64, i64, &str), String>> {
    let (onset, rest) = line.split_once(',')?;
    let shape = onset.trim();
    if !shape.contains(':') || !shape.bytes().all(|b| b.is_ascii_digit() || b == b':') {
        return None;
    }
    Some(parse_cell_bounds(onset, rest))
}

fn parse_cell_bounds<'a>(
    onset: &str,
    rest: &'a str,
) -> std::result::Result<(i64, i64, &'a str), String> {
    let onset = parse_timestamp(onset)?;
    let (offset, rest) = rest
        .split_once(',')
        .ok_or_else(|| "cell line is missing its offset".to_string())?;
    let offset = parse_timestamp(offset)?;
    Ok((onset, offset, rest))
}

/// Parse `HH:MM:SS:mmm` into milliseconds.
fn parse_timestamp(value: &str) -> std::result::Result<i64, String> {
    let parts: Vec<&str> = value.trim().split(':').collect();
    let malformed = || format!("malformed timestamp '{value}'");
    let [hours, minutes, seconds, millis] = parts.as_slice() else {
        return Err(malformed());
    };
    let field = |text: &str| {
        if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        text.parse::<i64>().map_err(|_| malformed())
    };
    let (hours, minutes, seconds, millis) =
        (field(*hours)?, field(*minutes)?, field(*seconds)?, field(*millis)?);
    if minutes >= 60 || seconds >= 60 || millis >= 1000 {
        return Err(malformed());
    }
    hours
        .checked_mul(60)
        .and_then(|m| m.checked_add(minutes))
        .and_then(|m| m.checked_mul(60))
        .and_then(|s| s.checked_add(seconds))
        .and_then(|s| s.checked_mul(1000))
        .and_then(|ms| ms.checked_add(millis))
        .ok_or_else(malformed)
}

/// Parse `Name (TYPE,visible,comment)-code|KIND,code|KIND`.
fn parse_declaration(line: &str) -> std::result::Result<ColumnBuilder, String> {
    let (name, rest) = line
        .split_once(" (")
        .ok_or_else(|| format!("expected column declaration, found '{line}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err("column declaration has an empty name".to_string());
    }
    let (attributes, codes) = rest
        .split_once(')')
        .ok_or_else(|| format!("unterminated attributes in declaration of '{name}'"))?;
    let column_type = attributes.split(',').next().unwrap_or("").trim();

    if column_type.eq_ignore_ascii_case(MATRIX_TYPE) {
        let code_names: Vec<String> = match codes.strip_prefix('-') {
            Some(list) if !list.trim().is_empty() => list
                .split(',')
                .map(|code| code.split('|').next().unwrap_or("").trim().to_string())
                .collect(),
            _ => Vec::new(),
        };
        if let Some(empty) = code_names.iter().position(String::is_empty) {
            return Err(format!(
                "code {} of column '{name}' has an empty name",
                empty + 1
            ));
        }
        Ok(ColumnBuilder {
            column: Column::new(name, code_names),
            is_matrix: true,
        })
    } else {
        Ok(ColumnBuilder {
            column: Column::new(name, [SINGLE_VALUE_CODE]),
            is_matrix: false,
        })
    }
}

fn parse_cell(
    builder: &ColumnBuilder,
    onset: i64,
    offset: i64,
    values: &str,
) -> std::result::Result<Cell, CellError> {
    let column = &builder.column;
    let values = if builder.is_matrix {
        let inner = values
            .strip_prefix('(')
            .and_then(|v| v.strip_suffix(')'))
            .ok_or_else(|| {
                CellError::Syntax(format!(
                    "expected parenthesised values for matrix column '{}'",
                    column.name()
                ))
            })?;
        let mut fields = split_escaped(inner);
        if column.code_names().is_empty() && fields.len() == 1 && fields[0].is_empty() {
            fields.clear();
        }
        fields
    } else {
        vec![unescape(values)]
    };

    if values.len() > column.code_names().len() {
        return Err(CellError::Syntax(format!(
            "cell has {} values but column '{}' declares {} codes",
            values.len(),
            column.name(),
            column.code_names().len()
        )));
    }

    let interval = Interval::new(onset, offset).map_err(CellError::Interval)?;
    let mut cell = Cell::new(0, interval);
    for (name, value) in column.code_names().iter().zip(values) {
        cell.set_code(name.clone(), value);
    }
    Ok(cell)
}

fn split_escaped(text: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                if let Some(next) = chars.next() {
                    field.push(next);
                }
            }
            ',' => fields.push(std::mem::take(&mut field)),
            other => field.push(other),
        }
    }
    fields.push(field);
    fields
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellflat_model::CodeValue;

    fn parse(text: &str) -> Result<AnnotationDb> {
        parse_database(text, Path::new("session.opf"))
    }

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp("00:00:00:000"), Ok(0));
        assert_eq!(parse_timestamp("01:02:03:004"), Ok(3_723_004));
        assert!(parse_timestamp("00:61:00:000").is_err());
        assert!(parse_timestamp("00:00:00").is_err());
        assert!(parse_timestamp("aa:00:00:000").is_err());
        assert!(parse_timestamp("1000000000000000:00:00:000").is_err());
        assert!(parse_timestamp("99999999999999999999:00:00:000").is_err());
    }

    #[test]
    fn test_oversized_hours_is_parse_error() {
        let err = parse(
            "#4\nTrials (MATRIX,true,)-x|NOMINAL\n1000000000000000:00:00:000,1000000000000000:00:00:000,(a)\n",
        )
        .unwrap_err();
        match err {
            IngestError::Parse { line, reason, .. } => {
                assert_eq!(line, 3);
                assert!(reason.starts_with("malformed timestamp"), "{reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_matrix_and_text_columns() {
        let db = parse(
            "#4\n\
             ID (MATRIX,true,)-sub|NOMINAL,sex|NOMINAL\n\
             00:00:00:000,00:00:00:000,(5,F)\n\
             Notes (TEXT,true,)\n\
             00:00:01:500,00:00:02:000,free text\\, with a comma\n",
        )
        .unwrap();

        let id = db.column("ID").unwrap();
        assert_eq!(id.code_names(), ["sub", "sex"]);
        let cell = &id.cells()[0];
        assert_eq!(cell.code("sub"), Some(&CodeValue::text("5")));
        assert_eq!(cell.code("sex"), Some(&CodeValue::text("F")));

        let notes = db.column("Notes").unwrap();
        assert_eq!(notes.code_names(), ["val"]);
        let cell = &notes.cells()[0];
        assert_eq!((cell.onset(), cell.offset()), (1500, 2000));
        assert_eq!(cell.code("val"), Some(&CodeValue::text("free text, with a comma")));
    }

    #[test]
    fn test_cells_ordered_by_onset_with_ordinals() {
        let db = parse(
            "#4\n\
             Looks (MATRIX,true,)-direction|NOMINAL\n\
             00:00:00:300,00:00:00:400,(right)\n\
             00:00:00:100,00:00:00:200,(left)\n",
        )
        .unwrap();

        let looks = db.column("Looks").unwrap();
        let summary: Vec<(u32, String)> = looks
            .cells()
            .iter()
            .map(|c| (c.ordinal(), c.code("direction").unwrap().to_string()))
            .collect();
        assert_eq!(
            summary,
            [(1, "left".to_string()), (2, "right".to_string())]
        );
    }

    #[test]
    fn test_short_cells_lack_trailing_codes() {
        let db = parse(
            "#4\nTrials (MATRIX,true,)-x|NOMINAL,cond|NOMINAL\n00:00:00:000,00:00:01:000,(a)\n",
        )
        .unwrap();
        let cell = &db.column("Trials").unwrap().cells()[0];
        assert_eq!(cell.code("x"), Some(&CodeValue::text("a")));
        assert_eq!(cell.code("cond"), None);
    }

    #[test]
    fn test_escaped_parentheses() {
        let db = parse(
            "#4\nTrials (MATRIX,true,)-x|NOMINAL\n00:00:00:000,00:00:01:000,(f\\(x\\))\n",
        )
        .unwrap();
        let cell = &db.column("Trials").unwrap().cells()[0];
        assert_eq!(cell.code("x"), Some(&CodeValue::text("f(x)")));
    }

    #[test]
    fn test_too_many_values_is_parse_error() {
        let err = parse(
            "#4\nTrials (MATRIX,true,)-x|NOMINAL\n00:00:00:000,00:00:01:000,(a,b)\n",
        )
        .unwrap_err();
        assert!(matches!(err, IngestError::Parse { line: 3, .. }));
    }

    #[test]
    fn test_inverted_interval_is_rejected() {
        let err = parse(
            "#4\nTrials (MATRIX,true,)-x|NOMINAL\n00:00:02:000,00:00:01:000,(a)\n",
        )
        .unwrap_err();
        assert!(matches!(err, IngestError::InvalidCell { line: 3, .. }));
    }

    #[test]
    fn test_version_header_required() {
        assert!(matches!(
            parse("ID (MATRIX,true,)-sub|NOMINAL\n"),
            Err(IngestError::MissingVersionHeader { .. })
        ));
        assert!(matches!(
            parse("#2\n"),
            Err(IngestError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn test_cell_before_declaration() {
        let err = parse("#4\n00:00:00:000,00:00:01:000,(a)\n").unwrap_err();
        assert!(matches!(err, IngestError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_empty_column_is_kept() {
        let db = parse("#4\nLooks (MATRIX,true,)-direction|NOMINAL\n").unwrap();
        assert!(db.column("Looks").unwrap().is_empty());
    }
}
