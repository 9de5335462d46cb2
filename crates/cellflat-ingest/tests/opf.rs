//! Integration tests for loading zip-packaged `.opf` files.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use cellflat_ingest::{IngestError, list_annotation_files, load_database};
use cellflat_model::CodeValue;
use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

const DB_TEXT: &str = "#4
ID (MATRIX,true,)-sub|NOMINAL,sex|NOMINAL
00:00:00:000,00:00:00:000,(5,F)
Trials (MATRIX,true,)-x|NOMINAL
00:00:00:000,00:00:00:100,(a)
00:00:00:200,00:00:00:300,(b)
Looks (MATRIX,true,)-direction|NOMINAL
00:00:00:010,00:00:00:020,(left)
";

fn write_opf(path: &Path, entries: &[(&str, &str)]) {
    let file = File::create(path).expect("create opf");
    let mut writer = ZipWriter::new(file);
    for (name, contents) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .expect("start entry");
        writer.write_all(contents.as_bytes()).expect("write entry");
    }
    writer.finish().expect("finish archive");
}

#[test]
fn loads_db_entry_from_archive() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("infant01.opf");
    write_opf(&path, &[("project", "name: infant01\n"), ("db", DB_TEXT)]);

    let db = load_database(&path).expect("load opf");
    assert_eq!(db.source(), "infant01.opf");

    let names: Vec<&str> = db.columns().iter().map(|c| c.name()).collect();
    assert_eq!(names, ["ID", "Trials", "Looks"]);

    let trials = db.column("Trials").expect("Trials column");
    assert_eq!(trials.len(), 2);
    assert_eq!(trials.cells()[1].ordinal(), 2);
    assert_eq!(trials.cells()[1].onset(), 200);
    assert_eq!(trials.cells()[1].column(), "Trials");

    let id = db.column("ID").expect("ID column");
    assert_eq!(id.cells()[0].code("sex"), Some(&CodeValue::text("F")));
}

#[test]
fn archive_without_db_entry_is_rejected() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("empty.opf");
    write_opf(&path, &[("project", "name: empty\n")]);

    let err = load_database(&path).unwrap_err();
    assert!(matches!(err, IngestError::MissingDbEntry { .. }));
}

#[test]
fn discovered_files_load_in_path_order() {
    let dir = TempDir::new().expect("temp dir");
    std::fs::create_dir_all(dir.path().join("cohort")).expect("mkdir");
    write_opf(&dir.path().join("cohort/b.opf"), &[("db", DB_TEXT)]);
    write_opf(&dir.path().join("a.opf"), &[("db", DB_TEXT)]);

    let files = list_annotation_files(dir.path(), "opf").expect("list");
    let sources: Vec<String> = files
        .iter()
        .map(|path| load_database(path).expect("load").source().to_string())
        .collect();
    assert_eq!(sources, ["a.opf", "b.opf"]);
}
