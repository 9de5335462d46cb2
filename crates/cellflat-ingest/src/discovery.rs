//! Annotation file discovery.

use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};

/// Extension of Datavyu project files.
pub const DEFAULT_EXTENSION: &str = "opf";

/// Lists every file under `root` (recursively) with the given extension.
///
/// The extension match is case-insensitive and ignores a leading dot.
/// Returns paths sorted so that repeated runs visit files in the same order.
pub fn list_annotation_files(root: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: root.to_path_buf(),
        });
    }

    let extension = extension.trim_start_matches('.');
    let mut files = Vec::new();
    collect_files(root, extension, &mut files)?;
    files.sort();

    tracing::debug!(
        root = %root.display(),
        file_count = files.len(),
        "discovered annotation files"
    );
    Ok(files)
}

fn collect_files(dir: &Path, extension: &str, files: &mut Vec<PathBuf>) -> Result<()> {
    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let path = entry.path();
        if path.is_dir() {
            collect_files(&path, extension, files)?;
            continue;
        }
        if !path.is_file() {
            continue;
        }

        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));

        if matches {
            files.push(path);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("infants/visit2")).unwrap();

        for name in &[
            "b_session.opf",
            "a_session.OPF",
            "notes.txt",
            "infants/c_session.opf",
            "infants/visit2/d_session.opf",
            "infants/visit2/export.csv",
        ] {
            std::fs::write(dir.path().join(name), "#4\n").unwrap();
        }

        dir
    }

    #[test]
    fn test_list_annotation_files_recurses() {
        let dir = create_test_dir();
        let files = list_annotation_files(dir.path(), "opf").unwrap();

        let names: Vec<String> = files
            .iter()
            .map(|p| {
                p.strip_prefix(dir.path())
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();
        assert_eq!(
            names,
            [
                "a_session.OPF",
                "b_session.opf",
                "infants/c_session.opf",
                "infants/visit2/d_session.opf",
            ]
        );
    }

    #[test]
    fn test_leading_dot_in_extension() {
        let dir = create_test_dir();
        let files = list_annotation_files(dir.path(), ".csv").unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_missing_directory() {
        let dir = TempDir::new().unwrap();
        let result = list_annotation_files(&dir.path().join("nope"), "opf");
        assert!(matches!(result, Err(IngestError::DirectoryNotFound { .. })));
    }
}
