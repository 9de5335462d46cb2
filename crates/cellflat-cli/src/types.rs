use std::path::PathBuf;

#[derive(Debug)]
pub struct ExportResult {
    pub input_folder: PathBuf,
    pub output_file: PathBuf,
    pub files: Vec<FileSummary>,
    pub total_rows: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSummary {
    pub path: PathBuf,
    pub nested_cells: usize,
    pub rows: usize,
    pub padded_rows: usize,
}
