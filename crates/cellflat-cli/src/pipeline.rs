//! Export pipeline: discover, load, flatten, accumulate, write.
//!
//! Files are processed one at a time into a single in-memory table. The
//! output file is written once, after every input file has flattened, so a
//! failure anywhere leaves no output behind.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use cellflat_core::Flattener;
use cellflat_ingest::{list_annotation_files, load_database};
use cellflat_model::FlatTable;
use indicatif::ProgressBar;
use tracing::{info, info_span, warn};

use crate::config::{ConfigError, ExportConfig};
use crate::types::{ExportResult, FileSummary};

/// A validated export, ready to run.
#[derive(Debug)]
pub struct ExportPlan {
    pub input_folder: PathBuf,
    pub output_file: PathBuf,
    pub extension: String,
    pub delimiter: u8,
    pub flattener: Flattener,
}

impl ExportPlan {
    /// Validate the configuration and build the flattener.
    pub fn from_config(config: &ExportConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let delimiter = config.delimiter_byte()?;
        let flattener = Flattener::new(config.schema.clone(), config.flatten_options())?;
        Ok(Self {
            input_folder: config.input_folder.clone(),
            output_file: config.output_file.clone(),
            extension: config.extension.clone(),
            delimiter,
            flattener,
        })
    }
}

/// List input files in processing order.
pub fn discover(plan: &ExportPlan) -> Result<Vec<PathBuf>> {
    let files = list_annotation_files(&plan.input_folder, &plan.extension)
        .with_context(|| format!("discover input files in {}", plan.input_folder.display()))?;
    if files.is_empty() {
        warn!(
            folder = %plan.input_folder.display(),
            extension = %plan.extension,
            "no annotation files found"
        );
    }
    Ok(files)
}

/// Load and flatten one file, appending its rows to `table`.
pub fn flatten_file(plan: &ExportPlan, path: &Path, table: &mut FlatTable) -> Result<FileSummary> {
    let span = info_span!("file", path = %path.display());
    let _guard = span.enter();
    info!("flattening file");

    let db = load_database(path).with_context(|| format!("load {}", path.display()))?;
    let outcome = plan
        .flattener
        .flatten(&db)
        .with_context(|| format!("flatten {}", path.display()))?;

    let summary = FileSummary {
        path: path.to_path_buf(),
        nested_cells: outcome.nested_cells,
        rows: outcome.rows.len(),
        padded_rows: outcome.padded_rows,
    };
    table.extend_rows(outcome.rows);
    Ok(summary)
}

/// Run a full export. Nothing is written unless every file succeeds.
pub fn run_export(plan: &ExportPlan, progress: &ProgressBar) -> Result<ExportResult> {
    let start = Instant::now();
    let files = discover(plan)?;
    progress.set_length(files.len() as u64);

    let mut table = plan.flattener.new_table();
    let mut summaries = Vec::with_capacity(files.len());
    for path in &files {
        progress.set_message(display_name(path));
        summaries.push(flatten_file(plan, path, &mut table)?);
        progress.inc(1);
    }
    progress.finish_and_clear();

    cellflat_output::write_table_file(&plan.output_file, &table, plan.delimiter)
        .with_context(|| format!("write {}", plan.output_file.display()))?;

    info!(
        files = files.len(),
        rows = table.len(),
        duration_ms = start.elapsed().as_millis(),
        "export complete"
    );

    Ok(ExportResult {
        input_folder: plan.input_folder.clone(),
        output_file: plan.output_file.clone(),
        files: summaries,
        total_rows: table.len(),
    })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
