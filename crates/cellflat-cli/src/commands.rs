use std::io::{self, IsTerminal};
use std::time::Duration;

use anyhow::{Context, Result};
use cellflat_cli::config::ExportConfig;
use cellflat_cli::pipeline::{self, ExportPlan};
use cellflat_cli::types::ExportResult;
use cellflat_ingest::load_database;
use comfy_table::{Cell, CellAlignment, Table};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info_span;

use crate::cli::{ExportArgs, InspectArgs};
use crate::summary::{align_column, apply_table_style, dim_cell, header_cell};

pub fn run_export(args: &ExportArgs, quiet: bool) -> Result<ExportResult> {
    let plan = load_plan(args)?;
    let span = info_span!("export", output = %plan.output_file.display());
    let _guard = span.enter();

    let progress = progress_bar(quiet);
    let result = pipeline::run_export(&plan, &progress);
    if result.is_err() {
        progress.abandon();
    }
    result
}

pub fn run_header(args: &ExportArgs) -> Result<()> {
    let plan = load_plan(args)?;
    let table = plan.flattener.new_table();
    cellflat_output::write_table(io::stdout().lock(), &table, plan.delimiter)
        .context("write header")?;
    Ok(())
}

pub fn run_inspect(args: &InspectArgs) -> Result<()> {
    let db = load_database(&args.file).with_context(|| format!("load {}", args.file.display()))?;

    println!("Database: {}", args.file.display());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Codes"),
        header_cell("Cells"),
        header_cell("First onset"),
        header_cell("Last offset"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for column in db.columns() {
        let first_onset = column.cells().first().map(|cell| cell.onset());
        let last_offset = column.cells().iter().map(|cell| cell.offset()).max();
        table.add_row(vec![
            Cell::new(column.name()),
            Cell::new(column.code_names().join(", ")),
            Cell::new(column.len()),
            optional_cell(first_onset),
            optional_cell(last_offset),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn load_plan(args: &ExportArgs) -> Result<ExportPlan> {
    let mut config = ExportConfig::load(&args.config)
        .with_context(|| format!("load config {}", args.config.display()))?;
    config.apply_overrides(args.overrides())?;
    let plan = ExportPlan::from_config(&config)
        .with_context(|| format!("validate config {}", args.config.display()))?;
    Ok(plan)
}

fn progress_bar(quiet: bool) -> ProgressBar {
    if quiet || !io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(0);
    if let Ok(style) = ProgressStyle::with_template("{spinner:.dim} [{bar:25}] {pos}/{len}  {msg}")
    {
        bar.set_style(style.progress_chars("=>-"));
    }
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

fn optional_cell(value: Option<i64>) -> Cell {
    match value {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}
