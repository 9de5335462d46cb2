use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use cellflat_cli::types::{ExportResult, FileSummary};

pub fn print_summary(result: &ExportResult) {
    println!("Input: {}", result.input_folder.display());
    println!("Output: {}", result.output_file.display());
    if result.files.is_empty() {
        println!("No annotation files found; wrote header only.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Nested cells"),
        header_cell("Rows"),
        header_cell("Padded"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);

    let mut total_nested = 0usize;
    let mut total_padded = 0usize;
    for summary in &result.files {
        total_nested += summary.nested_cells;
        total_padded += summary.padded_rows;
        table.add_row(vec![
            file_cell(&result.input_folder, summary),
            Cell::new(summary.nested_cells),
            rows_cell(summary.rows),
            padded_cell(summary.padded_rows),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total_nested).add_attribute(Attribute::Bold),
        Cell::new(result.total_rows).add_attribute(Attribute::Bold),
        padded_cell(total_padded).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

pub fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

/// Paths are shown relative to the input folder.
fn file_cell(input_folder: &Path, summary: &FileSummary) -> Cell {
    let shown = summary
        .path
        .strip_prefix(input_folder)
        .unwrap_or(&summary.path);
    Cell::new(shown.display())
}

fn rows_cell(rows: usize) -> Cell {
    if rows == 0 {
        Cell::new(rows).fg(Color::Yellow)
    } else {
        Cell::new(rows)
    }
}

fn padded_cell(padded: usize) -> Cell {
    if padded == 0 {
        dim_cell(padded)
    } else {
        Cell::new(padded)
    }
}
