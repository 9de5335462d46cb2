//! Columns and annotation databases.

use std::sync::Arc;

use crate::cell::Cell;

/// A named, ordered sequence of cells sharing one declared code set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    name: Arc<str>,
    code_names: Vec<String>,
    cells: Vec<Cell>,
}

impl Column {
    pub fn new<I, S>(name: &str, code_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: Arc::from(name),
            code_names: code_names.into_iter().map(Into::into).collect(),
            cells: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared code names, in declaration order.
    pub fn code_names(&self) -> &[String] {
        &self.code_names
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Append a cell, making this column its owner.
    pub fn push_cell(&mut self, mut cell: Cell) {
        cell.set_column(Arc::clone(&self.name));
        self.cells.push(cell);
    }

    /// Builder-style [`Column::push_cell`].
    #[must_use]
    pub fn with_cell(mut self, cell: Cell) -> Self {
        self.push_cell(cell);
        self
    }

    /// Stable-sort cells by onset and renumber ordinals from 1.
    pub fn order_by_onset(&mut self) {
        self.cells.sort_by_key(Cell::onset);
        for (index, cell) in self.cells.iter_mut().enumerate() {
            cell.set_ordinal(u32::try_from(index + 1).unwrap_or(u32::MAX));
        }
    }
}

/// One loaded annotation file: a set of named columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationDb {
    source: String,
    columns: Vec<Column>,
}

impl AnnotationDb {
    /// Create an empty database; `source` labels it in logs and errors.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            columns: Vec::new(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Find a column by exact name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name() == name)
    }

    pub fn push_column(&mut self, column: Column) {
        self.columns.push(column);
    }

    #[must_use]
    pub fn with_column(mut self, column: Column) -> Self {
        self.push_column(column);
        self
    }
}
