//! Accumulated flat output.

/// One output record: rendered field values in header order.
pub type Row = Vec<String>;

/// Header plus rows collected across every input file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatTable {
    header: Vec<String>,
    rows: Vec<Row>,
}

impl FlatTable {
    pub fn new(header: Vec<String>) -> Self {
        Self {
            header,
            rows: Vec::new(),
        }
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of fields per row.
    pub fn width(&self) -> usize {
        self.header.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push_row(&mut self, row: Row) {
        debug_assert_eq!(row.len(), self.header.len(), "row width must match header");
        self.rows.push(row);
    }

    pub fn extend_rows(&mut self, rows: impl IntoIterator<Item = Row>) {
        for row in rows {
            self.push_row(row);
        }
    }
}
