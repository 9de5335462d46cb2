//! Options controlling how rows are emitted.

use serde::{Deserialize, Serialize};

/// Options for the flattening engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlattenOptions {
    /// Placeholder written for every code of a sequential column with no cell in the row.
    pub blank_value: String,

    /// Emit one padded row for an innermost nested cell that contains no sequential cells.
    ///
    /// When false such cells contribute no rows.
    pub ensure_rows_per_nested_cell: bool,
}

impl FlattenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_blank_value(mut self, blank: impl Into<String>) -> Self {
        self.blank_value = blank.into();
        self
    }

    #[must_use]
    pub fn with_ensure_rows(mut self, enable: bool) -> Self {
        self.ensure_rows_per_nested_cell = enable;
        self
    }
}
