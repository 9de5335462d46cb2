//! Export schema: which columns play which role and which codes they contribute.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// Role of a column in the flattened output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    /// One value set per file, taken from the column's first cell.
    Static,
    /// Part of the containment chain, outermost to innermost.
    Nested,
    /// Repeats under the innermost nested cell, one row per cell.
    Sequential,
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Static => "static",
            Self::Nested => "nested",
            Self::Sequential => "sequential",
        })
    }
}

/// Column roles plus the ordered code list to extract from each column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Column name to ordered code names.
    #[serde(default)]
    pub code_map: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub static_columns: Vec<String>,
    /// Ordered outermost to innermost.
    #[serde(default)]
    pub nested_columns: Vec<String>,
    #[serde(default)]
    pub sequential_columns: Vec<String>,
}

impl Schema {
    /// Check that every role-list column is declared in `code_map`.
    pub fn validate(&self) -> Result<(), SchemaError> {
        for (role, column) in self.role_columns() {
            if !self.code_map.contains_key(column) {
                return Err(SchemaError::UnknownColumn {
                    role,
                    column: column.clone(),
                });
            }
        }
        Ok(())
    }

    /// Code names for a column; empty if the column is undeclared.
    pub fn codes(&self, column: &str) -> &[String] {
        self.code_map
            .get(column)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All role-list columns in header order: static, nested, sequential.
    pub fn role_columns(&self) -> impl Iterator<Item = (ColumnRole, &String)> {
        let statics = self.static_columns.iter().map(|c| (ColumnRole::Static, c));
        let nested = self.nested_columns.iter().map(|c| (ColumnRole::Nested, c));
        let sequential = self
            .sequential_columns
            .iter()
            .map(|c| (ColumnRole::Sequential, c));
        statics.chain(nested).chain(sequential)
    }

    /// Header fields `<column>_<code>` in header order.
    pub fn header(&self) -> Vec<String> {
        self.role_columns()
            .flat_map(|(_, column)| {
                self.codes(column)
                    .iter()
                    .map(move |code| format!("{column}_{code}"))
            })
            .collect()
    }

    /// Total number of fields in every output row.
    pub fn width(&self) -> usize {
        self.role_columns()
            .map(|(_, column)| self.codes(column).len())
            .sum()
    }
}
