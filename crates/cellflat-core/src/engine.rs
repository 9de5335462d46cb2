//! The flattening engine.
//!
//! Per file the engine extracts static values once, then either walks the
//! sequential columns directly (no nested columns) or walks the innermost
//! nested column, resolving outer ancestors and sequential children by
//! interval containment.

use cellflat_model::{
    AnnotationDb, Cell, CodeValue, Column, FlatTable, FlattenOptions, Row, Schema, SchemaError,
};
use tracing::{debug, debug_span};

use crate::containment::{contained_cells, find_container};
use crate::error::{FlattenError, Result};
use crate::extract::extract_codes;
use crate::row::{RowLayout, SequentialSlot};

/// Rows produced from one annotation file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlattenOutcome {
    pub rows: Vec<Row>,
    /// Cells visited in the innermost nested column (0 when there is none).
    pub nested_cells: usize,
    /// Blank-padded rows emitted for nested cells without sequential children.
    pub padded_rows: usize,
}

/// Flattens annotation databases according to one validated schema.
#[derive(Debug, Clone)]
pub struct Flattener {
    schema: Schema,
    options: FlattenOptions,
    layout: RowLayout,
}

impl Flattener {
    /// Validate `schema` and prepare the row layout.
    pub fn new(schema: Schema, options: FlattenOptions) -> std::result::Result<Self, SchemaError> {
        schema.validate()?;
        let layout = RowLayout::new(&schema, options.blank_value.clone());
        Ok(Self {
            schema,
            options,
            layout,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn options(&self) -> &FlattenOptions {
        &self.options
    }

    pub fn header(&self) -> &[String] {
        self.layout.header()
    }

    /// An empty table with this schema's header.
    pub fn new_table(&self) -> FlatTable {
        FlatTable::new(self.layout.header().to_vec())
    }

    /// Flatten one database into rows.
    pub fn flatten(&self, db: &AnnotationDb) -> Result<FlattenOutcome> {
        let span = debug_span!("flatten", source = %db.source());
        let _guard = span.enter();

        let static_values = self.static_values(db)?;
        let sequential = resolve_columns(db, &self.schema.sequential_columns)?;

        let outcome = match self.schema.nested_columns.split_last() {
            None => self.flatten_sequential_only(&static_values, &sequential)?,
            Some((inner, outer)) => {
                let inner = resolve_column(db, inner)?;
                let outer = resolve_columns(db, outer)?;
                self.flatten_nested(&static_values, inner, &outer, &sequential)?
            }
        };

        debug!(
            rows = outcome.rows.len(),
            nested_cells = outcome.nested_cells,
            padded_rows = outcome.padded_rows,
            "flattened database"
        );
        Ok(outcome)
    }

    /// First-cell codes of every static column, concatenated in schema order.
    fn static_values(&self, db: &AnnotationDb) -> Result<Vec<CodeValue>> {
        let mut values = Vec::new();
        for name in &self.schema.static_columns {
            let column = resolve_column(db, name)?;
            let cell = column
                .cells()
                .first()
                .ok_or_else(|| FlattenError::MissingStaticCell {
                    column: name.clone(),
                })?;
            values.extend(self.codes_of(cell, column)?);
        }
        Ok(values)
    }

    /// Every sequential cell becomes a row; no containment filter applies.
    fn flatten_sequential_only(
        &self,
        static_values: &[CodeValue],
        sequential: &[&Column],
    ) -> Result<FlattenOutcome> {
        let mut outcome = FlattenOutcome::default();
        for (index, column) in sequential.iter().enumerate() {
            for cell in column.cells() {
                let values = self.codes_of(cell, column)?;
                outcome.rows.push(self.layout.build_row(
                    static_values,
                    &[],
                    &[],
                    Some(SequentialSlot {
                        index,
                        values: &values,
                    }),
                ));
            }
        }
        Ok(outcome)
    }

    fn flatten_nested(
        &self,
        static_values: &[CodeValue],
        inner: &Column,
        outer: &[&Column],
        sequential: &[&Column],
    ) -> Result<FlattenOutcome> {
        let mut outcome = FlattenOutcome::default();

        for icell in inner.cells() {
            let inner_values = self.codes_of(icell, inner)?;

            let mut outer_values = Vec::new();
            for column in outer {
                let ocell = find_container(icell, column)?;
                outer_values.extend(self.codes_of(ocell, column)?);
            }

            let mut rows_added = 0usize;
            for (index, column) in sequential.iter().enumerate() {
                for scell in contained_cells(icell, column) {
                    let values = self.codes_of(scell, column)?;
                    outcome.rows.push(self.layout.build_row(
                        static_values,
                        &outer_values,
                        &inner_values,
                        Some(SequentialSlot {
                            index,
                            values: &values,
                        }),
                    ));
                    rows_added += 1;
                }
            }

            if rows_added == 0 && self.options.ensure_rows_per_nested_cell {
                outcome.rows.push(self.layout.build_row(
                    static_values,
                    &outer_values,
                    &inner_values,
                    None,
                ));
                outcome.padded_rows += 1;
            }

            debug!(
                column = %inner.name(),
                ordinal = icell.ordinal(),
                rows_added,
                "nested cell"
            );
            outcome.nested_cells += 1;
        }

        Ok(outcome)
    }

    fn codes_of(&self, cell: &Cell, column: &Column) -> Result<Vec<CodeValue>> {
        extract_codes(cell, self.schema.codes(column.name()))
    }
}

fn resolve_column<'a>(db: &'a AnnotationDb, name: &str) -> Result<&'a Column> {
    db.column(name).ok_or_else(|| FlattenError::MissingColumn {
        column: name.to_string(),
    })
}

fn resolve_columns<'a>(db: &'a AnnotationDb, names: &[String]) -> Result<Vec<&'a Column>> {
    names.iter().map(|name| resolve_column(db, name)).collect()
}
