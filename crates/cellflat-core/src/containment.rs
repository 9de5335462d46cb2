//! Containment lookups between columns.
//!
//! Columns carry no foreign keys; a cell's ancestors and children are the
//! cells whose intervals enclose it or that it encloses.

use cellflat_model::{Cell, Column};

use crate::error::{FlattenError, Result};

/// Find the cell in `candidates` whose interval contains `inner`.
///
/// Exactly one container is expected. When several cells qualify, the first
/// in column order is returned and a warning is logged.
pub fn find_container<'a>(inner: &Cell, candidates: &'a Column) -> Result<&'a Cell> {
    let mut matches = candidates
        .cells()
        .iter()
        .filter(|candidate| candidate.contains(inner));

    let container = matches
        .next()
        .ok_or_else(|| FlattenError::NoContainingCell {
            column: inner.column().to_string(),
            ordinal: inner.ordinal(),
            container: candidates.name().to_string(),
        })?;

    let extra = matches.count();
    if extra > 0 {
        tracing::warn!(
            column = %inner.column(),
            ordinal = inner.ordinal(),
            container_column = %candidates.name(),
            chosen = container.ordinal(),
            overlapping = extra + 1,
            "multiple containing cells, using the first"
        );
    }

    Ok(container)
}

/// Cells of `column` that lie within `outer`, in column order.
pub fn contained_cells<'a>(outer: &'a Cell, column: &'a Column) -> impl Iterator<Item = &'a Cell> {
    column.cells().iter().filter(move |cell| outer.contains(cell))
}
