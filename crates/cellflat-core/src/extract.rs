//! Code extraction from cells.

use cellflat_model::{BuiltinCode, Cell, CodeValue};

use crate::error::{FlattenError, Result};

/// Extract the requested codes from a cell, in request order.
///
/// `onset`, `offset` and `ordinal` come from the cell's builtin fields as
/// integers; every other name must be present in the cell's code map.
pub fn extract_codes(cell: &Cell, code_names: &[String]) -> Result<Vec<CodeValue>> {
    code_names
        .iter()
        .map(|name| extract_code(cell, name))
        .collect()
}

fn extract_code(cell: &Cell, name: &str) -> Result<CodeValue> {
    if let Some(builtin) = BuiltinCode::from_name(name) {
        return Ok(cell.builtin(builtin));
    }
    cell.code(name)
        .cloned()
        .ok_or_else(|| FlattenError::MissingCode {
            column: cell.column().to_string(),
            ordinal: cell.ordinal(),
            code: name.to_string(),
        })
}
