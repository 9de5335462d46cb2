//! Row assembly.

use cellflat_model::{CodeValue, Row, Schema};

/// Values for the one sequential column that produced the current row.
#[derive(Debug, Clone, Copy)]
pub struct SequentialSlot<'a> {
    /// Position of the column in the schema's sequential list.
    pub index: usize,
    pub values: &'a [CodeValue],
}

/// Field layout of output rows, derived once from the schema.
#[derive(Debug, Clone)]
pub struct RowLayout {
    header: Vec<String>,
    sequential_widths: Vec<usize>,
    blank: String,
}

impl RowLayout {
    pub fn new(schema: &Schema, blank: impl Into<String>) -> Self {
        let sequential_widths = schema
            .sequential_columns
            .iter()
            .map(|column| schema.codes(column).len())
            .collect();
        Self {
            header: schema.header(),
            sequential_widths,
            blank: blank.into(),
        }
    }

    /// Header fields in output order.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn width(&self) -> usize {
        self.header.len()
    }

    /// Concatenate static, outer, inner and sequential values into one row.
    ///
    /// Every sequential column other than `sequential.index` is filled with the
    /// blank value; `None` blanks all of them.
    pub fn build_row(
        &self,
        static_values: &[CodeValue],
        outer_values: &[CodeValue],
        inner_values: &[CodeValue],
        sequential: Option<SequentialSlot<'_>>,
    ) -> Row {
        let mut row = Vec::with_capacity(self.width());
        row.extend(
            static_values
                .iter()
                .chain(outer_values)
                .chain(inner_values)
                .map(ToString::to_string),
        );

        for (index, width) in self.sequential_widths.iter().copied().enumerate() {
            match sequential {
                Some(slot) if slot.index == index => {
                    debug_assert_eq!(slot.values.len(), width);
                    row.extend(slot.values.iter().map(ToString::to_string));
                }
                _ => row.extend(std::iter::repeat_n(self.blank.clone(), width)),
            }
        }

        row
    }
}
