//! Cells, their intervals and code values.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::ModelError;

/// A closed time range `[onset, offset]` in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    onset: i64,
    offset: i64,
}

impl Interval {
    /// Create an interval, rejecting negative or inverted bounds.
    pub fn new(onset: i64, offset: i64) -> Result<Self, ModelError> {
        if onset < 0 || onset > offset {
            return Err(ModelError::InvalidInterval { onset, offset });
        }
        Ok(Self { onset, offset })
    }

    pub fn onset(&self) -> i64 {
        self.onset
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Returns true if `other` lies entirely within this interval.
    ///
    /// Both bounds are inclusive, so an interval contains itself.
    pub fn contains(&self, other: &Interval) -> bool {
        self.onset <= other.onset && other.offset <= self.offset
    }
}

/// A code value stored on a cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CodeValue {
    Text(String),
    Integer(i64),
}

impl CodeValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }
}

impl fmt::Display for CodeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(value) => f.write_str(value),
            Self::Integer(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for CodeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CodeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for CodeValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

/// Reserved code names answered by the cell itself rather than its code map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinCode {
    Onset,
    Offset,
    Ordinal,
}

impl BuiltinCode {
    /// Resolve a reserved code name. Matching is exact.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "onset" => Some(Self::Onset),
            "offset" => Some(Self::Offset),
            "ordinal" => Some(Self::Ordinal),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Onset => "onset",
            Self::Offset => "offset",
            Self::Ordinal => "ordinal",
        }
    }
}

/// One annotation instance.
///
/// Cells are read-only once their column has been built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    ordinal: u32,
    interval: Interval,
    column: Arc<str>,
    codes: BTreeMap<String, CodeValue>,
}

impl Cell {
    /// Create a detached cell. The column name is assigned by [`crate::Column::push_cell`].
    pub fn new(ordinal: u32, interval: Interval) -> Self {
        Self {
            ordinal,
            interval,
            column: Arc::from(""),
            codes: BTreeMap::new(),
        }
    }

    /// Attach a named code value.
    #[must_use]
    pub fn with_code(mut self, name: impl Into<String>, value: impl Into<CodeValue>) -> Self {
        self.codes.insert(name.into(), value.into());
        self
    }

    pub fn set_code(&mut self, name: impl Into<String>, value: impl Into<CodeValue>) {
        self.codes.insert(name.into(), value.into());
    }

    pub fn ordinal(&self) -> u32 {
        self.ordinal
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    pub fn onset(&self) -> i64 {
        self.interval.onset
    }

    pub fn offset(&self) -> i64 {
        self.interval.offset
    }

    /// Name of the column this cell belongs to.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Look up a named (non-builtin) code.
    pub fn code(&self, name: &str) -> Option<&CodeValue> {
        self.codes.get(name)
    }

    /// Value of a builtin field as an integer code.
    pub fn builtin(&self, code: BuiltinCode) -> CodeValue {
        match code {
            BuiltinCode::Onset => CodeValue::Integer(self.interval.onset),
            BuiltinCode::Offset => CodeValue::Integer(self.interval.offset),
            BuiltinCode::Ordinal => CodeValue::Integer(i64::from(self.ordinal)),
        }
    }

    /// Returns true if this cell's interval encloses `other`'s interval.
    pub fn contains(&self, other: &Cell) -> bool {
        self.interval.contains(&other.interval)
    }

    pub(crate) fn set_column(&mut self, column: Arc<str>) {
        self.column = column;
    }

    pub(crate) fn set_ordinal(&mut self, ordinal: u32) {
        self.ordinal = ordinal;
    }
}
