use std::fmt;

use serde::{Serialize, Serializer};

/// The value of a grouping label in the workbench tree.
///
/// Rows whose grouping cell is null, missing or the empty string all land in
/// the [`LabelValue::Empty`] group. Keeping it a separate variant means no real
/// label value can ever be mistaken for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LabelValue {
    Known(String),
    Empty,
}

/// The value shared by every row without a value for the grouping label.
pub const EMPTY_LABEL_VALUE: LabelValue = LabelValue::Empty;

impl LabelValue {
    /// Normalises a raw cell: `None` and `""` both become [`LabelValue::Empty`].
    pub fn from_cell(cell: Option<&str>) -> Self {
        match cell {
            Some(value) if !value.is_empty() => LabelValue::Known(value.to_string()),
            _ => LabelValue::Empty,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, LabelValue::Empty)
    }

    pub fn as_known(&self) -> Option<&str> {
        match self {
            LabelValue::Known(value) => Some(value),
            LabelValue::Empty => None,
        }
    }
}

impl From<&str> for LabelValue {
    fn from(value: &str) -> Self {
        LabelValue::from_cell(Some(value))
    }
}

impl fmt::Display for LabelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelValue::Known(value) => f.write_str(value),
            LabelValue::Empty => f.write_str("No value"),
        }
    }
}

/// Known values serialise as strings, the empty value as `null`.
impl Serialize for LabelValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            LabelValue::Known(value) => serializer.serialize_str(value),
            LabelValue::Empty => serializer.serialize_none(),
        }
    }
}
