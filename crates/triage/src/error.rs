use thiserror::Error;

use crate::table::ColumnKind;

/// Errors raised while assembling a [`Table`](crate::Table) from columns.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("Column '{column}' has {found} values, expected {expected} like the preceding columns")]
    LengthMismatch { column: String, expected: usize, found: usize },
}

/// Reasons a table cannot be read as alert-instance observations.
///
/// The aggregation entry points swallow these and produce an empty result;
/// callers that want to report them validate with
/// [`AlertFrame::try_from`](crate::AlertFrame) first.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("Frame has no columns or no rows")]
    Empty,
    #[error("Frame is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<&'static str>),
    #[error("Column '{column}' must be of kind {expected}, found {found}")]
    ColumnKind {
        column: &'static str,
        expected: ColumnKind,
        found: ColumnKind,
    },
}

/// Errors raised while decoding data frames from JSON.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Field '{field}' has an invalid value at index {index}: expected {expected}")]
    InvalidCell {
        field: String,
        index: usize,
        expected: ColumnKind,
    },
    #[error(transparent)]
    Table(#[from] TableError),
}
