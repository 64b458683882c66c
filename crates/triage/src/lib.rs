//! Alert triage aggregations.
//!
//! Two pure transformations feed the alert workbench:
//!
//! - [`RowTreeBuilder`] turns a table of alert-instance observations into a
//!   tree of rule rows grouped by label values.
//! - [`LabelBreakdown`] ranks the label keys and values carried by active alert
//!   instances.
//!
//! Neither performs I/O. Malformed input yields an empty result instead of an
//! error; use [`AlertFrame::try_from`] to find out why a table was rejected.

mod breakdown;
mod decode;
mod error;
mod frame;
mod label;
mod rows;
mod table;

pub use breakdown::{LabelBreakdown, LabelSet, LabelValueCount, TopLabel, compute_top_labels};
pub use decode::{DataFrame, Field, FieldType, decode_frame, decode_frames, decode_label_sets};
pub use error::{DecodeError, FrameError, TableError};
pub use frame::{ALERT_NAME, ALERT_STATE, AlertFrame, AlertState, FOLDER, REQUIRED_COLUMNS, RULE_UID, TIME};
pub use label::{EMPTY_LABEL_VALUE, LabelValue};
pub use rows::{
    AlertRuleRow, GenericGroupedRow, InstanceCounts, RowTreeBuilder, WorkbenchRow, build_rows, build_rows_from_series,
};
pub use table::{Column, ColumnKind, ColumnValues, Table};
