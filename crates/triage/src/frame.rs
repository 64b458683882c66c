//! Validation of tables holding alert-instance observations.

use std::collections::HashMap;

use crate::{
    error::FrameError,
    table::{Column, ColumnKind, Table},
};

pub const TIME: &str = "Time";
pub const ALERT_NAME: &str = "alertname";
pub const FOLDER: &str = "grafana_folder";
pub const RULE_UID: &str = "grafana_rule_uid";
pub const ALERT_STATE: &str = "alertstate";

/// Columns every alert-instance table must carry, in declaration order.
pub const REQUIRED_COLUMNS: [&str; 5] = [TIME, ALERT_NAME, FOLDER, RULE_UID, ALERT_STATE];

/// Name of the instance-count column. Multi-query tables suffix it with the
/// query ref id, as in `Value #B`.
const VALUE: &str = "Value";

/// Alert states that carry instance counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString, strum::AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum AlertState {
    Firing,
    Pending,
}

impl AlertState {
    /// Exact, case-sensitive match; any other state yields `None`.
    pub fn parse(state: &str) -> Option<Self> {
        state.parse().ok()
    }
}

/// A table that has been checked to hold alert-instance observations.
///
/// The name lookup is built once; the accessors index straight into the
/// resolved columns.
#[derive(Debug, Clone)]
pub struct AlertFrame<'a> {
    table: &'a Table,
    index: HashMap<&'a str, usize>,
    title: &'a Column,
    folder: &'a Column,
    rule_uid: &'a Column,
    state: &'a Column,
    value: Option<&'a Column>,
}

impl<'a> TryFrom<&'a Table> for AlertFrame<'a> {
    type Error = FrameError;

    fn try_from(table: &'a Table) -> Result<Self, Self::Error> {
        if table.columns().is_empty() || table.is_empty() {
            return Err(FrameError::Empty);
        }

        let mut index = HashMap::with_capacity(table.columns().len());

        for (position, column) in table.columns().iter().enumerate() {
            index.entry(column.name()).or_insert(position);
        }

        let missing: Vec<&'static str> = REQUIRED_COLUMNS
            .into_iter()
            .filter(|name| !index.contains_key(name))
            .collect();

        if !missing.is_empty() {
            return Err(FrameError::MissingColumns(missing));
        }

        let columns = table.columns();
        let required = |name: &'static str, expected: ColumnKind| {
            let column = &columns[index[name]];

            if column.kind() == expected {
                Ok(column)
            } else {
                Err(FrameError::ColumnKind {
                    column: name,
                    expected,
                    found: column.kind(),
                })
            }
        };

        required(TIME, ColumnKind::Time)?;

        let title = required(ALERT_NAME, ColumnKind::String)?;
        let folder = required(FOLDER, ColumnKind::String)?;
        let rule_uid = required(RULE_UID, ColumnKind::String)?;
        let state = required(ALERT_STATE, ColumnKind::String)?;

        let value = columns
            .iter()
            .find(|column| column.kind() == ColumnKind::Number && is_value_column(column.name()));

        Ok(Self {
            table,
            index,
            title,
            folder,
            rule_uid,
            state,
            value,
        })
    }
}

impl<'a> AlertFrame<'a> {
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Column lookup through the prebuilt name index.
    pub fn column(&self, name: &str) -> Option<&'a Column> {
        self.index.get(name).map(|position| &self.table.columns()[*position])
    }

    pub fn title(&self, row: usize) -> &'a str {
        self.title.str_at(row).unwrap_or_default()
    }

    pub fn folder(&self, row: usize) -> &'a str {
        self.folder.str_at(row).unwrap_or_default()
    }

    pub fn rule_uid(&self, row: usize) -> &'a str {
        self.rule_uid.str_at(row).unwrap_or_default()
    }

    pub fn state(&self, row: usize) -> Option<AlertState> {
        self.state.str_at(row).and_then(AlertState::parse)
    }

    /// Instance count of a row. Missing columns, nulls, negative and
    /// non-finite values all count as zero.
    pub fn instances(&self, row: usize) -> f64 {
        self.value
            .and_then(|column| column.number_at(row))
            .filter(|value| value.is_finite() && *value > 0.0)
            .unwrap_or_default()
    }
}

fn is_value_column(name: &str) -> bool {
    match name.strip_prefix(VALUE) {
        Some("") => true,
        Some(suffix) => suffix.starts_with(" #"),
        None => false,
    }
}
