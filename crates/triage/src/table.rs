//! Strongly typed columnar tables.
//!
//! A [`Table`] is an ordered list of named [`Column`]s whose cells are aligned
//! by row index. Cells are optional: `None` stands for a null or missing value.

use std::borrow::Cow;

use crate::error::TableError;

/// The declared kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ColumnKind {
    Time,
    String,
    Number,
}

/// Cell storage for a column, one variant per [`ColumnKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    /// Epoch milliseconds.
    Time(Vec<Option<i64>>),
    String(Vec<Option<String>>),
    Number(Vec<Option<f64>>),
}

impl ColumnValues {
    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnValues::Time(_) => ColumnKind::Time,
            ColumnValues::String(_) => ColumnKind::String,
            ColumnValues::Number(_) => ColumnKind::Number,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Time(values) => values.len(),
            ColumnValues::String(values) => values.len(),
            ColumnValues::Number(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    values: ColumnValues,
}

impl Column {
    pub fn new(name: impl Into<String>, values: ColumnValues) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn time<I>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Option<i64>>,
    {
        Self::new(name, ColumnValues::Time(values.into_iter().map(Into::into).collect()))
    }

    pub fn string<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        let values = values.into_iter().map(|value| value.map(Into::into)).collect();
        Self::new(name, ColumnValues::String(values))
    }

    /// A string column without nulls.
    pub fn strings<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::string(name, values.into_iter().map(Some))
    }

    pub fn number<I>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Option<f64>>,
    {
        Self::new(name, ColumnValues::Number(values.into_iter().map(Into::into).collect()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ColumnKind {
        self.values.kind()
    }

    pub fn values(&self) -> &ColumnValues {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Textual view of a cell. Numbers and timestamps are rendered with their
    /// `Display` form so any column can serve as a grouping key.
    pub fn label_at(&self, row: usize) -> Option<Cow<'_, str>> {
        match &self.values {
            ColumnValues::String(values) => values.get(row)?.as_deref().map(Cow::Borrowed),
            ColumnValues::Number(values) => values.get(row)?.map(|value| Cow::Owned(value.to_string())),
            ColumnValues::Time(values) => values.get(row)?.map(|value| Cow::Owned(value.to_string())),
        }
    }

    /// String cell, or `None` for nulls and non-string columns.
    pub fn str_at(&self, row: usize) -> Option<&str> {
        match &self.values {
            ColumnValues::String(values) => values.get(row)?.as_deref(),
            ColumnValues::Time(_) | ColumnValues::Number(_) => None,
        }
    }

    /// Numeric cell, or `None` for nulls and non-number columns.
    pub fn number_at(&self, row: usize) -> Option<f64> {
        match &self.values {
            ColumnValues::Number(values) => values.get(row).copied().flatten(),
            ColumnValues::Time(_) | ColumnValues::String(_) => None,
        }
    }
}

/// Ordered, row-aligned columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    len: usize,
}

impl Table {
    /// Builds a table, checking that every column has the same number of rows.
    pub fn new(columns: Vec<Column>) -> Result<Self, TableError> {
        let len = columns.first().map(Column::len).unwrap_or_default();

        if let Some(column) = columns.iter().find(|column| column.len() != len) {
            return Err(TableError::LengthMismatch {
                column: column.name.clone(),
                expected: len,
                found: column.len(),
            });
        }

        Ok(Self { columns, len })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// First column with the given name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::{Column, ColumnKind, Table};
    use crate::error::TableError;

    #[test]
    fn rejects_ragged_columns() {
        let error = Table::new(vec![
            Column::time("Time", [1000_i64, 2000]),
            Column::strings("alertname", ["A"]),
        ])
        .unwrap_err();

        assert_eq!(
            error,
            TableError::LengthMismatch {
                column: "alertname".to_string(),
                expected: 2,
                found: 1,
            }
        );
    }

    #[test]
    fn empty_table() {
        let table = Table::new(Vec::new()).unwrap();

        assert!(table.is_empty());
        assert!(table.columns().is_empty());
    }

    #[test]
    fn label_view_of_every_kind() {
        let table = Table::new(vec![
            Column::time("Time", [Some(1000_i64), None]),
            Column::string("team", [Some("infra"), None]),
            Column::number("Value", [2.5, 3.0]),
        ])
        .unwrap();

        let time = table.column("Time").unwrap();
        let team = table.column("team").unwrap();
        let value = table.column("Value").unwrap();

        assert_eq!(time.label_at(0).as_deref(), Some("1000"));
        assert_eq!(time.label_at(1), None);
        assert_eq!(team.label_at(0).as_deref(), Some("infra"));
        assert_eq!(team.label_at(1), None);
        assert_eq!(value.label_at(0).as_deref(), Some("2.5"));
        assert_eq!(value.label_at(1).as_deref(), Some("3"));
        assert_eq!(value.label_at(7), None);
    }

    #[test]
    fn typed_accessors_ignore_other_kinds() {
        let team = Column::strings("team", ["infra"]);
        let value = Column::number("Value", [4.0]);

        assert_eq!(team.str_at(0), Some("infra"));
        assert_eq!(team.number_at(0), None);
        assert_eq!(value.number_at(0), Some(4.0));
        assert_eq!(value.str_at(0), None);
        assert_eq!(value.kind(), ColumnKind::Number);
    }

    #[test]
    fn lookup_returns_first_match() {
        let table = Table::new(vec![Column::strings("team", ["a"]), Column::strings("team", ["b"])]).unwrap();

        assert_eq!(table.column("team").unwrap().str_at(0), Some("a"));
        assert!(table.column("severity").is_none());
    }
}
