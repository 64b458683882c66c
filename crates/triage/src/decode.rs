//! JSON decoding of data frames and label records.
//!
//! Frames use the dashboard's wire shape:
//!
//! ```json
//! { "fields": [ { "name": "Time", "type": "time", "values": [1700000000000] } ] }
//! ```
//!
//! Unknown keys such as `schema`, `meta` or `config` are ignored.

use serde::Deserialize;
use serde_json::Value;

use crate::{
    breakdown::LabelSet,
    error::DecodeError,
    table::{Column, ColumnKind, ColumnValues, Table},
};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataFrame {
    #[serde(default)]
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: FieldType,
    #[serde(default)]
    pub values: Vec<Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Time,
    Number,
    String,
    /// Booleans, enums and anything else; kept as their JSON text.
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Frames {
    Many(Vec<DataFrame>),
    One(DataFrame),
}

impl TryFrom<DataFrame> for Table {
    type Error = DecodeError;

    fn try_from(frame: DataFrame) -> Result<Self, Self::Error> {
        let columns = frame
            .fields
            .into_iter()
            .map(Column::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Table::new(columns)?)
    }
}

impl TryFrom<Field> for Column {
    type Error = DecodeError;

    fn try_from(field: Field) -> Result<Self, Self::Error> {
        let Field { name, kind, values } = field;

        let values = match kind {
            FieldType::Time => ColumnValues::Time(cells(&name, values, ColumnKind::Time, time_cell)?),
            FieldType::Number => ColumnValues::Number(cells(&name, values, ColumnKind::Number, number_cell)?),
            FieldType::String => ColumnValues::String(cells(&name, values, ColumnKind::String, string_cell)?),
            FieldType::Other => ColumnValues::String(values.into_iter().map(text_cell).collect()),
        };

        Ok(Column::new(name, values))
    }
}

/// Decodes a single frame.
pub fn decode_frame(json: &str) -> Result<Table, DecodeError> {
    let frame: DataFrame = serde_json::from_str(json)?;
    Table::try_from(frame)
}

/// Decodes either one frame or an array of frames.
pub fn decode_frames(json: &str) -> Result<Vec<Table>, DecodeError> {
    let frames = match serde_json::from_str(json)? {
        Frames::Many(frames) => frames,
        Frames::One(frame) => vec![frame],
    };

    frames.into_iter().map(Table::try_from).collect()
}

/// Decodes an array of label records, keeping each record's key order.
pub fn decode_label_sets(json: &str) -> Result<Vec<LabelSet>, DecodeError> {
    Ok(serde_json::from_str(json)?)
}

/// Converts every value of a field, `null` becoming `None`. Any other value
/// `convert` rejects fails the whole field.
fn cells<T>(
    field: &str,
    values: Vec<Value>,
    expected: ColumnKind,
    convert: impl Fn(Value) -> Option<T>,
) -> Result<Vec<Option<T>>, DecodeError> {
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| match value {
            Value::Null => Ok(None),
            value => convert(value).map(Some).ok_or_else(|| DecodeError::InvalidCell {
                field: field.to_string(),
                index,
                expected,
            }),
        })
        .collect()
}

fn time_cell(value: Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|millis| millis.is_finite()).map(|millis| millis as i64)),
        _ => None,
    }
}

fn number_cell(value: Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        _ => None,
    }
}

fn string_cell(value: Value) -> Option<String> {
    match value {
        Value::String(value) => Some(value),
        _ => None,
    }
}

fn text_cell(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(value) => Some(value),
        value => Some(value.to_string()),
    }
}
