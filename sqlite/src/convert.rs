//! Conversion between core values and SQLite rows.
//!
//! Parameters go out through [`Param`], which binds a [`Value`] in its
//! encoded, store-native shape. Rows come back through [`rows_to_records`],
//! which resolves result columns to record fields once per result set and
//! then decodes each cell with the codec's fallback rules.
//!
//! A cell that neither decode strategy can assign surfaces as
//! [`rusqlite::Error::FromSqlConversionFailure`], i.e. as a store error. So
//! does a text cell that is not valid UTF-8.

use std::str::Utf8Error;

use lite_orm_core::{FieldDescriptor, Record, Value, decode_into, encode, resolve_columns};
use rusqlite::types::{ToSql, ToSqlOutput, Value as SqlValue, ValueRef};
use rusqlite::{Row, Rows};

/// Binds a [`Value`] as a SQLite parameter.
pub(crate) struct Param<'a>(pub(crate) &'a Value);

impl ToSql for Param<'_> {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self.0 {
            Value::Null => ToSqlOutput::Owned(SqlValue::Null),
            Value::Integer(v) => ToSqlOutput::Owned(SqlValue::Integer(*v)),
            Value::Real(v) => ToSqlOutput::Owned(SqlValue::Real(*v)),
            Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            Value::Blob(b) => ToSqlOutput::Borrowed(ValueRef::Blob(b)),
            other => ToSqlOutput::Owned(into_sql_value(encode(other))),
        })
    }
}

/// Converts an encoded value into an owned SQLite value.
fn into_sql_value(value: Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Integer(v) => SqlValue::Integer(v),
        Value::Real(v) => SqlValue::Real(v),
        Value::Text(s) => SqlValue::Text(s),
        Value::Blob(b) => SqlValue::Blob(b),
        Value::Decimal(d) => SqlValue::Text(d.to_string()),
        Value::DateTime(dt) => SqlValue::Integer(dt.timestamp_millis()),
    }
}

/// Reads a borrowed SQLite cell into a core value.
///
/// Text cells must hold valid UTF-8.
pub(crate) fn value_from_ref(cell: ValueRef<'_>) -> Result<Value, Utf8Error> {
    Ok(match cell {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(v) => Value::Integer(v),
        ValueRef::Real(v) => Value::Real(v),
        ValueRef::Text(bytes) => Value::Text(std::str::from_utf8(bytes)?.to_owned()),
        ValueRef::Blob(bytes) => Value::Blob(bytes.to_vec()),
    })
}

/// Builds one record from a row whose columns were resolved up front.
pub(crate) fn row_to_record<R: Record>(
    row: &Row<'_>,
    columns: &[Option<&'static FieldDescriptor>],
) -> rusqlite::Result<R> {
    let mut record = R::default();
    for (idx, field) in columns.iter().enumerate() {
        let Some(field) = field else {
            continue;
        };
        let cell = row.get_ref(idx)?;
        let data_type = cell.data_type();
        let conversion_failure = |e: Box<dyn std::error::Error + Send + Sync>| {
            rusqlite::Error::FromSqlConversionFailure(idx, data_type, e)
        };
        let value = value_from_ref(cell).map_err(|e| conversion_failure(Box::new(e)))?;
        decode_into(&mut record, field, value).map_err(|e| conversion_failure(Box::new(e)))?;
    }
    Ok(record)
}

/// Maps every remaining row onto a new `R`, matching columns by name.
///
/// Columns without a matching field are ignored; fields without a matching
/// column keep their default value.
pub fn rows_to_records<R: Record>(mut rows: Rows<'_>) -> rusqlite::Result<Vec<R>> {
    let names: Vec<String> = rows
        .as_ref()
        .map(|stmt| stmt.column_names().into_iter().map(String::from).collect())
        .unwrap_or_default();
    let columns = resolve_columns::<R, _>(&names);

    let mut records = Vec::new();
    while let Some(row) = rows.next()? {
        records.push(row_to_record(row, &columns)?);
    }
    Ok(records)
}
