//! SQLite value conversion functions.
//!
//! Pure functions for converting between SQLite values and field values.
//! These are testable in isolation without database access.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::{Type, Value};
use rusqlite::Row;
use uuid::Uuid;

use resourcekit_core::record::{FieldDef, FieldKind, FieldMap, FieldValue, Record};

/// Format a DateTime for SQLite storage.
///
/// Fixed-width microsecond RFC 3339 so text comparison follows time order.
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Converts a field value to a bindable SQLite value.
pub fn to_sql_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Null => Value::Null,
        FieldValue::Bool(v) => Value::Integer(i64::from(*v)),
        FieldValue::Int(v) => Value::Integer(*v),
        FieldValue::Text(v) => Value::Text(v.clone()),
        FieldValue::Uuid(v) => Value::Text(v.to_string()),
        FieldValue::Timestamp(v) => Value::Text(format_datetime(v)),
    }
}

/// Column values of `record` in `R::FIELDS` order.
pub fn record_to_params<R: Record>(record: &R) -> Vec<Value> {
    R::FIELDS
        .iter()
        .map(|def| to_sql_value(&record.get(def.name).unwrap_or(FieldValue::Null)))
        .collect()
}

fn conversion_error<E>(index: usize, ty: Type, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(index, ty, Box::new(err))
}

/// Parse a datetime from RFC 3339 string.
fn parse_datetime(index: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(index, Type::Text, e))
}

fn parse_uuid(index: usize, s: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| conversion_error(index, Type::Text, e))
}

/// Converts one column to a field value of `def.kind`.
pub fn from_sql_value(index: usize, def: &FieldDef, value: Value) -> rusqlite::Result<FieldValue> {
    match (def.kind, value) {
        (_, Value::Null) => Ok(FieldValue::Null),
        (FieldKind::Uuid, Value::Text(s)) => parse_uuid(index, &s).map(FieldValue::Uuid),
        (FieldKind::Text, Value::Text(s)) => Ok(FieldValue::Text(s)),
        (FieldKind::Timestamp, Value::Text(s)) => {
            parse_datetime(index, &s).map(FieldValue::Timestamp)
        }
        (FieldKind::Int, Value::Integer(v)) => Ok(FieldValue::Int(v)),
        (FieldKind::Bool, Value::Integer(v)) => Ok(FieldValue::Bool(v != 0)),
        (_, other) => Err(rusqlite::Error::InvalidColumnType(
            index,
            def.name.to_string(),
            other.data_type(),
        )),
    }
}

/// Reads a row selected with every column of `fields`, in order.
pub fn row_to_fields(row: &Row, fields: &[FieldDef]) -> rusqlite::Result<FieldMap> {
    fields
        .iter()
        .enumerate()
        .map(|(index, def)| {
            let value: Value = row.get(index)?;
            Ok((def.name.to_string(), from_sql_value(index, def, value)?))
        })
        .collect()
}
