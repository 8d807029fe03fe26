use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Unstructured write payload keyed by field name.
pub type FieldMap = BTreeMap<String, FieldValue>;

/// The storage kind of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Uuid,
    Text,
    Int,
    Bool,
    Timestamp,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uuid => write!(f, "uuid"),
            Self::Text => write!(f, "text"),
            Self::Int => write!(f, "int"),
            Self::Bool => write!(f, "bool"),
            Self::Timestamp => write!(f, "timestamp"),
        }
    }
}

/// A single cell value read from or written to a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
}

impl FieldValue {
    /// Returns the kind of this value, or `None` for `Null`.
    pub fn kind(&self) -> Option<FieldKind> {
        match self {
            Self::Null => None,
            Self::Bool(_) => Some(FieldKind::Bool),
            Self::Int(_) => Some(FieldKind::Int),
            Self::Text(_) => Some(FieldKind::Text),
            Self::Uuid(_) => Some(FieldKind::Uuid),
            Self::Timestamp(_) => Some(FieldKind::Timestamp),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Timestamp(at) => Some(*at),
            _ => None,
        }
    }

    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Self::Uuid(id) => Some(*id),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v}"),
            Self::Uuid(v) => write!(f, "{v}"),
            Self::Timestamp(v) => write!(f, "{}", v.to_rfc3339()),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Uuid> for FieldValue {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Typed extraction of a Rust value from a [`FieldValue`].
///
/// Implemented for every Rust type a record field may hold, so record
/// implementations can pull typed values out of a [`FieldMap`].
pub trait FromFieldValue: Sized {
    const KIND: FieldKind;

    /// Converts `value`, returning `None` when the kinds don't line up.
    fn from_field_value(value: FieldValue) -> Option<Self>;
}

impl FromFieldValue for bool {
    const KIND: FieldKind = FieldKind::Bool;

    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Bool(v) => Some(v),
            _ => None,
        }
    }
}

impl FromFieldValue for i64 {
    const KIND: FieldKind = FieldKind::Int;

    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Int(v) => Some(v),
            _ => None,
        }
    }
}

impl FromFieldValue for String {
    const KIND: FieldKind = FieldKind::Text;

    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl FromFieldValue for Uuid {
    const KIND: FieldKind = FieldKind::Uuid;

    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Uuid(v) => Some(v),
            _ => None,
        }
    }
}

impl FromFieldValue for DateTime<Utc> {
    const KIND: FieldKind = FieldKind::Timestamp;

    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Timestamp(v) => Some(v),
            _ => None,
        }
    }
}
