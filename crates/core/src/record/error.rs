use thiserror::Error;

use super::FieldKind;

/// Errors raised when a field name or value does not fit a record's field table.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("{entity_type} has no field named '{field}'")]
    UnknownField {
        entity_type: &'static str,
        field: String,
    },
    #[error("{entity_type}.{field} expects a {expected} value, got {found}")]
    TypeMismatch {
        entity_type: &'static str,
        field: String,
        expected: FieldKind,
        found: String,
    },
    #[error("{entity_type}.{field} is required")]
    Missing {
        entity_type: &'static str,
        field: String,
    },
}
