//! Persisted record model.
//!
//! A record type declares its columns once, as a static [`FieldDef`] table,
//! and exposes typed get/set access by field name. Everything above this
//! module (selections, repositories, stores) works against that table.

mod error;
mod traits;
mod value;

#[cfg(test)]
pub(crate) mod fixtures;

pub use error::FieldError;
pub use traits::{
    convert, convert_optional, take, take_optional, FieldDef, Record, CREATED_FIELD, ID_FIELD,
    UPDATED_FIELD,
};
pub use value::{FieldKind, FieldMap, FieldValue, FromFieldValue};
