use uuid::Uuid;

use super::{FieldError, FieldKind, FieldMap, FieldValue, FromFieldValue};

/// Name of the identifier field every record carries.
pub const ID_FIELD: &str = "id";
/// Name of the creation timestamp field.
pub const CREATED_FIELD: &str = "created";
/// Name of the last-update timestamp field.
pub const UPDATED_FIELD: &str = "updated";

/// One entry of a record's field table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
    pub nullable: bool,
    /// Backed by a uniqueness constraint in the store.
    pub unique: bool,
    /// Maintained by the repository; never overwritten from write payloads.
    pub managed: bool,
}

impl FieldDef {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            nullable: false,
            unique: false,
            managed: false,
        }
    }

    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub const fn managed(mut self) -> Self {
        self.managed = true;
        self
    }

    /// Returns true if `value` may be stored in this field.
    pub fn accepts(&self, value: &FieldValue) -> bool {
        match value.kind() {
            None => self.nullable,
            Some(kind) => kind == self.kind,
        }
    }
}

/// A persisted entity with a compile-time field table.
///
/// Implementors describe their columns in [`Record::FIELDS`] and provide typed
/// access by field name through [`Record::get`] and [`Record::set`]. Filter
/// construction and write payloads are validated against the table, so an
/// unknown field name is caught before anything reaches the store.
///
/// The table must contain [`ID_FIELD`]; [`CREATED_FIELD`] and [`UPDATED_FIELD`]
/// are stamped by the repository when present.
pub trait Record: Clone + Send + Sync + 'static {
    /// Human readable entity name used in errors and logs.
    const ENTITY: &'static str;
    /// Table (or collection) name in the store.
    const TABLE: &'static str;
    const FIELDS: &'static [FieldDef];

    fn id(&self) -> Uuid;

    /// Reads a field by name. Returns `None` for names not in the table.
    fn get(&self, field: &str) -> Option<FieldValue>;

    /// Writes a field by name.
    fn set(&mut self, field: &str, value: FieldValue) -> Result<(), FieldError>;

    /// Builds a record from a complete field mapping.
    fn from_fields(fields: FieldMap) -> Result<Self, FieldError>;

    /// Looks up a field definition by name.
    fn field_def(name: &str) -> Result<&'static FieldDef, FieldError> {
        Self::FIELDS
            .iter()
            .find(|def| def.name == name)
            .ok_or_else(|| FieldError::UnknownField {
                entity_type: Self::ENTITY,
                field: name.to_string(),
            })
    }

    /// Looks up a field definition and checks that `value` fits it.
    fn check_value(name: &str, value: &FieldValue) -> Result<&'static FieldDef, FieldError> {
        let def = Self::field_def(name)?;
        if def.accepts(value) {
            Ok(def)
        } else {
            Err(mismatch::<Self>(def, value))
        }
    }

    /// Snapshot of every field in table order.
    fn to_fields(&self) -> FieldMap {
        Self::FIELDS
            .iter()
            .filter_map(|def| self.get(def.name).map(|v| (def.name.to_string(), v)))
            .collect()
    }
}

fn mismatch<R: Record>(def: &FieldDef, value: &FieldValue) -> FieldError {
    FieldError::TypeMismatch {
        entity_type: R::ENTITY,
        field: def.name.to_string(),
        expected: def.kind,
        found: value
            .kind()
            .map_or_else(|| "null".to_string(), |k| k.to_string()),
    }
}

/// Converts a value destined for a non-nullable field of `R`.
pub fn convert<R: Record, T: FromFieldValue>(field: &str, value: FieldValue) -> Result<T, FieldError> {
    if value.is_null() {
        return Err(FieldError::Missing {
            entity_type: R::ENTITY,
            field: field.to_string(),
        });
    }
    let found = value.kind().map_or_else(String::new, |k| k.to_string());
    T::from_field_value(value).ok_or_else(|| FieldError::TypeMismatch {
        entity_type: R::ENTITY,
        field: field.to_string(),
        expected: T::KIND,
        found,
    })
}

/// Converts a value destined for a nullable field of `R`.
pub fn convert_optional<R: Record, T: FromFieldValue>(
    field: &str,
    value: FieldValue,
) -> Result<Option<T>, FieldError> {
    if value.is_null() {
        Ok(None)
    } else {
        convert::<R, T>(field, value).map(Some)
    }
}

/// Removes a required field from `fields`.
pub fn take<R: Record, T: FromFieldValue>(fields: &mut FieldMap, field: &str) -> Result<T, FieldError> {
    let value = fields.remove(field).unwrap_or(FieldValue::Null);
    convert::<R, T>(field, value)
}

/// Removes an optional field from `fields`; absent and null both yield `None`.
pub fn take_optional<R: Record, T: FromFieldValue>(
    fields: &mut FieldMap,
    field: &str,
) -> Result<Option<T>, FieldError> {
    let value = fields.remove(field).unwrap_or(FieldValue::Null);
    convert_optional::<R, T>(field, value)
}
