//! Test record shared by the core's unit tests.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{
    convert, convert_optional, take, take_optional, FieldDef, FieldError, FieldKind, FieldMap,
    FieldValue, Record,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Widget {
    pub id: Uuid,
    pub name: String,
    pub size: Option<i64>,
    pub owner_id: Option<Uuid>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

const WIDGET_FIELDS: &[FieldDef] = &[
    FieldDef::new("id", FieldKind::Uuid).managed(),
    FieldDef::new("name", FieldKind::Text).unique(),
    FieldDef::new("size", FieldKind::Int).nullable(),
    FieldDef::new("owner_id", FieldKind::Uuid).nullable(),
    FieldDef::new("created", FieldKind::Timestamp).managed(),
    FieldDef::new("updated", FieldKind::Timestamp).managed(),
];

impl Record for Widget {
    const ENTITY: &'static str = "Widget";
    const TABLE: &'static str = "widgets";
    const FIELDS: &'static [FieldDef] = WIDGET_FIELDS;

    fn id(&self) -> Uuid {
        self.id
    }

    fn get(&self, field: &str) -> Option<FieldValue> {
        match field {
            "id" => Some(self.id.into()),
            "name" => Some(self.name.clone().into()),
            "size" => Some(self.size.into()),
            "owner_id" => Some(self.owner_id.into()),
            "created" => Some(self.created.into()),
            "updated" => Some(self.updated.into()),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: FieldValue) -> Result<(), FieldError> {
        match field {
            "id" => self.id = convert::<Self, _>(field, value)?,
            "name" => self.name = convert::<Self, _>(field, value)?,
            "size" => self.size = convert_optional::<Self, _>(field, value)?,
            "owner_id" => self.owner_id = convert_optional::<Self, _>(field, value)?,
            "created" => self.created = convert::<Self, _>(field, value)?,
            "updated" => self.updated = convert::<Self, _>(field, value)?,
            _ => {
                return Err(FieldError::UnknownField {
                    entity_type: Self::ENTITY,
                    field: field.to_string(),
                })
            }
        }
        Ok(())
    }

    fn from_fields(mut fields: FieldMap) -> Result<Self, FieldError> {
        Ok(Self {
            id: take::<Self, _>(&mut fields, "id")?,
            name: take::<Self, _>(&mut fields, "name")?,
            size: take_optional::<Self, _>(&mut fields, "size")?,
            owner_id: take_optional::<Self, _>(&mut fields, "owner_id")?,
            created: take::<Self, _>(&mut fields, "created")?,
            updated: take::<Self, _>(&mut fields, "updated")?,
        })
    }
}

/// Builds a write payload from `(field, value)` pairs.
pub fn fields<const N: usize>(pairs: [(&str, FieldValue); N]) -> FieldMap {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}
