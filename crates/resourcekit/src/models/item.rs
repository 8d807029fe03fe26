use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use resourcekit_core::record::{
    convert, convert_optional, take, take_optional, FieldDef, FieldError, FieldKind, FieldMap,
    FieldValue, Record,
};
use resourcekit_core::service::Representation;

/// A named item, optionally owned by another resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: Option<Uuid>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

const ITEM_FIELDS: &[FieldDef] = &[
    FieldDef::new("id", FieldKind::Uuid).managed(),
    FieldDef::new("name", FieldKind::Text).unique(),
    FieldDef::new("description", FieldKind::Text).nullable(),
    FieldDef::new("owner_id", FieldKind::Uuid).nullable(),
    FieldDef::new("created", FieldKind::Timestamp).managed(),
    FieldDef::new("updated", FieldKind::Timestamp).managed(),
];

impl Record for Item {
    const ENTITY: &'static str = "Item";
    const TABLE: &'static str = "items";
    const FIELDS: &'static [FieldDef] = ITEM_FIELDS;

    fn id(&self) -> Uuid {
        self.id
    }

    fn get(&self, field: &str) -> Option<FieldValue> {
        match field {
            "id" => Some(self.id.into()),
            "name" => Some(self.name.clone().into()),
            "description" => Some(self.description.clone().into()),
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
            "description" => self.description = convert_optional::<Self, _>(field, value)?,
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
            description: take_optional::<Self, _>(&mut fields, "description")?,
            owner_id: take_optional::<Self, _>(&mut fields, "owner_id")?,
            created: take::<Self, _>(&mut fields, "created")?,
            updated: take::<Self, _>(&mut fields, "updated")?,
        })
    }
}

/// JSON representation of an [`Item`].
///
/// `id`, `created` and `updated` are ignored on writes except for the
/// identifier consistency checks. `description` and `owner_id` are only
/// written when present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemView {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub owner_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
}

impl Representation<Item> for ItemView {
    fn from_record(item: &Item) -> Self {
        Self {
            id: Some(item.id),
            name: item.name.clone(),
            description: item.description.clone(),
            owner_id: item.owner_id,
            created: Some(item.created),
            updated: Some(item.updated),
        }
    }

    fn into_fields(self) -> FieldMap {
        let mut fields = FieldMap::new();
        if let Some(id) = self.id {
            fields.insert("id".to_string(), id.into());
        }
        fields.insert("name".to_string(), self.name.into());
        if let Some(description) = self.description {
            fields.insert("description".to_string(), description.into());
        }
        if let Some(owner_id) = self.owner_id {
            fields.insert("owner_id".to_string(), owner_id.into());
        }
        fields
    }

    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name must not be empty".to_string());
        }
        Ok(())
    }
}
