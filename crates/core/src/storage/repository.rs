//! Request-scoped generic repository.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::filters::{BeforeAfter, CollectionFilter, Filters, LimitOffset};
use crate::record::{
    convert, FieldError, FieldKind, FieldMap, FieldValue, Record, CREATED_FIELD, ID_FIELD,
    UPDATED_FIELD,
};
use crate::selection::{Predicate, Selection};

use super::{RepositoryError, Result, Store, StoreError};

/// Inputs to [`Repository::construct`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryParams {
    /// Exact-match target, usually the identifier from the request path.
    pub id: Option<Uuid>,
    /// Field the target is matched against.
    pub id_field: &'static str,
    pub id_filter: Option<CollectionFilter<Uuid>>,
    pub created_filter: Option<BeforeAfter>,
    pub updated_filter: Option<BeforeAfter>,
    pub limit_offset: Option<LimitOffset>,
}

impl Default for RepositoryParams {
    fn default() -> Self {
        Self {
            id: None,
            id_field: ID_FIELD,
            id_filter: None,
            created_filter: None,
            updated_filter: None,
            limit_offset: None,
        }
    }
}

impl RepositoryParams {
    pub fn new(id: Option<Uuid>) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Copies every constraint of a request's [`Filters`].
    pub fn with_filters(mut self, filters: Filters) -> Self {
        self.id_filter = filters.id;
        self.created_filter = filters.created;
        self.updated_filter = filters.updated;
        self.limit_offset = filters.limit_offset;
        self
    }
}

/// Generic CRUD repository over one record type.
///
/// A repository owns a [`Selection`] and a shared [`Store`]. Filter methods
/// consume the repository and return one with the extended selection;
/// execution methods borrow it and never change the selection.
pub struct Repository<R: Record> {
    store: Arc<dyn Store<R>>,
    selection: Selection,
    target_id: Option<Uuid>,
}

impl<R: Record> Clone for Repository<R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            selection: self.selection.clone(),
            target_id: self.target_id,
        }
    }
}

impl<R: Record> fmt::Debug for Repository<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("entity", &R::ENTITY)
            .field("selection", &self.selection)
            .field("target_id", &self.target_id)
            .finish()
    }
}

impl<R: Record> Repository<R> {
    /// A repository selecting every record of `R`.
    pub fn new(store: Arc<dyn Store<R>>) -> Self {
        Self {
            store,
            selection: Selection::all(),
            target_id: None,
        }
    }

    /// Builds a repository and applies `params` in a fixed order: target id,
    /// id collection, created range, updated range, then pagination.
    pub fn construct(store: Arc<dyn Store<R>>, params: RepositoryParams) -> Result<Self> {
        let mut repository = Self::new(store);

        if let Some(id) = params.id {
            repository = repository.filter_by(params.id_field, id)?;
            if params.id_field == ID_FIELD {
                repository.target_id = Some(id);
            }
        }
        if let Some(filter) = &params.id_filter {
            repository = repository.filter_in_collection(filter)?;
        }
        if let Some(filter) = &params.created_filter {
            repository = repository.filter_on_datetime_field(filter)?;
        }
        if let Some(filter) = &params.updated_filter {
            repository = repository.filter_on_datetime_field(filter)?;
        }
        if let Some(window) = params.limit_offset {
            repository = repository.apply_limit_offset_pagination(window);
        }

        Ok(repository)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Identifier this repository was constructed for, if any.
    pub fn target_id(&self) -> Option<Uuid> {
        self.target_id
    }

    /// Adds `field == value`.
    pub fn filter_by(self, field: &str, value: impl Into<FieldValue>) -> Result<Self> {
        let value = value.into();
        let def = R::check_value(field, &value)?;
        Ok(self.and(Predicate::Eq {
            field: def.name,
            value,
        }))
    }

    /// Adds one equality constraint per `(field, value)` pair.
    pub fn filter_select_by_fields<I, K, V>(self, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<FieldValue>,
    {
        pairs
            .into_iter()
            .try_fold(self, |repository, (field, value)| {
                repository.filter_by(field.as_ref(), value)
            })
    }

    /// Adds a membership constraint. A filter without values is a no-op.
    pub fn filter_in_collection<T>(self, filter: &CollectionFilter<T>) -> Result<Self>
    where
        T: Clone + Into<FieldValue>,
    {
        let Some(values) = &filter.values else {
            return Ok(self);
        };
        let def = R::field_def(&filter.field_name)?;
        let values = values
            .iter()
            .cloned()
            .map(|value| {
                let value = value.into();
                R::check_value(def.name, &value).map(|_| value)
            })
            .collect::<std::result::Result<Vec<_>, FieldError>>()?;

        Ok(self.and(Predicate::In {
            field: def.name,
            values,
        }))
    }

    /// Adds strict `field < before` and/or `field > after` constraints.
    pub fn filter_on_datetime_field(self, filter: &BeforeAfter) -> Result<Self> {
        let def = R::field_def(filter.field_name)?;
        if def.kind != FieldKind::Timestamp {
            return Err(FieldError::TypeMismatch {
                entity_type: R::ENTITY,
                field: def.name.to_string(),
                expected: FieldKind::Timestamp,
                found: def.kind.to_string(),
            }
            .into());
        }

        let mut repository = self;
        if let Some(at) = filter.before {
            repository = repository.and(Predicate::Before {
                field: def.name,
                at,
            });
        }
        if let Some(at) = filter.after {
            repository = repository.and(Predicate::After {
                field: def.name,
                at,
            });
        }
        Ok(repository)
    }

    pub fn apply_limit_offset_pagination(mut self, window: LimitOffset) -> Self {
        self.selection = self.selection.paginate(window);
        self
    }

    /// Executes the selection.
    pub async fn scalars(&self) -> Result<Vec<R>> {
        let rows = self
            .store
            .select(&self.selection)
            .await
            .map_err(|e| self.store_failure(None, e))?;
        tracing::debug!(entity = R::ENTITY, count = rows.len(), "Records selected");
        Ok(rows)
    }

    /// Executes the selection and expects exactly one row.
    pub async fn scalar(&self) -> Result<R> {
        let mut rows = self.scalars().await?;
        match rows.len() {
            0 => Err(RepositoryError::NotFound {
                entity_type: R::ENTITY,
                id: self.describe_target(),
            }),
            1 => Ok(rows.remove(0)),
            count => Err(RepositoryError::MultipleResults {
                entity_type: R::ENTITY,
                count,
            }),
        }
    }

    /// The single record with `id` among the current selection's matches.
    ///
    /// The pagination window is ignored.
    pub async fn get_one(&self, id: Uuid) -> Result<R> {
        let mut narrowed = self.clone().filter_by(ID_FIELD, id)?;
        narrowed.selection = narrowed.selection.unwindowed();
        narrowed.target_id = Some(id);
        narrowed.scalar().await
    }

    /// Builds a record from `data` and persists it.
    ///
    /// The identifier comes from `data`, then from the repository's target,
    /// then from a fresh v4 UUID. Creation and update timestamps are stamped
    /// with the current time; other managed fields in `data` are ignored.
    pub async fn create(&self, data: FieldMap) -> Result<R> {
        let record = self.build(data)?;
        let id = record.id();
        let stored = self
            .store
            .insert(record)
            .await
            .map_err(|e| self.store_failure(Some(id), e))?;
        tracing::debug!(entity = R::ENTITY, id = %id, "Record created");
        Ok(stored)
    }

    /// Applies `data` to the single selected record and persists it.
    pub async fn update(&self, data: FieldMap) -> Result<R> {
        let current = self.scalar().await?;
        self.apply(current, data).await
    }

    /// Updates the selected record, or creates one from `data` if none matches.
    pub async fn upsert(&self, data: FieldMap) -> Result<R> {
        match self.scalar().await {
            Ok(current) => self.apply(current, data).await,
            Err(RepositoryError::NotFound { .. }) => self.create(data).await,
            Err(e) => Err(e),
        }
    }

    /// Removes the single selected record and returns it.
    pub async fn delete(&self) -> Result<R> {
        let record = self.scalar().await?;
        let id = record.id();
        self.store
            .remove(&record)
            .await
            .map_err(|e| self.store_failure(Some(id), e))?;
        tracing::debug!(entity = R::ENTITY, id = %id, "Record deleted");
        Ok(record)
    }

    fn and(mut self, predicate: Predicate) -> Self {
        self.selection = self.selection.and(predicate);
        self
    }

    fn build(&self, mut data: FieldMap) -> Result<R> {
        let id = match data.remove(ID_FIELD) {
            None | Some(FieldValue::Null) => self.target_id.unwrap_or_else(Uuid::new_v4),
            Some(value) => convert::<R, Uuid>(ID_FIELD, value)?,
        };

        let mut fields = FieldMap::new();
        for (field, value) in data {
            let def = R::check_value(&field, &value)?;
            if !def.managed {
                fields.insert(field, value);
            }
        }

        let now = Utc::now();
        fields.insert(ID_FIELD.to_string(), id.into());
        for stamp in [CREATED_FIELD, UPDATED_FIELD] {
            if R::field_def(stamp).is_ok() {
                fields.insert(stamp.to_string(), now.into());
            }
        }

        Ok(R::from_fields(fields)?)
    }

    async fn apply(&self, mut record: R, data: FieldMap) -> Result<R> {
        let id = record.id();
        for (field, value) in data {
            let def = R::check_value(&field, &value)?;
            if def.name == ID_FIELD {
                if value.as_uuid() != Some(id) {
                    return Err(RepositoryError::Conflict {
                        entity_type: R::ENTITY,
                        reason: format!("identifier {value} does not match {id}"),
                        source: None,
                    });
                }
                continue;
            }
            if def.managed {
                continue;
            }
            record.set(def.name, value)?;
        }
        if R::field_def(UPDATED_FIELD).is_ok() {
            record.set(UPDATED_FIELD, Utc::now().into())?;
        }

        let stored = self
            .store
            .save(record)
            .await
            .map_err(|e| self.store_failure(Some(id), e))?;
        tracing::debug!(entity = R::ENTITY, id = %id, "Record updated");
        Ok(stored)
    }

    fn describe_target(&self) -> String {
        self.target_id
            .map_or_else(|| "no matching record".to_string(), |id| id.to_string())
    }

    fn store_failure(&self, id: Option<Uuid>, error: StoreError) -> RepositoryError {
        let id = id.or(self.target_id).map(|id| id.to_string());
        RepositoryError::from_store(R::ENTITY, id, error)
    }
}
