//! Generic service facade over a [`Repository`].
//!
//! A service converts between a record and its external [`Representation`]
//! and delegates every operation to its repository. It adds no error
//! translation of its own beyond representation validation.

use std::marker::PhantomData;
use std::sync::Arc;

use uuid::Uuid;

use crate::filters::Filters;
use crate::record::{FieldMap, FieldValue, Record};
use crate::storage::{Repository, RepositoryError, RepositoryParams, Result, Store};

/// External form of a record `R`.
pub trait Representation<R: Record>: Sized {
    fn from_record(record: &R) -> Self;

    /// The write payload this representation carries.
    fn into_fields(self) -> FieldMap;

    /// Resource-specific checks run before every write.
    fn validate(&self) -> std::result::Result<(), String> {
        Ok(())
    }
}

/// Request-scoped service for record `R` exposed as `D`.
pub struct Service<R: Record, D> {
    repository: Repository<R>,
    _representation: PhantomData<fn() -> D>,
}

impl<R, D> Service<R, D>
where
    R: Record,
    D: Representation<R>,
{
    /// Builds the repository from an optional path identifier and the
    /// request's filters.
    pub fn new(store: Arc<dyn Store<R>>, id: Option<Uuid>, filters: Filters) -> Result<Self> {
        let params = RepositoryParams::new(id).with_filters(filters);
        Ok(Self::from_repository(Repository::construct(store, params)?))
    }

    pub fn from_repository(repository: Repository<R>) -> Self {
        Self {
            repository,
            _representation: PhantomData,
        }
    }

    /// Narrows every later operation to records with `field == value`.
    pub fn filter_by(self, field: &str, value: impl Into<FieldValue>) -> Result<Self> {
        Ok(Self::from_repository(self.repository.filter_by(field, value)?))
    }

    pub async fn create(&self, data: D) -> Result<D> {
        let fields = Self::checked(data)?;
        let record = self.repository.create(fields).await?;
        Ok(D::from_record(&record))
    }

    pub async fn list(&self) -> Result<Vec<D>> {
        let records = self.repository.scalars().await?;
        Ok(records.iter().map(D::from_record).collect())
    }

    pub async fn show(&self) -> Result<D> {
        let record = self.repository.scalar().await?;
        Ok(D::from_record(&record))
    }

    pub async fn update(&self, data: D) -> Result<D> {
        let fields = Self::checked(data)?;
        let record = self.repository.update(fields).await?;
        Ok(D::from_record(&record))
    }

    pub async fn upsert(&self, data: D) -> Result<D> {
        let fields = Self::checked(data)?;
        let record = self.repository.upsert(fields).await?;
        Ok(D::from_record(&record))
    }

    pub async fn destroy(&self) -> Result<D> {
        let record = self.repository.delete().await?;
        Ok(D::from_record(&record))
    }

    fn checked(data: D) -> Result<FieldMap> {
        data.validate().map_err(RepositoryError::Validation)?;
        Ok(data.into_fields())
    }
}
