//! In-memory store implementation.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use resourcekit_core::record::Record;
use resourcekit_core::selection::Selection;
use resourcekit_core::storage::{Store, StoreError};

/// In-memory store for one record type.
///
/// Enforces the primary key and every `unique` field of `R::FIELDS`, so
/// integrity failures surface the same way they do with SQLite.
#[derive(Debug, Clone)]
pub struct InMemoryStore<R> {
    rows: Arc<RwLock<Vec<R>>>,
}

impl<R: Record> Default for InMemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> InMemoryStore<R> {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self {
            rows: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Creates a store holding `rows` in the given order.
    pub fn with_rows(rows: Vec<R>) -> Self {
        Self {
            rows: Arc::new(RwLock::new(rows)),
        }
    }
}

/// Checks `record` against the unique fields of every other row.
fn check_unique<R: Record>(rows: &[R], record: &R) -> Result<(), StoreError> {
    for def in R::FIELDS.iter().filter(|def| def.unique) {
        let Some(value) = record.get(def.name).filter(|v| !v.is_null()) else {
            continue;
        };
        let taken = rows
            .iter()
            .filter(|other| other.id() != record.id())
            .any(|other| other.get(def.name).as_ref() == Some(&value));
        if taken {
            return Err(StoreError::integrity(format!(
                "UNIQUE constraint failed: {}.{}",
                R::TABLE,
                def.name
            )));
        }
    }
    Ok(())
}

#[async_trait]
impl<R: Record> Store<R> for InMemoryStore<R> {
    async fn select(&self, selection: &Selection) -> Result<Vec<R>, StoreError> {
        let rows = self.rows.read().await;
        Ok(selection.apply(rows.iter()))
    }

    async fn insert(&self, record: R) -> Result<R, StoreError> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|r| r.id() == record.id()) {
            return Err(StoreError::integrity(format!(
                "PRIMARY KEY constraint failed: {}.id",
                R::TABLE
            )));
        }
        check_unique(&rows, &record)?;
        rows.push(record.clone());
        Ok(record)
    }

    async fn save(&self, record: R) -> Result<R, StoreError> {
        let mut rows = self.rows.write().await;
        check_unique(&rows, &record)?;
        let slot = rows
            .iter_mut()
            .find(|r| r.id() == record.id())
            .ok_or_else(|| StoreError::missing(record.id().to_string()))?;
        *slot = record.clone();
        Ok(record)
    }

    async fn remove(&self, record: &R) -> Result<(), StoreError> {
        let mut rows = self.rows.write().await;
        let position = rows
            .iter()
            .position(|r| r.id() == record.id())
            .ok_or_else(|| StoreError::missing(record.id().to_string()))?;
        rows.remove(position);
        Ok(())
    }
}
