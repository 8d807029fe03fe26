//! Minimal store used by the core's unit tests.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::record::Record;
use crate::selection::Selection;

use super::{Store, StoreError};

pub struct MemoryStore<R> {
    rows: Arc<RwLock<Vec<R>>>,
    select_failure: Mutex<Option<StoreError>>,
    save_failure: Mutex<Option<StoreError>>,
}

impl<R: Record> MemoryStore<R> {
    pub fn new() -> Self {
        Self {
            rows: Arc::new(RwLock::new(Vec::new())),
            select_failure: Mutex::new(None),
            save_failure: Mutex::new(None),
        }
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    /// Makes the next `select` fail with `error`.
    pub async fn fail_next_select(&self, error: StoreError) {
        *self.select_failure.lock().await = Some(error);
    }

    /// Makes the next `save` fail with `error`.
    pub async fn fail_next_save(&self, error: StoreError) {
        *self.save_failure.lock().await = Some(error);
    }
}

#[async_trait]
impl<R: Record> Store<R> for MemoryStore<R> {
    async fn select(&self, selection: &Selection) -> Result<Vec<R>, StoreError> {
        if let Some(error) = self.select_failure.lock().await.take() {
            return Err(error);
        }
        let rows = self.rows.read().await;
        Ok(selection.apply(rows.iter()))
    }

    async fn insert(&self, record: R) -> Result<R, StoreError> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|r| r.id() == record.id()) {
            return Err(StoreError::integrity(format!(
                "duplicate primary key {}",
                record.id()
            )));
        }
        rows.push(record.clone());
        Ok(record)
    }

    async fn save(&self, record: R) -> Result<R, StoreError> {
        if let Some(error) = self.save_failure.lock().await.take() {
            return Err(error);
        }
        let mut rows = self.rows.write().await;
        let slot = rows
            .iter_mut()
            .find(|r| r.id() == record.id())
            .ok_or_else(|| StoreError::missing(record.id().to_string()))?;
        *slot = record.clone();
        Ok(record)
    }

    async fn remove(&self, record: &R) -> Result<(), StoreError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|r| r.id() != record.id());
        if rows.len() == before {
            return Err(StoreError::missing(record.id().to_string()));
        }
        Ok(())
    }
}
