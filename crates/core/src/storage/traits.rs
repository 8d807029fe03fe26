use async_trait::async_trait;

use crate::record::Record;
use crate::selection::Selection;

use super::StoreError;

/// Persistence collaborator behind a [`Repository`](super::Repository).
///
/// Implementations are shared between requests and must synchronise
/// internally.
#[async_trait]
pub trait Store<R: Record>: Send + Sync {
    /// Returns the rows matching `selection`, windowed, in a stable order.
    async fn select(&self, selection: &Selection) -> Result<Vec<R>, StoreError>;

    /// Persists a new row and returns it as stored.
    async fn insert(&self, record: R) -> Result<R, StoreError>;

    /// Overwrites the row with `record.id()` and returns it as stored.
    async fn save(&self, record: R) -> Result<R, StoreError>;

    /// Removes the row with `record.id()`.
    async fn remove(&self, record: &R) -> Result<(), StoreError>;
}
