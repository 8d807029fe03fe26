use thiserror::Error;

use crate::record::FieldError;

/// Broad category of a store failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    /// Unique or primary-key constraint violated.
    Integrity,
    /// The row the operation targeted no longer exists.
    Missing,
    /// The backing store could not be reached.
    Connection,
    Query,
    Serialization,
}

/// Failure reported by a [`Store`](super::Store) implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct StoreError {
    pub kind: StoreErrorKind,
    pub message: String,
}

impl StoreError {
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn integrity(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Integrity, message)
    }

    pub fn missing(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Missing, message)
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Connection, message)
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Query, message)
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Serialization, message)
    }
}

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("{entity_type} conflict: {reason}")]
    Conflict {
        entity_type: &'static str,
        reason: String,
        #[source]
        source: Option<StoreError>,
    },
    #[error("Expected one {entity_type}, found {count}")]
    MultipleResults {
        entity_type: &'static str,
        count: usize,
    },
    #[error("{entity_type} store failure: {source}")]
    Store {
        entity_type: &'static str,
        #[source]
        source: StoreError,
    },
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error("Invalid data: {0}")]
    Validation(String),
}

impl RepositoryError {
    /// Translates a store failure for entity `entity_type`.
    ///
    /// Integrity violations become [`RepositoryError::Conflict`] and vanished
    /// rows become [`RepositoryError::NotFound`] for `id`. Everything else is
    /// wrapped in [`RepositoryError::Store`].
    pub fn from_store(entity_type: &'static str, id: Option<String>, error: StoreError) -> Self {
        match error.kind {
            StoreErrorKind::Integrity => Self::Conflict {
                entity_type,
                reason: error.message.clone(),
                source: Some(error),
            },
            StoreErrorKind::Missing => Self::NotFound {
                entity_type,
                id: id.unwrap_or_else(|| error.message.clone()),
            },
            _ => Self::Store {
                entity_type,
                source: error,
            },
        }
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;
