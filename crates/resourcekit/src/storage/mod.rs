//! Store implementations for the resources served by this binary.
//!
//! Both backends implement `resourcekit_core::storage::Store` for any record
//! type and are selected at runtime from `STORAGE_BACKEND`.
//!
//! # Feature Flags
//!
//! - `sqlite` (default): SQLite store using `rusqlite` and `tokio-rusqlite`
//!
//! The in-memory store is always available.

pub mod inmemory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use inmemory::InMemoryStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
