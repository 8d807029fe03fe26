//! SQLite storage backend implementation.
//!
//! Provides a SQLite-based [`Store`](resourcekit_core::storage::Store) for any
//! record type, using `rusqlite` for synchronous operations and
//! `tokio-rusqlite` for async wrapping. Tables are created from the record's
//! field table.

mod conversions;
mod error;
mod schema;
mod store;

pub use store::SqliteStore;
