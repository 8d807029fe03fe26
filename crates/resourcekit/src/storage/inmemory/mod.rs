//! In-memory storage backend.
//!
//! Rows live in a `Vec` wrapped in `Arc<RwLock<_>>`, kept in insertion order.
//! Data is not persisted and is lost when the store is dropped.
//!
//! # Example
//!
//! ```rust,ignore
//! use resourcekit::storage::inmemory::InMemoryStore;
//!
//! let store: InMemoryStore<Item> = InMemoryStore::new();
//! ```

mod store;

pub use store::InMemoryStore;
