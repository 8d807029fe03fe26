//! Immutable per-request query constraints.

mod error;
mod params;
mod types;

pub use error::FilterError;
pub use params::FilterParams;
pub use types::{BeforeAfter, CollectionFilter, Filters, LimitOffset, Pagination};
