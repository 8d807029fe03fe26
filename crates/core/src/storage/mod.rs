mod error;
mod http_mapping;
mod repository;
mod traits;

#[cfg(test)]
pub(crate) mod fixtures;

pub use error::{RepositoryError, Result, StoreError, StoreErrorKind};
pub use http_mapping::{
    filter_error_to_status_code, guard_rejection_to_status_code, repository_error_to_status_code,
};
pub use repository::{Repository, RepositoryParams};
pub use traits::Store;
