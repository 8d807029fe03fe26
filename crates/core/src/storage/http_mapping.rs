//! Pure functions for mapping core errors to HTTP status codes.

use crate::filters::FilterError;
use crate::guard::GuardRejection;

use super::{RepositoryError, StoreErrorKind};

/// Maps a [`RepositoryError`] to an HTTP status code.
///
/// - `NotFound` -> 404 (Not Found)
/// - `Conflict` -> 409 (Conflict)
/// - `MultipleResults` -> 500 (Internal Server Error)
/// - `Store` -> 503 for connection failures, 500 otherwise
/// - `Field`, `Validation` -> 400 (Bad Request)
///
/// # Examples
///
/// ```
/// use resourcekit_core::storage::{RepositoryError, repository_error_to_status_code};
///
/// let error = RepositoryError::NotFound {
///     entity_type: "Item",
///     id: "abc-123".to_string(),
/// };
/// assert_eq!(repository_error_to_status_code(&error), 404);
/// ```
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    match error {
        RepositoryError::NotFound { .. } => 404,
        RepositoryError::Conflict { .. } => 409,
        RepositoryError::MultipleResults { .. } => 500,
        RepositoryError::Store { source, .. } => match source.kind {
            StoreErrorKind::Connection => 503,
            _ => 500,
        },
        RepositoryError::Field(_) => 400,
        RepositoryError::Validation(_) => 400,
    }
}

/// Maps a [`GuardRejection`] to an HTTP status code.
///
/// A payload/path mismatch is a 401; a rule naming a path parameter the route
/// does not have is a server misconfiguration.
pub fn guard_rejection_to_status_code(rejection: &GuardRejection) -> u16 {
    match rejection {
        GuardRejection::Mismatch { .. } => 401,
        GuardRejection::MissingPathParameter(_) => 500,
    }
}

/// Maps a [`FilterError`] to an HTTP status code.
///
/// Every filter error is a malformed request (400).
pub fn filter_error_to_status_code(_error: &FilterError) -> u16 {
    400
}
