//! SQLite error mapping.
//!
//! Maps `tokio_rusqlite::Error` and `rusqlite::Error` to `StoreError` from
//! `resourcekit_core::storage`. Constraint violations become integrity errors
//! so the repository can report them as conflicts.

use resourcekit_core::storage::StoreError;

/// Maps a rusqlite error to a StoreError.
///
/// # Error Mapping
///
/// - `SQLITE_CONSTRAINT_UNIQUE` / `SQLITE_CONSTRAINT_PRIMARYKEY` → integrity
/// - `CannotOpen` → connection
/// - `QueryReturnedNoRows` → missing
/// - Column conversion failures → serialization
/// - All other errors → query
fn map_rusqlite_error(err: &rusqlite::Error) -> StoreError {
    match err {
        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if sqlite_err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || sqlite_err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
        {
            StoreError::integrity(err.to_string())
        }

        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if sqlite_err.code == rusqlite::ErrorCode::CannotOpen =>
        {
            StoreError::connection(format!("Cannot open database: {err}"))
        }

        rusqlite::Error::QueryReturnedNoRows => StoreError::missing(err.to_string()),

        rusqlite::Error::FromSqlConversionFailure(..) | rusqlite::Error::InvalidColumnType(..) => {
            StoreError::serialization(err.to_string())
        }

        _ => StoreError::query(err.to_string()),
    }
}

/// Maps a tokio_rusqlite error to a StoreError.
///
/// This is the main entry point for error mapping in async code.
pub fn map_tokio_rusqlite_error(err: tokio_rusqlite::Error) -> StoreError {
    match &err {
        tokio_rusqlite::Error::Rusqlite(rusqlite_err) => map_rusqlite_error(rusqlite_err),
        tokio_rusqlite::Error::ConnectionClosed | tokio_rusqlite::Error::Close(_) => {
            StoreError::connection("Connection closed unexpectedly")
        }
        _ => StoreError::query(err.to_string()),
    }
}
