use std::{env, time::Duration};

use resourcekit_core::filters::Pagination;

/// Which store backs the resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Sqlite,
}

impl StorageBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" | "inmemory" => Some(Self::Memory),
            "sqlite" => Some(Self::Sqlite),
            _ => None,
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Page size when the request has no `page-size` (default: 20)
    pub default_pagination_limit: u64,
    /// Upper bound for a requested `page-size` (default: 100)
    pub max_pagination_limit: u64,
    /// Store backend (default: memory)
    pub storage_backend: StorageBackend,
    /// Path to SQLite database file (default: "resourcekit.db")
    pub sqlite_path: String,
    /// Per-request timeout in seconds (default: 10)
    pub request_timeout_seconds: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DEFAULT_PAGINATION_LIMIT` - Default page size (default: 20)
    /// - `MAX_PAGINATION_LIMIT` - Maximum page size (default: 100)
    /// - `STORAGE_BACKEND` - `memory` or `sqlite` (default: memory)
    /// - `SQLITE_PATH` - SQLite database path (default: "resourcekit.db")
    /// - `REQUEST_TIMEOUT_SECONDS` - Request timeout (default: 10)
    pub fn from_env() -> Self {
        let default_pagination_limit = env::var("DEFAULT_PAGINATION_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|v: &u64| *v > 0)
            .unwrap_or(20);
        let max_pagination_limit = env::var("MAX_PAGINATION_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|v: &u64| *v > 0)
            .unwrap_or(100);

        Self {
            default_pagination_limit: default_pagination_limit.min(max_pagination_limit),
            max_pagination_limit,
            storage_backend: env::var("STORAGE_BACKEND")
                .ok()
                .and_then(|v| StorageBackend::parse(&v))
                .unwrap_or(StorageBackend::Memory),
            sqlite_path: env::var("SQLITE_PATH").unwrap_or_else(|_| "resourcekit.db".to_string()),
            request_timeout_seconds: env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        }
    }

    /// Page-size policy for collection endpoints.
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.default_pagination_limit, self.max_pagination_limit)
    }

    /// Get request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Environment-independent configuration for tests.
    pub(crate) fn test_config() -> Config {
        Config {
            default_pagination_limit: 25,
            max_pagination_limit: 50,
            storage_backend: StorageBackend::Memory,
            sqlite_path: "test.db".to_string(),
            request_timeout_seconds: 30,
        }
    }

    #[test]
    fn test_request_timeout_conversion() {
        assert_eq!(test_config().request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_pagination_policy() {
        assert_eq!(test_config().pagination(), Pagination::new(25, 50));
    }

    #[test]
    fn test_storage_backend_parse() {
        assert_eq!(StorageBackend::parse("sqlite"), Some(StorageBackend::Sqlite));
        assert_eq!(StorageBackend::parse(" Memory "), Some(StorageBackend::Memory));
        assert_eq!(StorageBackend::parse("dynamodb"), None);
    }

    #[test]
    fn test_default_values() {
        // Clear environment variables to test defaults
        env::remove_var("DEFAULT_PAGINATION_LIMIT");
        env::remove_var("MAX_PAGINATION_LIMIT");
        env::remove_var("STORAGE_BACKEND");
        env::remove_var("SQLITE_PATH");
        env::remove_var("REQUEST_TIMEOUT_SECONDS");

        let config = Config::from_env();

        assert_eq!(config.default_pagination_limit, 20);
        assert_eq!(config.max_pagination_limit, 100);
        assert_eq!(config.storage_backend, StorageBackend::Memory);
        assert_eq!(config.sqlite_path, "resourcekit.db");
        assert_eq!(config.request_timeout_seconds, 10);
    }
}
