use thiserror::Error;

/// Errors raised while turning request parameters into filters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("page must be at least 1, got {0}")]
    InvalidPage(u64),
    #[error("page-size must be at least 1, got {0}")]
    InvalidPageSize(u64),
    #[error("invalid {field} range: after must be earlier than before")]
    EmptyRange { field: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_page_display() {
        assert_eq!(
            FilterError::InvalidPage(0).to_string(),
            "page must be at least 1, got 0"
        );
    }

    #[test]
    fn test_invalid_page_size_display() {
        assert_eq!(
            FilterError::InvalidPageSize(0).to_string(),
            "page-size must be at least 1, got 0"
        );
    }

    #[test]
    fn test_empty_range_display() {
        let error = FilterError::EmptyRange {
            field: "created".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "invalid created range: after must be earlier than before"
        );
    }
}
