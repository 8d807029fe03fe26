use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::record::{CREATED_FIELD, ID_FIELD, UPDATED_FIELD};

use super::FilterError;

/// Membership constraint on a single field.
///
/// `values: None` adds no constraint at all; `Some(vec![])` matches nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionFilter<T> {
    pub field_name: String,
    pub values: Option<Vec<T>>,
}

impl<T> CollectionFilter<T> {
    pub fn new(field_name: impl Into<String>, values: Option<Vec<T>>) -> Self {
        Self {
            field_name: field_name.into(),
            values,
        }
    }

    /// A filter that constrains nothing.
    pub fn unconstrained(field_name: impl Into<String>) -> Self {
        Self::new(field_name, None)
    }
}

impl CollectionFilter<Uuid> {
    /// Membership filter on the record identifier.
    pub fn ids(values: Vec<Uuid>) -> Self {
        Self::new(ID_FIELD, Some(values))
    }
}

/// Strict range constraint on a timestamp field.
///
/// `before` keeps rows with `field < before`; `after` keeps rows with
/// `field > after`. Either bound may be absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeforeAfter {
    pub field_name: &'static str,
    pub before: Option<DateTime<Utc>>,
    pub after: Option<DateTime<Utc>>,
}

impl BeforeAfter {
    pub fn new(
        field_name: &'static str,
        before: Option<DateTime<Utc>>,
        after: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            field_name,
            before,
            after,
        }
    }

    pub fn created(before: Option<DateTime<Utc>>, after: Option<DateTime<Utc>>) -> Self {
        Self::new(CREATED_FIELD, before, after)
    }

    pub fn updated(before: Option<DateTime<Utc>>, after: Option<DateTime<Utc>>) -> Self {
        Self::new(UPDATED_FIELD, before, after)
    }

    /// True when neither bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.before.is_none() && self.after.is_none()
    }

    /// Rejects ranges whose bounds leave no room between them.
    pub fn validate(&self) -> Result<(), FilterError> {
        match (self.before, self.after) {
            (Some(before), Some(after)) if after >= before => Err(FilterError::EmptyRange {
                field: self.field_name.to_string(),
            }),
            _ => Ok(()),
        }
    }
}

/// LIMIT/OFFSET window over a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitOffset {
    pub limit: u64,
    pub offset: u64,
}

impl LimitOffset {
    pub fn new(limit: u64, offset: u64) -> Self {
        Self { limit, offset }
    }

    /// Window for a 1-indexed page of `page_size` rows.
    ///
    /// # Examples
    ///
    /// ```
    /// use resourcekit_core::filters::LimitOffset;
    ///
    /// let window = LimitOffset::from_page(2, 10).unwrap();
    /// assert_eq!(window, LimitOffset::new(10, 10));
    /// ```
    pub fn from_page(page: u64, page_size: u64) -> Result<Self, FilterError> {
        if page < 1 {
            return Err(FilterError::InvalidPage(page));
        }
        if page_size < 1 {
            return Err(FilterError::InvalidPageSize(page_size));
        }
        Ok(Self {
            limit: page_size,
            offset: page_size.saturating_mul(page - 1),
        })
    }
}

/// Configured page-size policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub default_page_size: u64,
    pub max_page_size: u64,
}

impl Pagination {
    pub fn new(default_page_size: u64, max_page_size: u64) -> Self {
        Self {
            default_page_size,
            max_page_size,
        }
    }

    /// Resolves a requested page size against the policy.
    pub fn page_size(&self, requested: Option<u64>) -> u64 {
        requested
            .unwrap_or(self.default_page_size)
            .min(self.max_page_size)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(20, 100)
    }
}

/// The per-request filters a repository applies at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub id: Option<CollectionFilter<Uuid>>,
    pub created: Option<BeforeAfter>,
    pub updated: Option<BeforeAfter>,
    pub limit_offset: Option<LimitOffset>,
}

impl Filters {
    /// No constraints at all.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_ids(mut self, ids: Vec<Uuid>) -> Self {
        self.id = Some(CollectionFilter::ids(ids));
        self
    }

    pub fn with_created(mut self, filter: BeforeAfter) -> Self {
        self.created = Some(filter);
        self
    }

    pub fn with_updated(mut self, filter: BeforeAfter) -> Self {
        self.updated = Some(filter);
        self
    }

    pub fn with_limit_offset(mut self, window: LimitOffset) -> Self {
        self.limit_offset = Some(window);
        self
    }
}
