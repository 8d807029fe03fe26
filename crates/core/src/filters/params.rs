use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use super::{BeforeAfter, CollectionFilter, FilterError, Filters, LimitOffset, Pagination};

/// Query-string parameters accepted by collection endpoints.
///
/// `id` (alias `ids`) may be repeated. Timestamps are RFC 3339. `page` is 1-indexed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FilterParams {
    #[serde(default, alias = "ids")]
    pub id: Vec<Uuid>,
    #[serde(default, rename = "created-before")]
    pub created_before: Option<DateTime<Utc>>,
    #[serde(default, rename = "created-after")]
    pub created_after: Option<DateTime<Utc>>,
    #[serde(default, rename = "updated-before")]
    pub updated_before: Option<DateTime<Utc>>,
    #[serde(default, rename = "updated-after")]
    pub updated_after: Option<DateTime<Utc>>,
    #[serde(default)]
    pub page: Option<u64>,
    #[serde(default, rename = "page-size")]
    pub page_size: Option<u64>,
}

impl FilterParams {
    /// Builds the [`Filters`] aggregate for one request.
    ///
    /// No `id` parameter means no id filter. Range filters are only added when
    /// at least one bound is present. Pagination is always applied, with the
    /// page size defaulted and clamped by `pagination`.
    pub fn into_filters(self, pagination: &Pagination) -> Result<Filters, FilterError> {
        let id = (!self.id.is_empty()).then(|| CollectionFilter::ids(self.id));

        let created = BeforeAfter::created(self.created_before, self.created_after);
        created.validate()?;
        let updated = BeforeAfter::updated(self.updated_before, self.updated_after);
        updated.validate()?;

        let page = self.page.unwrap_or(1);
        let page_size = pagination.page_size(self.page_size);
        let limit_offset = LimitOffset::from_page(page, page_size)?;

        Ok(Filters {
            id,
            created: (!created.is_unbounded()).then_some(created),
            updated: (!updated.is_unbounded()).then_some(updated),
            limit_offset: Some(limit_offset),
        })
    }
}
