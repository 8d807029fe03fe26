//! Query-string extractor for collection endpoints.

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::Query;
use resourcekit_core::filters::{FilterParams, Filters};

use crate::{handlers::AppError, state::AppState};

/// Request filters parsed from the query string.
///
/// Repeated keys (`?id=a&id=b`) are collected, which is why this goes through
/// `axum_extra`'s `Query` rather than axum's. The page size is defaulted and
/// clamped by the configured pagination policy.
#[derive(Debug, Clone)]
pub struct ListFilters(pub Filters);

impl FromRequestParts<AppState> for ListFilters {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<FilterParams>::from_request_parts(parts, state).await?;
        let filters = params.into_filters(&state.config.pagination())?;
        Ok(Self(filters))
    }
}
