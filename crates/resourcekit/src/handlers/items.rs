//! Item CRUD handlers.
//!
//! Each handler builds a request-scoped [`Service`] from the path identifier
//! and query filters, then delegates. Writes addressed to a specific item are
//! guarded so the payload cannot name a different record than the path.

use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use uuid::Uuid;

use resourcekit_core::filters::Filters;
use resourcekit_core::guard::PayloadGuard;
use resourcekit_core::service::Service;

use crate::{
    handlers::{filters::ListFilters, AppError},
    models::{Item, ItemView},
    state::AppState,
};

type ItemService = Service<Item, ItemView>;

fn item_service(state: &AppState, id: Option<Uuid>, filters: Filters) -> Result<ItemService, AppError> {
    Ok(ItemService::new(state.items.clone(), id, filters)?)
}

/// Path parameters in canonical form, keyed by route parameter name.
///
/// Guards compare against the parsed identifiers, so uppercase or
/// unhyphenated UUIDs in the URL match the canonical form in the payload.
fn path_params<const N: usize>(params: [(&str, Uuid); N]) -> HashMap<String, String> {
    params
        .into_iter()
        .map(|(key, id)| (key.to_string(), id.to_string()))
        .collect()
}

/// Checks the raw payload against the path, then decodes it.
fn guarded_payload(
    guard: &PayloadGuard,
    payload: Value,
    path: &HashMap<String, String>,
) -> Result<ItemView, AppError> {
    guard.check(&payload, path)?;
    Ok(serde_json::from_value(payload)?)
}

// ============================================================================
// Collection
// ============================================================================

/// List items (GET /api/items).
pub async fn list_items(
    State(state): State<AppState>,
    ListFilters(filters): ListFilters,
) -> Result<Json<Vec<ItemView>>, AppError> {
    let items = item_service(&state, None, filters)?.list().await?;
    Ok(Json(items))
}

/// Create an item (POST /api/items).
pub async fn create_item(
    State(state): State<AppState>,
    Json(payload): Json<ItemView>,
) -> Result<(StatusCode, Json<ItemView>), AppError> {
    let item = item_service(&state, None, Filters::none())?
        .create(payload)
        .await?;

    tracing::info!(item_id = ?item.id, "Created item");
    Ok((StatusCode::CREATED, Json(item)))
}

// ============================================================================
// Single item
// ============================================================================

/// Get a single item (GET /api/items/{item_id}).
pub async fn get_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> Result<Json<ItemView>, AppError> {
    let item = item_service(&state, Some(item_id), Filters::none())?
        .show()
        .await?;
    Ok(Json(item))
}

/// Create or replace an item (PUT /api/items/{item_id}).
pub async fn upsert_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Json(payload): Json<Value>,
) -> Result<Json<ItemView>, AppError> {
    let path = path_params([("item_id", item_id)]);
    let view = guarded_payload(&PayloadGuard::single("item_id"), payload, &path)?;

    let item = item_service(&state, Some(item_id), Filters::none())?
        .upsert(view)
        .await?;

    tracing::info!(%item_id, "Upserted item");
    Ok(Json(item))
}

/// Update an existing item (PATCH /api/items/{item_id}).
pub async fn update_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Json(payload): Json<Value>,
) -> Result<Json<ItemView>, AppError> {
    let path = path_params([("item_id", item_id)]);
    let view = guarded_payload(&PayloadGuard::single("item_id"), payload, &path)?;

    let item = item_service(&state, Some(item_id), Filters::none())?
        .update(view)
        .await?;

    tracing::info!(%item_id, "Updated item");
    Ok(Json(item))
}

/// Delete an item (DELETE /api/items/{item_id}).
///
/// Responds with the deleted item.
pub async fn delete_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> Result<Json<ItemView>, AppError> {
    let item = item_service(&state, Some(item_id), Filters::none())?
        .destroy()
        .await?;

    tracing::info!(%item_id, "Deleted item");
    Ok(Json(item))
}

// ============================================================================
// Owner-scoped
// ============================================================================

/// List an owner's items (GET /api/owners/{owner_id}/items).
pub async fn list_owner_items(
    State(state): State<AppState>,
    Path(owner_id): Path<Uuid>,
    ListFilters(filters): ListFilters,
) -> Result<Json<Vec<ItemView>>, AppError> {
    let items = item_service(&state, None, filters)?
        .filter_by("owner_id", owner_id)?
        .list()
        .await?;
    Ok(Json(items))
}

/// Create or replace an owner's item (PUT /api/owners/{owner_id}/items/{item_id}).
///
/// Both `owner_id` and `id` in the payload must match the path.
pub async fn upsert_owner_item(
    State(state): State<AppState>,
    Path((owner_id, item_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<Value>,
) -> Result<Json<ItemView>, AppError> {
    let path = path_params([("owner_id", owner_id), ("item_id", item_id)]);
    let guard = PayloadGuard::new([("owner_id", "owner_id"), ("id", "item_id")]);
    let view = guarded_payload(&guard, payload, &path)?;

    let item = item_service(&state, Some(item_id), Filters::none())?
        .filter_by("owner_id", owner_id)?
        .upsert(view)
        .await?;

    tracing::info!(%owner_id, %item_id, "Upserted owner item");
    Ok(Json(item))
}
