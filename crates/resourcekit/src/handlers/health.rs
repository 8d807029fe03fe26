//! Health check endpoints.
//!
//! - `/health` - Liveness probe (immediate 200, no checks)
//! - `/readyz` - Readiness probe (one bounded read against the item store)

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use resourcekit_core::filters::LimitOffset;
use resourcekit_core::selection::Selection;

use crate::state::AppState;

/// GET /health - Basic liveness probe.
#[axum::debug_handler]
pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// GET /readyz - Readiness probe.
///
/// Returns 200 when the store answers a single-row select, 503 otherwise.
#[axum::debug_handler]
pub async fn readyz(State(state): State<AppState>) -> Response {
    let probe = Selection::all().paginate(LimitOffset::new(1, 0));

    match state.items.select(&probe).await {
        Ok(_) => (StatusCode::OK, Json(serde_json::json!({ "ready": true }))).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness probe failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "ready": false,
                    "error": e.to_string()
                })),
            )
                .into_response()
        }
    }
}
