use axum::{
    http::{header, Method, StatusCode},
    routing::{get, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        health::{health, readyz},
        items::{
            create_item, delete_item, get_item, list_items, list_owner_items, update_item,
            upsert_item, upsert_owner_item,
        },
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE]);

    let api_routes = Router::new()
        // Item routes
        .route("/items", get(list_items).post(create_item))
        .route(
            "/items/{item_id}",
            get(get_item)
                .put(upsert_item)
                .patch(update_item)
                .delete(delete_item),
        )
        // Owner-scoped item routes
        .route("/owners/{owner_id}/items", get(list_owner_items))
        .route("/owners/{owner_id}/items/{item_id}", put(upsert_owner_item))
        .layer(cors);

    let timeout = state.config.request_timeout();

    Router::new()
        .route("/health", get(health))
        .route("/readyz", get(readyz))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .with_state(state)
}
