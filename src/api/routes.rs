//! API Routes
//!
//! Configures the Axum router with all cache admin endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_all_handler, evict_handler, get_entry_handler, health_handler,
    invalidate_events_handler, invalidate_key_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /health` - Health check endpoint
/// - `GET /stats` - Cache statistics
/// - `GET /cache/:key` - Inspect an entry, expired or not
/// - `DELETE /cache/:key` - Invalidate one key
/// - `DELETE /cache` - Clear the whole namespace
/// - `POST /cache/evict` - Sweep expired entries
/// - `POST /cache/events/invalidate` - Invalidate event-derived keys
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .route("/cache", delete(clear_all_handler))
        .route("/cache/evict", post(evict_handler))
        .route("/cache/events/invalidate", post(invalidate_events_handler))
        .route(
            "/cache/:key",
            get(get_entry_handler).delete(invalidate_key_handler),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
