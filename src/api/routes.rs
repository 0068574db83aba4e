//! API Routes
//!
//! Builds the admin router and attaches the cache-aside layer to host routes.

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_handler, delete_key_handler, health_handler, invalidate_user_handler, stats_handler,
    sweep_handler, AppState,
};
use super::middleware::{cache_aside, CachedResponse};
use crate::cache::SharedCache;

/// Creates the admin router.
///
/// # Endpoints
/// - `GET /health` - Health check
/// - `GET /cache/stats` - Cache statistics
/// - `DELETE /cache` - Flush all entries, or `?pattern=` substring matches
/// - `DELETE /cache/keys/:key` - Delete one key
/// - `DELETE /cache/users/:user_id/sessions` - Drop every cached session of a user
/// - `POST /cache/sweep` - Run one sweep now
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/cache/stats", get(stats_handler))
        .route("/cache", delete(clear_handler))
        .route("/cache/keys/:key", delete(delete_key_handler))
        .route("/cache/users/:user_id/sessions", delete(invalidate_user_handler))
        .route("/cache/sweep", post(sweep_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Wraps read-only host routes with the cache-aside layer.
pub fn with_response_cache(routes: Router, cache: SharedCache<CachedResponse>) -> Router {
    routes.layer(from_fn_with_state(cache, cache_aside))
}
