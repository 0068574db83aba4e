//! API Handlers
//!
//! HTTP request handlers for the cache admin endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::api::middleware::CachedResponse;
use crate::cache::{shared, CacheStore, SharedCache};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    validate_user_id, ClearQuery, ClearResponse, DeleteResponse, HealthResponse,
    InvalidateResponse, StatsResponse, SweepResponse,
};

/// Application state shared across all handlers.
///
/// Holds the response cache behind the single lock it shares with the sweeper.
#[derive(Clone)]
pub struct AppState {
    pub cache: SharedCache<CachedResponse>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates a new AppState around an existing store.
    pub fn new(cache: CacheStore<CachedResponse>, config: Config) -> Self {
        Self {
            cache: shared(cache),
            config: Arc::new(config),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(CacheStore::from_config(config), config.clone())
    }
}

/// Handler for GET /cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache.read().await;
    Json(StatsResponse::new(cache.stats(), cache.max_entries()))
}

/// Handler for DELETE /cache
///
/// Flushes everything, or only keys containing `?pattern=`.
pub async fn clear_handler(
    State(state): State<AppState>,
    Query(query): Query<ClearQuery>,
) -> Result<Json<ClearResponse>> {
    if let Some(error_msg) = query.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let removed = state.cache.write().await.clear(query.pattern.as_deref());
    tracing::info!(pattern = ?query.pattern, removed, "cache cleared");

    Ok(Json(ClearResponse {
        pattern: query.pattern,
        removed,
    }))
}

/// Handler for DELETE /cache/keys/:key
///
/// Succeeds whether or not the key was present.
pub async fn delete_key_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<DeleteResponse> {
    let deleted = state.cache.write().await.delete(&key);
    Json(DeleteResponse::new(key, deleted))
}

/// Handler for DELETE /cache/users/:user_id/sessions
///
/// Drops every cached session of the user across all devices.
pub async fn invalidate_user_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<InvalidateResponse>> {
    if let Some(error_msg) = validate_user_id(&user_id) {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let removed = state
        .cache
        .write()
        .await
        .invalidate_all_sessions_for_user(&user_id);

    Ok(Json(InvalidateResponse { user_id, removed }))
}

/// Handler for POST /cache/sweep
///
/// Runs one sweep immediately, outside the sweeper's schedule.
pub async fn sweep_handler(State(state): State<AppState>) -> Json<SweepResponse> {
    let report = state.cache.write().await.sweep();
    Json(SweepResponse::new(report))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
