//! API Handlers
//!
//! HTTP request handlers for the cache admin endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::CacheStore;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::fetch::CachedFetcher;
use crate::models::{
    EntryResponse, HealthResponse, InvalidateEventsRequest, InvalidateResponse, RemovedResponse,
    StatsResponse,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Fetcher wrapping the shared cache store
    pub fetcher: CachedFetcher,
}

impl AppState {
    /// Creates a new AppState over the given cache store, using the
    /// cache-first fetch policy.
    pub fn new(store: CacheStore) -> Self {
        Self {
            fetcher: CachedFetcher::new(Arc::new(store)),
        }
    }

    /// Creates a new AppState from configuration, opening the configured
    /// storage backend.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let store = config.build_store().await?;
        Ok(Self {
            fetcher: CachedFetcher::with_policy(Arc::new(store), config.fetch_policy),
        })
    }

    pub fn store(&self) -> &Arc<CacheStore> {
        self.fetcher.store()
    }
}

/// Handler for GET /cache/:key
///
/// Returns the stored entry, expired or not, without evicting it.
pub async fn get_entry_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<EntryResponse>> {
    let entry = state
        .store()
        .peek(&key)
        .await
        .ok_or_else(|| CacheError::NotFound(key.clone()))?;

    Ok(Json(EntryResponse::new(key, entry)))
}

/// Handler for DELETE /cache/:key
pub async fn invalidate_key_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<InvalidateResponse> {
    state.fetcher.invalidate_cache(&key).await;
    Json(InvalidateResponse::new(vec![key]))
}

/// Handler for POST /cache/events/invalidate
pub async fn invalidate_events_handler(
    State(state): State<AppState>,
    Json(req): Json<InvalidateEventsRequest>,
) -> Result<Json<InvalidateResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let cleared = state
        .fetcher
        .invalidate_event_caches(req.event_id.as_deref())
        .await;

    Ok(Json(InvalidateResponse::new(
        cleared.into_iter().map(String::from).collect(),
    )))
}

/// Handler for DELETE /cache
pub async fn clear_all_handler(State(state): State<AppState>) -> Json<RemovedResponse> {
    Json(RemovedResponse::new(state.store().clear_all().await))
}

/// Handler for POST /cache/evict
pub async fn evict_handler(State(state): State<AppState>) -> Json<RemovedResponse> {
    Json(RemovedResponse::new(state.store().evict_expired().await))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.store().stats().await))
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.store().is_available()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_entry_handler() {
        let state = AppState::new(CacheStore::in_memory());
        state.store().set("stats", &serde_json::json!({"events": 3}), None).await;

        let response = get_entry_handler(State(state), Path("stats".to_string()))
            .await
            .unwrap();

        assert!(response.fresh);
        assert_eq!(response.data["events"], 3);
    }

    #[tokio::test]
    async fn test_get_entry_missing() {
        let state = AppState::new(CacheStore::in_memory());

        let result = get_entry_handler(State(state), Path("missing".to_string())).await;
        assert!(matches!(result, Err(CacheError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_invalidate_key_handler() {
        let state = AppState::new(CacheStore::in_memory());
        state.store().set("user_1", &"alice", None).await;

        let response = invalidate_key_handler(State(state.clone()), Path("user_1".to_string())).await;

        assert_eq!(response.cleared, vec!["user_1".to_string()]);
        assert!(!state.store().is_valid("user_1").await);
    }

    #[tokio::test]
    async fn test_invalidate_events_rejects_blank_id() {
        let state = AppState::new(CacheStore::in_memory());
        let req = InvalidateEventsRequest {
            event_id: Some(String::new()),
        };

        let result = invalidate_events_handler(State(state), Json(req)).await;
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_evict_and_clear_handlers() {
        let state = AppState::new(CacheStore::in_memory());
        state.store().set("a", &1, None).await;

        let evicted = evict_handler(State(state.clone())).await;
        assert_eq!(evicted.removed, 0);

        let cleared = clear_all_handler(State(state.clone())).await;
        assert_eq!(cleared.removed, 1);
    }

    #[tokio::test]
    async fn test_health_handler_reports_storage() {
        let state = AppState::new(CacheStore::unavailable("x_", std::time::Duration::from_secs(1)));

        let response = health_handler(State(state)).await;
        assert_eq!(response.status, "healthy");
        assert!(!response.storage_available);
    }
}
