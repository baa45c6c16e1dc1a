//! Response DTOs for the cache admin API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{CacheEntry, CacheStats};

/// Response body for GET /cache/:key
#[derive(Debug, Clone, Serialize)]
pub struct EntryResponse {
    /// The requested logical key
    pub key: String,
    /// The cached payload
    pub data: serde_json::Value,
    /// Whether the entry is still within its TTL
    pub fresh: bool,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: i64,
}

impl EntryResponse {
    pub fn new(key: impl Into<String>, entry: CacheEntry<serde_json::Value>) -> Self {
        let fresh = !entry.is_expired();
        Self {
            key: key.into(),
            data: entry.data,
            fresh,
            created_at: entry.created_at,
            expires_at: entry.expires_at,
        }
    }
}

/// Response body for DELETE /cache/:key and POST /cache/events/invalidate
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    /// Success message
    pub message: String,
    /// Logical keys that were cleared
    pub cleared: Vec<String>,
}

impl InvalidateResponse {
    pub fn new(cleared: Vec<String>) -> Self {
        Self {
            message: format!("Invalidated {} cache keys", cleared.len()),
            cleared,
        }
    }
}

/// Response body for DELETE /cache and POST /cache/evict
#[derive(Debug, Clone, Serialize)]
pub struct RemovedResponse {
    /// Number of records removed
    pub removed: usize,
}

impl RemovedResponse {
    pub fn new(removed: usize) -> Self {
        Self { removed }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: CacheStats,
    /// Fresh hit rate
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        let hit_rate = stats.hit_rate();
        Self { stats, hit_rate }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Whether the cache has durable storage behind it
    pub storage_available: bool,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(storage_available: bool) -> Self {
        Self {
            status: "healthy".to_string(),
            storage_available,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
