//! Error types for the caching layer
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Storage Error Enum ==
/// Failures reported by a storage backend.
///
/// These never escape `CacheStore`; the store logs them and degrades to
/// cache-miss behavior.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Write rejected because the backend quota would be exceeded
    #[error("Storage quota exceeded: {used} of {quota} bytes in use")]
    QuotaExceeded { used: usize, quota: usize },

    /// No durable store is available in this execution context
    #[error("Storage unavailable")]
    Unavailable,

    /// Backend I/O failure
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted backend state could not be decoded
    #[error("Corrupt storage file: {0}")]
    Corrupt(#[from] serde_json::Error),
}

// == Cache Error Enum ==
/// Unified error type for the admin surface and fallible constructors.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not found in cache
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Storage backend could not be opened
    #[error(transparent)]
    Storage(#[from] StorageError),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::Storage(StorageError::Unavailable) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the caching layer.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let response = CacheError::NotFound("events_all".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_unavailable_storage_maps_to_503() {
        let response = CacheError::from(StorageError::Unavailable).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_quota_message() {
        let err = StorageError::QuotaExceeded {
            used: 10,
            quota: 8,
        };
        assert!(err.to_string().contains("10 of 8 bytes"));
    }
}
