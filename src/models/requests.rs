//! Request DTOs for the cache admin API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Request body for POST /cache/events/invalidate
///
/// # Fields
/// - `event_id`: Optional event whose detail, prizes, and participants
///   entries are cleared along with the shared event lists
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvalidateEventsRequest {
    #[serde(default)]
    pub event_id: Option<String>,
}

impl InvalidateEventsRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        match self.event_id.as_deref() {
            Some(id) if id.trim().is_empty() => Some("Event id cannot be empty".to_string()),
            _ => None,
        }
    }
}
