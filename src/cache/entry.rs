//! Cache Entry Module
//!
//! Defines the stored record framing with absolute expiry.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// == Cache Entry ==
/// A single stored record: payload plus creation and expiry stamps.
///
/// Serialized as `{"data": ..., "createdAt": ..., "expiresAt": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry<T> {
    /// The cached payload
    pub data: T,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: i64,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates an entry stamped now that expires after `ttl`.
    pub fn new(data: T, ttl: Duration) -> Self {
        Self::new_at(data, ttl, current_timestamp_ms())
    }

    /// Creates an entry stamped at `now` that expires after `ttl`.
    pub fn new_at(data: T, ttl: Duration, now: i64) -> Self {
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);

        Self {
            data,
            created_at: now,
            expires_at: now.saturating_add(ttl_ms),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// The entry stays fresh up to and including `expires_at`.
    pub fn is_expired_at(&self, now: i64) -> bool {
        now > self.expires_at
    }

    /// Checks if the entry has expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_ms())
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds, 0 once expired.
    pub fn ttl_remaining_ms(&self) -> u64 {
        let remaining = self.expires_at - current_timestamp_ms();
        u64::try_from(remaining).unwrap_or(0)
    }
}

// == Entry Header ==
/// Expiry-only view of a stored record, used when sweeping without caring
/// about payload shape.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EntryHeader {
    pub expires_at: i64,
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new_at("value", Duration::from_secs(60), 1_000);

        assert_eq!(entry.data, "value");
        assert_eq!(entry.created_at, 1_000);
        assert_eq!(entry.expires_at, 61_000);
        assert!(entry.expires_at >= entry.created_at);
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = CacheEntry::new_at(1, Duration::from_millis(100), 0);

        assert!(!entry.is_expired_at(0));
        assert!(!entry.is_expired_at(100), "Entry is still fresh at expires_at");
        assert!(entry.is_expired_at(101));
    }

    #[test]
    fn test_zero_ttl_expires_immediately_after_creation() {
        let entry = CacheEntry::new_at((), Duration::ZERO, 500);
        assert_eq!(entry.expires_at, entry.created_at);
        assert!(entry.is_expired_at(501));
    }

    #[test]
    fn test_fresh_entry_not_expired() {
        let entry = CacheEntry::new("value", Duration::from_secs(60));
        assert!(!entry.is_expired());

        let remaining = entry.ttl_remaining_ms();
        assert!(remaining <= 60_000);
        assert!(remaining >= 59_000);
    }

    #[test]
    fn test_ttl_remaining_expired() {
        let entry = CacheEntry {
            data: (),
            created_at: 0,
            expires_at: 1,
        };
        assert_eq!(entry.ttl_remaining_ms(), 0);
    }

    #[test]
    fn test_serialized_shape() {
        let entry = CacheEntry::new_at(vec![json!({"id": 1})], Duration::from_millis(1000), 42);
        let value = serde_json::to_value(&entry).unwrap();

        assert_eq!(
            value,
            json!({"data": [{"id": 1}], "createdAt": 42, "expiresAt": 1042})
        );
    }

    #[test]
    fn test_header_ignores_payload() {
        let header: EntryHeader =
            serde_json::from_str(r#"{"data":{"deep":[1,2]},"createdAt":1,"expiresAt":9}"#).unwrap();
        assert_eq!(header.expires_at, 9);
    }
}
