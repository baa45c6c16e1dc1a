//! Cache key constructors and TTL classes.
//!
//! Every cache key used by callers comes from `CacheKey`, so two lookups for
//! the same entity and filter always land on the same record.
//!
//! Ids are escaped before they are appended (`%` to `%25`, `_` to `%5F`),
//! so an id can never reach into another entity's key space. Ids without
//! those characters appear verbatim.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

// == Event Status ==
/// Status filter applied to event list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Running,
    Upcoming,
    Completed,
}

impl EventStatus {
    /// Every status filter, in display order.
    pub const ALL: [EventStatus; 3] = [
        EventStatus::Running,
        EventStatus::Upcoming,
        EventStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Running => "running",
            EventStatus::Upcoming => "upcoming",
            EventStatus::Completed => "completed",
        }
    }
}

impl FromStr for EventStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(EventStatus::Running),
            "upcoming" => Ok(EventStatus::Upcoming),
            "completed" => Ok(EventStatus::Completed),
            other => Err(format!("Unknown event status: {}", other)),
        }
    }
}

/// Escapes the separator so `event("prizes_1")` and `event_prizes("1")`
/// stay distinct.
fn escape_id(id: &str) -> Cow<'_, str> {
    if id.contains(['_', '%']) {
        Cow::Owned(id.replace('%', "%25").replace('_', "%5F"))
    } else {
        Cow::Borrowed(id)
    }
}

// == Cache Key ==
/// A logical cache key, without the storage namespace prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Event list, optionally filtered by status. No filter maps to `events_all`.
    pub fn events(status: Option<EventStatus>) -> Self {
        let filter = status.map(|s| s.as_str()).unwrap_or("all");
        Self(format!("events_{}", filter))
    }

    pub fn event(id: &str) -> Self {
        Self(format!("event_{}", escape_id(id)))
    }

    pub fn event_prizes(event_id: &str) -> Self {
        Self(format!("event_prizes_{}", escape_id(event_id)))
    }

    pub fn event_participants(event_id: &str) -> Self {
        Self(format!("event_participants_{}", escape_id(event_id)))
    }

    pub fn user(user_id: &str) -> Self {
        Self(format!("user_{}", escape_id(user_id)))
    }

    pub fn user_events(user_id: &str) -> Self {
        Self(format!("user_events_{}", escape_id(user_id)))
    }

    /// Aggregate site statistics.
    pub fn stats() -> Self {
        Self("stats".to_string())
    }

    /// Events featured in the landing page hero.
    pub fn hero_events() -> Self {
        Self("hero_events".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<CacheKey> for String {
    fn from(key: CacheKey) -> Self {
        key.0
    }
}

// == Cache TTL ==
/// Named TTL classes, chosen per resource by how often it changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheTtl {
    /// 1 minute
    Short,
    /// 5 minutes
    #[default]
    Medium,
    /// 15 minutes
    Long,
    /// 30 minutes
    VeryLong,
}

impl CacheTtl {
    pub const fn as_duration(self) -> Duration {
        match self {
            CacheTtl::Short => Duration::from_secs(60),
            CacheTtl::Medium => Duration::from_secs(5 * 60),
            CacheTtl::Long => Duration::from_secs(15 * 60),
            CacheTtl::VeryLong => Duration::from_secs(30 * 60),
        }
    }
}

impl From<CacheTtl> for Duration {
    fn from(ttl: CacheTtl) -> Self {
        ttl.as_duration()
    }
}
