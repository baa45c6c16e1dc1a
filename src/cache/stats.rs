//! Cache Statistics Module
//!
//! Tracks cache read outcomes, evictions, and write recovery.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Reads that returned an unexpired payload
    pub hits: u64,
    /// Reads that returned nothing (absent, expired, unreadable, or wrong shape)
    pub misses: u64,
    /// Stale-tolerant reads that returned an expired payload
    pub stale_hits: u64,
    /// Entries removed because they expired or could not be parsed
    pub evictions: u64,
    /// Writes that hit the storage quota and triggered an eviction sweep
    pub quota_recoveries: u64,
    /// Writes abandoned after a storage failure
    pub write_failures: u64,
    /// Current number of entries in the namespace
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the fresh hit rate.
    ///
    /// Returns hits / (hits + stale_hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.stale_hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_stale_hit(&mut self) {
        self.stale_hits += 1;
    }

    pub fn record_evictions(&mut self, count: usize) {
        self.evictions += count as u64;
    }

    pub fn record_quota_recovery(&mut self) {
        self.quota_recoveries += 1;
    }

    pub fn record_write_failure(&mut self) {
        self.write_failures += 1;
    }

    // == Update Entry Count ==
    /// Updates the total entries count.
    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
