//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde_json::Value;

// == Cache Entry ==
/// A single cached upstream payload.
///
/// Entries are created on a cache miss after a successful fetch and are only
/// ever replaced whole; there are no partial updates.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The cached JSON payload, opaque to the store
    pub payload: Value,
    /// Fetch timestamp (Unix milliseconds)
    pub fetched_at: u64,
    /// Time-to-live assigned from the owning category
    pub ttl: Duration,
}

impl CacheEntry {
    /// Creates a new entry stamped with the current time.
    pub fn new(payload: Value, ttl: Duration) -> Self {
        Self {
            payload,
            fetched_at: current_timestamp_ms(),
            ttl,
        }
    }

    /// Checks whether the entry's TTL has elapsed.
    ///
    /// An entry is valid iff `now - fetched_at < ttl`; at the boundary it is
    /// expired and must never be returned to callers.
    pub fn is_expired(&self) -> bool {
        let elapsed = current_timestamp_ms().saturating_sub(self.fetched_at);
        elapsed >= self.ttl.as_millis() as u64
    }

    /// Age of the entry in whole seconds.
    pub fn age_secs(&self) -> u64 {
        current_timestamp_ms().saturating_sub(self.fetched_at) / 1000
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
