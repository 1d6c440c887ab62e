//! Response DTOs for the proxy API
//!
//! Defines the structure of outgoing HTTP response bodies that the proxy
//! itself produces; proxied upstream payloads pass through untouched.

use serde::Serialize;

use crate::cache::{CacheStats, CategoryStatus};

/// Response body for the health endpoint (GET /api/health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Response body for cache introspection (GET /api/cache/status)
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatusResponse {
    /// Per-category population and age report
    pub categories: Vec<CategoryStatus>,
    /// Lookup counters across all categories
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub hit_rate: f64,
}

impl CacheStatusResponse {
    pub fn new(categories: Vec<CategoryStatus>, stats: CacheStats) -> Self {
        Self {
            categories,
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for cache invalidation (POST /api/cache/clear[/:type])
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    /// Confirmation message naming what was cleared
    pub message: String,
    /// Number of entries removed
    pub cleared: usize,
}

impl ClearResponse {
    pub fn new(target: &str, cleared: usize) -> Self {
        Self {
            message: format!("Cache '{}' cleared", target),
            cleared,
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
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_cache_status_response_hit_rate() {
        let stats = CacheStats {
            hits: 80,
            misses: 20,
            evictions: 5,
        };
        let resp = CacheStatusResponse::new(Vec::new(), stats);
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
        assert_eq!(resp.evictions, 5);
    }

    #[test]
    fn test_clear_response_serialize() {
        let resp = ClearResponse::new("surahs", 3);
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("surahs"));
        assert!(json.contains("\"cleared\":3"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Something went wrong");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("error"));
        assert!(json.contains("Something went wrong"));
    }
}
