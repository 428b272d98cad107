//! Response DTOs for the console API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{EntityType, FreshnessReport, RefreshOutcome, RefreshStats};
use crate::live::DisplayRecord;

/// Response body for GET /cache
#[derive(Debug, Clone, Serialize)]
pub struct CacheOverviewResponse {
    pub entity_types: Vec<FreshnessReport>,
}

/// Response body for POST /cache/:entity_type/refresh
#[derive(Debug, Clone, Serialize)]
pub struct RefreshResponse {
    pub entity_type: EntityType,
    #[serde(flatten)]
    pub outcome: RefreshOutcome,
    /// Freshness after the attempt
    pub cache: FreshnessReport,
}

/// Response body for POST /cache/:entity_type/invalidate
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    pub entity_type: EntityType,
    /// Every type marked stale, the requested one first
    pub invalidated: Vec<EntityType>,
}

/// Response body for GET /entities/:entity_type
#[derive(Debug, Clone, Serialize)]
pub struct EntityListResponse {
    pub entity_type: EntityType,
    /// Freshness of the list as a whole; `error` status still carries records
    pub cache: FreshnessReport,
    pub records: Vec<DisplayRecord>,
}

/// Response body for POST /live/positions
#[derive(Debug, Clone, Serialize)]
pub struct LiveAcceptedResponse {
    pub message: String,
    pub entity_id: String,
}

impl LiveAcceptedResponse {
    pub fn new(entity_id: impl Into<String>) -> Self {
        let entity_id = entity_id.into();
        Self {
            message: format!("Position for '{}' accepted", entity_id),
            entity_id,
        }
    }
}

/// Response body for POST /session/logout
#[derive(Debug, Clone, Serialize)]
pub struct LogoutResponse {
    pub message: String,
}

impl LogoutResponse {
    pub fn new() -> Self {
        Self {
            message: "Session cleared".to_string(),
        }
    }
}

impl Default for LogoutResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// Response body for GET /stats
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub counters: RefreshStats,
    /// fetches_failed / fetches_issued
    pub failure_rate: f64,
    pub live_connected: bool,
}

impl StatsResponse {
    pub fn new(counters: RefreshStats, live_connected: bool) -> Self {
        Self {
            failure_rate: counters.failure_rate(),
            counters,
            live_connected,
        }
    }
}

/// Response body for GET /health
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_live_accepted_response_serialize() {
        let resp = LiveAcceptedResponse::new("T-9");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("T-9"));
        assert!(json.contains("accepted"));
    }

    #[test]
    fn test_stats_response_flattens_counters() {
        let mut counters = RefreshStats::new();
        counters.record_issued();
        counters.record_failure();

        let json = serde_json::to_value(StatsResponse::new(counters, true)).unwrap();
        assert_eq!(json["fetches_issued"], 1);
        assert_eq!(json["failure_rate"], 1.0);
        assert_eq!(json["live_connected"], true);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}
