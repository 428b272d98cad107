//! API Handlers
//!
//! HTTP request handlers for each console endpoint.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::{EntityType, FreshnessReport};
use crate::error::{FleetError, Result};
use crate::fleet::FleetCache;
use crate::live::{DisplayRecord, IngestHub};
use crate::models::{
    CacheOverviewResponse, EntityListResponse, HealthResponse, InvalidateResponse,
    LiveAcceptedResponse, LivePositionRequest, LogoutResponse, RefreshResponse, StatsResponse,
};

/// Application state shared across all handlers.
///
/// Both members are cheap handles onto shared state.
#[derive(Clone)]
pub struct AppState {
    /// The current session's fleet cache
    pub fleet: FleetCache,
    /// Live position ingest, feeding the live channel task
    pub live: IngestHub,
}

impl AppState {
    pub fn new(fleet: FleetCache, live: IngestHub) -> Self {
        Self { fleet, live }
    }
}

fn parse_entity_type(raw: &str) -> Result<EntityType> {
    raw.parse()
}

/// Handler for GET /cache
///
/// Freshness of every entity type.
pub async fn cache_overview_handler(State(state): State<AppState>) -> Json<CacheOverviewResponse> {
    Json(CacheOverviewResponse {
        entity_types: state.fleet.reports().await,
    })
}

/// Handler for GET /cache/:entity_type
pub async fn cache_report_handler(
    State(state): State<AppState>,
    Path(entity_type): Path<String>,
) -> Result<Json<FreshnessReport>> {
    let entity_type = parse_entity_type(&entity_type)?;
    Ok(Json(state.fleet.report(entity_type).await))
}

/// Handler for POST /cache/:entity_type/refresh
///
/// Always succeeds for a known type; a failed pull is reported in the body.
pub async fn refresh_handler(
    State(state): State<AppState>,
    Path(entity_type): Path<String>,
) -> Result<Json<RefreshResponse>> {
    let entity_type = parse_entity_type(&entity_type)?;
    let outcome = state.fleet.check_and_maybe_refresh(entity_type).await;

    Ok(Json(RefreshResponse {
        entity_type,
        outcome,
        cache: state.fleet.report(entity_type).await,
    }))
}

/// Handler for POST /cache/:entity_type/invalidate
///
/// Called after a mutation on that entity type.
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Path(entity_type): Path<String>,
) -> Result<Json<InvalidateResponse>> {
    let entity_type = parse_entity_type(&entity_type)?;
    let invalidated = state.fleet.invalidate(entity_type).await;

    Ok(Json(InvalidateResponse {
        entity_type,
        invalidated,
    }))
}

/// Handler for POST /session/logout
pub async fn logout_handler(State(state): State<AppState>) -> Json<LogoutResponse> {
    state.fleet.end_session().await;
    Json(LogoutResponse::new())
}

/// Handler for GET /entities/:entity_type
///
/// Always the last good table, whatever the cache status.
pub async fn list_entities_handler(
    State(state): State<AppState>,
    Path(entity_type): Path<String>,
) -> Result<Json<EntityListResponse>> {
    let entity_type = parse_entity_type(&entity_type)?;

    Ok(Json(EntityListResponse {
        entity_type,
        cache: state.fleet.report(entity_type).await,
        records: state.fleet.records(entity_type).await,
    }))
}

/// Handler for GET /entities/:entity_type/:id
pub async fn get_entity_handler(
    State(state): State<AppState>,
    Path((entity_type, id)): Path<(String, String)>,
) -> Result<Json<DisplayRecord>> {
    let entity_type = parse_entity_type(&entity_type)?;

    state
        .fleet
        .record(entity_type, &id)
        .await
        .map(Json)
        .ok_or_else(|| FleetError::NotFound(format!("{} {}", entity_type, id)))
}

/// Handler for POST /live/positions
///
/// Hands the event to the live connection; it is applied asynchronously.
pub async fn live_position_handler(
    State(state): State<AppState>,
    Json(req): Json<LivePositionRequest>,
) -> Result<Json<LiveAcceptedResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(FleetError::InvalidRequest(error_msg));
    }

    let event = req.to_event();
    let entity_id = event.entity_id.clone();
    state.live.publish(event).await?;

    Ok(Json(LiveAcceptedResponse::new(entity_id)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let counters = state.fleet.stats().await;
    Json(StatsResponse::new(counters, state.live.is_connected().await))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheStatus, EntityRecord, RefreshOutcome};
    use crate::clock::ManualClock;
    use crate::config::Config;
    use crate::fetch::{FetchError, Fetcher};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct StaticFetcher;

    #[async_trait]
    impl Fetcher for StaticFetcher {
        async fn fetch(&self, _: EntityType) -> std::result::Result<Vec<EntityRecord>, FetchError> {
            Ok(vec![EntityRecord::new("T-1").with_field("lat", 1.0)])
        }
    }

    fn test_state() -> AppState {
        let fleet = FleetCache::init(
            &Config::default(),
            Arc::new(StaticFetcher),
            Arc::new(ManualClock::new(1_000_000)),
        );
        AppState::new(fleet, IngestHub::new())
    }

    #[tokio::test]
    async fn test_refresh_then_list() {
        let state = test_state();

        let response = refresh_handler(State(state.clone()), Path("trucks".to_string()))
            .await
            .unwrap();
        assert_eq!(response.outcome, RefreshOutcome::Refreshed { records: 1 });
        assert_eq!(response.cache.status, CacheStatus::Fresh);

        let list = list_entities_handler(State(state), Path("TRUCKS".to_string()))
            .await
            .unwrap();
        assert_eq!(list.records.len(), 1);
        assert_eq!(list.records[0].record.id, "T-1");
    }

    #[tokio::test]
    async fn test_unknown_entity_type() {
        let state = test_state();
        let result = cache_report_handler(State(state), Path("trips".to_string())).await;
        assert!(matches!(result, Err(FleetError::UnknownEntityType(_))));
    }

    #[tokio::test]
    async fn test_get_missing_entity() {
        let state = test_state();
        let result = get_entity_handler(
            State(state),
            Path(("trucks".to_string(), "T-404".to_string())),
        )
        .await;
        assert!(matches!(result, Err(FleetError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_invalidate_handler_reports_cascade() {
        let state = test_state();
        let response = invalidate_handler(State(state), Path("trucks".to_string()))
            .await
            .unwrap();
        assert_eq!(
            response.invalidated,
            vec![EntityType::Trucks, EntityType::Groups]
        );
    }

    #[tokio::test]
    async fn test_live_position_without_connection() {
        let state = test_state();
        let req = LivePositionRequest {
            entity_id: "T-1".to_string(),
            latitude: 1.0,
            longitude: 1.0,
            speed: None,
            heading: None,
            observed_at: 1,
        };
        let result = live_position_handler(State(state), Json(req)).await;
        assert!(matches!(result, Err(FleetError::LiveChannelUnavailable(_))));
    }

    #[tokio::test]
    async fn test_logout_clears_tables() {
        let state = test_state();
        refresh_handler(State(state.clone()), Path("trucks".to_string()))
            .await
            .unwrap();

        logout_handler(State(state.clone())).await;

        assert!(state.fleet.records(EntityType::Trucks).await.is_empty());
        assert_eq!(
            state.fleet.metadata(EntityType::Trucks).await.status,
            CacheStatus::Idle
        );
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
