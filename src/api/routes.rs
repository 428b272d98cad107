//! API Routes
//!
//! Configures the Axum router with all console endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_overview_handler, cache_report_handler, get_entity_handler, health_handler,
    invalidate_handler, list_entities_handler, live_position_handler, logout_handler,
    refresh_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /cache` - Freshness of every entity type
/// - `GET /cache/:entity_type` - Freshness of one entity type
/// - `POST /cache/:entity_type/refresh` - Refresh if due
/// - `POST /cache/:entity_type/invalidate` - Invalidate after a mutation
/// - `POST /session/logout` - Forget metadata and tables
/// - `GET /entities/:entity_type` - Cached records with display flags
/// - `GET /entities/:entity_type/:id` - One cached record
/// - `POST /live/positions` - Push a live position event
/// - `GET /stats` - Refresh and live counters
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/cache", get(cache_overview_handler))
        .route("/cache/:entity_type", get(cache_report_handler))
        .route("/cache/:entity_type/refresh", post(refresh_handler))
        .route("/cache/:entity_type/invalidate", post(invalidate_handler))
        .route("/session/logout", post(logout_handler))
        .route("/entities/:entity_type", get(list_entities_handler))
        .route("/entities/:entity_type/:id", get(get_entity_handler))
        .route("/live/positions", post(live_position_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
