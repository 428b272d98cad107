//! Error types for the fleet cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Fleet Error Enum ==
/// Errors surfaced to consumers of the fleet cache.
///
/// Pull failures are not in here: they are recorded into the cache metadata
/// and never propagated to refresh callers.
#[derive(Error, Debug)]
pub enum FleetError {
    /// Entity type name not recognised
    #[error("Unknown entity type: {0}")]
    UnknownEntityType(String),

    /// No record with that id in the table
    #[error("Entity not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Live channel is currently disconnected
    #[error("Live channel unavailable: {0}")]
    LiveChannelUnavailable(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for FleetError {
    fn into_response(self) -> Response {
        let status = match &self {
            FleetError::UnknownEntityType(_) => StatusCode::BAD_REQUEST,
            FleetError::NotFound(_) => StatusCode::NOT_FOUND,
            FleetError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            FleetError::LiveChannelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the fleet cache.
pub type Result<T> = std::result::Result<T, FleetError>;
