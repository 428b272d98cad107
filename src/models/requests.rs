//! Request DTOs for the console API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::live::LivePositionEvent;

/// Request body for POST /live/positions
///
/// # Fields
/// - `entity_id`: Truck id the position belongs to
/// - `latitude`, `longitude`: Position in degrees
/// - `speed`, `heading`: Optional motion data
/// - `observed_at`: Observation instant in Unix milliseconds
#[derive(Debug, Clone, Deserialize)]
pub struct LivePositionRequest {
    pub entity_id: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub speed: Option<f64>,
    #[serde(default)]
    pub heading: Option<f64>,
    pub observed_at: u64,
}

impl LivePositionRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        self.to_event().validate()
    }

    pub fn to_event(&self) -> LivePositionEvent {
        LivePositionEvent {
            entity_id: self.entity_id.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            speed: self.speed,
            heading: self.heading,
            observed_at: self.observed_at,
        }
    }
}
