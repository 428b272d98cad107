//! Live position events pushed for individual trucks.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One position observation for one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LivePositionEvent {
    pub entity_id: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,
    /// Unix milliseconds
    pub observed_at: u64,
}

impl LivePositionEvent {
    pub fn new(entity_id: impl Into<String>, latitude: f64, longitude: f64, observed_at: u64) -> Self {
        Self {
            entity_id: entity_id.into(),
            latitude,
            longitude,
            speed: None,
            heading: None,
            observed_at,
        }
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn with_heading(mut self, heading: f64) -> Self {
        self.heading = Some(heading);
        self
    }

    /// Record fields this event overwrites. Absent speed or heading leave
    /// the record's existing values in place.
    pub fn to_patch(&self) -> Map<String, Value> {
        let mut patch = Map::new();
        patch.insert("lat".to_string(), Value::from(self.latitude));
        patch.insert("lng".to_string(), Value::from(self.longitude));
        if let Some(speed) = self.speed {
            patch.insert("speed".to_string(), Value::from(speed));
        }
        if let Some(heading) = self.heading {
            patch.insert("heading".to_string(), Value::from(heading));
        }
        patch
    }

    /// Rejects coordinates no GPS fix can produce.
    pub fn validate(&self) -> Option<String> {
        if self.entity_id.is_empty() {
            return Some("entity_id cannot be empty".to_string());
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Some(format!("latitude {} out of range", self.latitude));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Some(format!("longitude {} out of range", self.longitude));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_patch_skips_absent_optionals() {
        let patch = LivePositionEvent::new("T-1", 48.1, 11.5, 100).to_patch();
        assert_eq!(patch.len(), 2);
        assert_eq!(patch["lat"], json!(48.1));
        assert_eq!(patch["lng"], json!(11.5));
    }

    #[test]
    fn test_patch_includes_speed_and_heading() {
        let patch = LivePositionEvent::new("T-1", 0.0, 0.0, 100)
            .with_speed(72.0)
            .with_heading(180.0)
            .to_patch();
        assert_eq!(patch["speed"], json!(72.0));
        assert_eq!(patch["heading"], json!(180.0));
    }

    #[test]
    fn test_deserialize_without_optionals() {
        let event: LivePositionEvent = serde_json::from_str(
            r#"{"entity_id":"T-9","latitude":1.0,"longitude":2.0,"observed_at":5}"#,
        )
        .unwrap();
        assert_eq!(event, LivePositionEvent::new("T-9", 1.0, 2.0, 5));
    }

    #[test]
    fn test_validate() {
        assert!(LivePositionEvent::new("T-1", 10.0, 10.0, 1).validate().is_none());
        assert!(LivePositionEvent::new("", 10.0, 10.0, 1).validate().is_some());
        assert!(LivePositionEvent::new("T-1", 91.0, 10.0, 1).validate().is_some());
        assert!(LivePositionEvent::new("T-1", 10.0, -181.0, 1).validate().is_some());
    }
}
