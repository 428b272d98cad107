//! Request and Response models for the console API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::LivePositionRequest;
pub use responses::{
    CacheOverviewResponse, EntityListResponse, HealthResponse, InvalidateResponse,
    LiveAcceptedResponse, LogoutResponse, RefreshResponse, StatsResponse,
};
