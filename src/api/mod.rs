//! API Module
//!
//! HTTP handlers and routing for the fleet console API.
//!
//! # Endpoints
//! - `GET /cache`, `GET /cache/:entity_type` - Freshness reports
//! - `POST /cache/:entity_type/refresh` - Refresh if due
//! - `POST /cache/:entity_type/invalidate` - Invalidate with cascade
//! - `POST /session/logout` - End the session
//! - `GET /entities/:entity_type[/:id]` - Cached records
//! - `POST /live/positions` - Live position ingest
//! - `GET /stats` - Counters
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
