//! Fleet Cache - data freshness for a fleet-tracking client
//!
//! Tracks per-entity-type cache freshness for trucks, drivers, groups and
//! stats, refreshes them from the fleet service without duplicate in-flight
//! fetches, and merges live truck positions into the same tables.

pub mod api;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod fetch;
pub mod fleet;
pub mod live;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use fleet::FleetCache;
pub use tasks::{spawn_live_task, spawn_refresh_task};
