//! Background Tasks Module
//!
//! Long-running tasks that keep the fleet view current.
//!
//! # Tasks
//! - Refresh: polls every entity type's freshness at a fixed interval
//! - Live: holds the live position connection open and applies its events

mod live;
mod refresh;

pub use live::spawn_live_task;
pub use refresh::spawn_refresh_task;
