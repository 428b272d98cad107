//! Cache Module
//!
//! Per-entity-type freshness tracking, the entity tables, and the refresh
//! orchestration that keeps them current.

mod context;
mod entity;
pub mod freshness;
mod invalidation;
mod metadata;
mod orchestrator;
mod stats;
mod store;


// Re-export public types
pub use context::CacheContext;
pub use entity::{EntityRecord, EntityType};
pub use invalidation::{InvalidationGraph, InvalidationRule};
pub use metadata::{CacheMetadata, CacheStatus, MetadataRegistry};
pub use orchestrator::{FreshnessReport, RefreshOrchestrator, RefreshOutcome};
pub use stats::RefreshStats;
pub use store::{EntityStore, EntityTable, PatchOutcome};
