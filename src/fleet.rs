//! Fleet Cache Facade
//!
//! Wires one session's context into the refresh orchestrator and the live
//! reconciler and exposes the consumer-facing operations.

use std::sync::Arc;

use crate::cache::{
    CacheContext, CacheMetadata, EntityType, FreshnessReport, InvalidationGraph,
    RefreshOrchestrator, RefreshOutcome, RefreshStats,
};
use crate::clock::Clock;
use crate::config::Config;
use crate::fetch::Fetcher;
use crate::live::{DisplayRecord, LiveReconciler};

/// The entity type updated by the live position channel.
pub const LIVE_ENTITY_TYPE: EntityType = EntityType::Trucks;

#[derive(Clone)]
pub struct FleetCache {
    orchestrator: RefreshOrchestrator,
    reconciler: LiveReconciler,
}

impl FleetCache {
    /// Starts a session: every type idle, every table empty.
    pub fn init(config: &Config, fetcher: Arc<dyn Fetcher>, clock: Arc<dyn Clock>) -> Self {
        let ctx = CacheContext::init(clock);
        let orchestrator =
            RefreshOrchestrator::new(ctx.clone(), fetcher, config.ttls, InvalidationGraph::fleet());
        let reconciler = LiveReconciler::new(ctx, LIVE_ENTITY_TYPE, config.live_stale_threshold_ms);
        Self {
            orchestrator,
            reconciler,
        }
    }

    pub fn orchestrator(&self) -> &RefreshOrchestrator {
        &self.orchestrator
    }

    pub fn reconciler(&self) -> &LiveReconciler {
        &self.reconciler
    }

    // == Consumer Operations ==
    pub async fn check_and_maybe_refresh(&self, entity_type: EntityType) -> RefreshOutcome {
        self.orchestrator.check_and_maybe_refresh(entity_type).await
    }

    pub async fn invalidate(&self, entity_type: EntityType) -> Vec<EntityType> {
        self.orchestrator.invalidate(entity_type).await
    }

    pub async fn clear_all(&self) {
        self.orchestrator.clear_all().await
    }

    /// Logout: forget freshness and drop every table.
    pub async fn end_session(&self) {
        self.orchestrator.end_session().await
    }

    // == Reads ==
    pub async fn metadata(&self, entity_type: EntityType) -> CacheMetadata {
        self.orchestrator.metadata(entity_type).await
    }

    pub async fn report(&self, entity_type: EntityType) -> FreshnessReport {
        self.orchestrator.report(entity_type).await
    }

    pub async fn reports(&self) -> Vec<FreshnessReport> {
        self.orchestrator.reports().await
    }

    pub async fn records(&self, entity_type: EntityType) -> Vec<DisplayRecord> {
        self.reconciler.display_records(entity_type).await
    }

    pub async fn record(&self, entity_type: EntityType, id: &str) -> Option<DisplayRecord> {
        self.reconciler.display_record(entity_type, id).await
    }

    pub async fn stats(&self) -> RefreshStats {
        self.orchestrator.context().stats.read().await.clone()
    }
}
