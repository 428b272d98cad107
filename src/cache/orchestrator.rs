//! Refresh Orchestrator
//!
//! Decides when an entity type is pulled, guarantees a single in-flight
//! fetch per type, and applies invalidation cascades.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::freshness;
use crate::cache::{
    CacheContext, CacheMetadata, CacheStatus, EntityRecord, EntityType, InvalidationGraph,
};
use crate::config::EntityTtls;
use crate::fetch::{FetchError, Fetcher};

// == Refresh Outcome ==
/// What a `check_and_maybe_refresh` call ended up doing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum RefreshOutcome {
    /// No fetch was due, or one was already in flight.
    Skipped,
    /// The table was replaced with `records` entries.
    Refreshed { records: usize },
    /// The fetch failed; cached data was kept.
    Failed { error: String },
    /// The session was cleared while the fetch was in flight.
    Discarded,
}

// == Freshness Report ==
/// Metadata of one type together with the decisions derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FreshnessReport {
    pub entity_type: EntityType,
    pub status: CacheStatus,
    pub last_updated: u64,
    pub error: Option<String>,
    pub ttl_ms: u64,
    pub is_fresh: bool,
    pub is_stale: bool,
    pub time_until_expiry_ms: u64,
}

// == Refresh Orchestrator ==
#[derive(Clone)]
pub struct RefreshOrchestrator {
    ctx: CacheContext,
    fetcher: Arc<dyn Fetcher>,
    ttls: EntityTtls,
    graph: Arc<InvalidationGraph>,
}

impl RefreshOrchestrator {
    pub fn new(
        ctx: CacheContext,
        fetcher: Arc<dyn Fetcher>,
        ttls: EntityTtls,
        graph: InvalidationGraph,
    ) -> Self {
        Self {
            ctx,
            fetcher,
            ttls,
            graph: Arc::new(graph),
        }
    }

    pub fn context(&self) -> &CacheContext {
        &self.ctx
    }

    pub fn ttl_ms(&self, entity_type: EntityType) -> u64 {
        self.ttls.ttl_ms(entity_type)
    }

    // == Check And Maybe Refresh ==
    /// Pulls `entity_type` if, and only if, it is stale and not already loading.
    ///
    /// Never fails: a failed pull is recorded in the type's metadata and the
    /// previously cached table stays visible. The fetch runs on its own task,
    /// so dropping this future does not leave the type stuck in `loading`.
    pub async fn check_and_maybe_refresh(&self, entity_type: EntityType) -> RefreshOutcome {
        let Some(generation) = self.begin_refresh(entity_type).await else {
            debug!(entity_type = %entity_type, "Refresh not due");
            self.ctx.stats.write().await.record_skipped();
            return RefreshOutcome::Skipped;
        };

        self.ctx.stats.write().await.record_issued();
        info!(entity_type = %entity_type, "Refreshing from fleet service");

        let this = self.clone();
        let handle = tokio::spawn(async move {
            let result = this.fetcher.fetch(entity_type).await;
            this.complete_refresh(entity_type, generation, result).await
        });

        match handle.await {
            Ok(outcome) => outcome,
            Err(e) => {
                let error = FetchError::Aborted(e.to_string());
                self.complete_refresh(entity_type, generation, Err(error))
                    .await
            }
        }
    }

    /// Moves the type to `loading` if a refresh is due, returning the
    /// session generation the fetch belongs to.
    async fn begin_refresh(&self, entity_type: EntityType) -> Option<u64> {
        let ttl = self.ttls.ttl_ms(entity_type);
        let mut registry = self.ctx.registry.write().await;
        let generation = registry.generation();
        let now = self.ctx.now_ms();

        let meta = registry.get_mut(entity_type);
        if !freshness::should_refresh(meta, ttl, now) {
            return None;
        }

        meta.status = CacheStatus::Loading;
        meta.invalidated_while_loading = false;
        Some(generation)
    }

    async fn complete_refresh(
        &self,
        entity_type: EntityType,
        generation: u64,
        result: Result<Vec<EntityRecord>, FetchError>,
    ) -> RefreshOutcome {
        let outcome = {
            let mut registry = self.ctx.registry.write().await;
            if registry.generation() != generation {
                RefreshOutcome::Discarded
            } else {
                let now = self.ctx.now_ms();
                match result {
                    Ok(records) => {
                        let count = records.len();
                        self.ctx.store.write().await.replace_all(entity_type, records);

                        let meta = registry.get_mut(entity_type);
                        meta.last_updated = now;
                        meta.error = None;
                        meta.status = if meta.invalidated_while_loading {
                            CacheStatus::Stale
                        } else {
                            CacheStatus::Fresh
                        };
                        meta.invalidated_while_loading = false;
                        RefreshOutcome::Refreshed { records: count }
                    }
                    Err(e) => {
                        let meta = registry.get_mut(entity_type);
                        meta.status = CacheStatus::Error;
                        meta.error = Some(e.to_string());
                        meta.invalidated_while_loading = false;
                        RefreshOutcome::Failed {
                            error: e.to_string(),
                        }
                    }
                }
            }
        };

        let mut stats = self.ctx.stats.write().await;
        match &outcome {
            RefreshOutcome::Refreshed { records } => {
                stats.record_success();
                info!(entity_type = %entity_type, records, "Refresh complete");
            }
            RefreshOutcome::Failed { error } => {
                stats.record_failure();
                warn!(entity_type = %entity_type, %error, "Refresh failed, keeping cached data");
            }
            RefreshOutcome::Discarded => {
                stats.record_discarded();
                info!(entity_type = %entity_type, "Session cleared during refresh, result discarded");
            }
            RefreshOutcome::Skipped => {}
        }

        outcome
    }

    // == Invalidate ==
    /// Marks `entity_type` and everything it cascades to as stale.
    ///
    /// `last_updated` and the tables are left alone so cached data stays
    /// visible. A type that is mid-fetch keeps `loading` and lands on
    /// `stale` once that fetch succeeds. Returns the invalidated types.
    pub async fn invalidate(&self, entity_type: EntityType) -> Vec<EntityType> {
        let targets = self.graph.cascade(entity_type);
        {
            let mut registry = self.ctx.registry.write().await;
            for target in &targets {
                let meta = registry.get_mut(*target);
                if meta.status == CacheStatus::Loading {
                    meta.invalidated_while_loading = true;
                } else {
                    meta.status = CacheStatus::Stale;
                }
            }
        }

        self.ctx.stats.write().await.record_invalidation();
        info!(entity_type = %entity_type, cascade = ?targets, "Cache invalidated");
        targets
    }

    // == Clear All ==
    /// Resets every type to idle and orphans any in-flight fetch.
    /// Entity tables are not touched.
    pub async fn clear_all(&self) {
        self.ctx.registry.write().await.reset();
        info!("Cache metadata cleared");
    }

    // == End Session ==
    /// `clear_all` plus every table emptied, under one registry guard so no
    /// pull can be issued or land between the two.
    pub async fn end_session(&self) {
        let mut registry = self.ctx.registry.write().await;
        registry.reset();
        self.ctx.store.write().await.remove_everything();
        info!("Session ended, metadata and entity tables cleared");
    }

    // == Reads ==
    pub async fn metadata(&self, entity_type: EntityType) -> CacheMetadata {
        self.ctx.registry.read().await.get(entity_type)
    }

    pub async fn report(&self, entity_type: EntityType) -> FreshnessReport {
        let meta = self.metadata(entity_type).await;
        self.build_report(entity_type, meta)
    }

    pub async fn reports(&self) -> Vec<FreshnessReport> {
        let registry = self.ctx.registry.read().await;
        EntityType::ALL
            .into_iter()
            .map(|t| self.build_report(t, registry.get(t)))
            .collect()
    }

    fn build_report(&self, entity_type: EntityType, meta: CacheMetadata) -> FreshnessReport {
        let ttl = self.ttls.ttl_ms(entity_type);
        let now = self.ctx.now_ms();
        FreshnessReport {
            entity_type,
            status: meta.status,
            last_updated: meta.last_updated,
            is_fresh: freshness::is_fresh(&meta, ttl, now),
            is_stale: freshness::is_stale(&meta, ttl, now),
            time_until_expiry_ms: freshness::time_until_expiry(&meta, ttl, now),
            error: meta.error,
            ttl_ms: ttl,
        }
    }
}
