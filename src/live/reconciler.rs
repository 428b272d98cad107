//! Live Reconciler
//!
//! Merges pushed position events into the entity store alongside the pull
//! snapshot. Never reads or writes the pull path's freshness status.

use serde::Serialize;
use tracing::debug;

use crate::cache::freshness;
use crate::cache::{CacheContext, EntityRecord, EntityType, PatchOutcome};
use crate::live::LivePositionEvent;

// == Live Outcome ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveOutcome {
    Applied,
    /// The id has never been seen by a pull. The caller should schedule a
    /// refresh check so the entity can arrive through the pull path.
    UnknownEntity,
}

// == Display Record ==
/// A record as shown to consumers, with its derived display flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRecord {
    #[serde(flatten)]
    pub record: EntityRecord,
    pub stale_for_display: bool,
}

// == Live Reconciler ==
#[derive(Clone)]
pub struct LiveReconciler {
    ctx: CacheContext,
    entity_type: EntityType,
    stale_threshold_ms: u64,
}

impl LiveReconciler {
    pub fn new(ctx: CacheContext, entity_type: EntityType, stale_threshold_ms: u64) -> Self {
        Self {
            ctx,
            entity_type,
            stale_threshold_ms,
        }
    }

    /// Entity type fed by the live channel.
    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    pub fn stale_threshold_ms(&self) -> u64 {
        self.stale_threshold_ms
    }

    // == On Live Event ==
    /// Applies one pushed event. Events must be delivered one at a time in
    /// arrival order.
    pub async fn on_live_event(&self, event: &LivePositionEvent) -> LiveOutcome {
        let outcome = self.ctx.store.write().await.upsert_patch(
            self.entity_type,
            &event.entity_id,
            event.to_patch(),
            event.observed_at,
        );

        let mut stats = self.ctx.stats.write().await;
        match outcome {
            PatchOutcome::Applied => {
                stats.record_live_applied();
                LiveOutcome::Applied
            }
            PatchOutcome::UnknownId => {
                stats.record_live_dropped();
                debug!(entity_id = %event.entity_id, "Dropped live event for unknown entity");
                LiveOutcome::UnknownEntity
            }
        }
    }

    // == Stale For Display ==
    /// `None` when the entity is not in the table.
    pub async fn is_stale_for_display(&self, entity_id: &str) -> Option<bool> {
        let cache_last_updated = self.cache_last_updated().await;
        let store = self.ctx.store.read().await;
        let record = store.get(self.entity_type, entity_id)?;
        Some(self.flag(record, cache_last_updated))
    }

    /// Every record of `entity_type` with its display flag. Types without a
    /// live channel are flagged from their last pull alone.
    pub async fn display_records(&self, entity_type: EntityType) -> Vec<DisplayRecord> {
        let cache_last_updated = self.ctx.registry.read().await.get(entity_type).last_updated;
        let records = self.ctx.store.read().await.records(entity_type);
        records
            .into_iter()
            .map(|record| DisplayRecord {
                stale_for_display: self.flag(&record, cache_last_updated),
                record,
            })
            .collect()
    }

    pub async fn display_record(&self, entity_type: EntityType, id: &str) -> Option<DisplayRecord> {
        let cache_last_updated = self.ctx.registry.read().await.get(entity_type).last_updated;
        let record = self.ctx.store.read().await.get(entity_type, id).cloned()?;
        Some(DisplayRecord {
            stale_for_display: self.flag(&record, cache_last_updated),
            record,
        })
    }

    async fn cache_last_updated(&self) -> u64 {
        self.ctx.registry.read().await.get(self.entity_type).last_updated
    }

    fn flag(&self, record: &EntityRecord, cache_last_updated: u64) -> bool {
        freshness::stale_for_display(
            record.last_observed,
            cache_last_updated,
            self.stale_threshold_ms,
            self.ctx.now_ms(),
        )
    }
}
