//! Live Channel Task
//!
//! Keeps the live position connection open, reconnecting with exponential
//! backoff, and feeds every event to the reconciler in arrival order.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::cache::RefreshOrchestrator;
use crate::live::{LiveOutcome, LiveReconciler, LiveSource};

const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// Spawns the live channel loop.
///
/// A disconnect leaves the entity tables and cache metadata untouched; the
/// fleet view simply falls back to pull freshness until the next connect.
/// Events for entities no pull has produced yet trigger a refresh check for
/// the live entity type without holding up the events behind them.
///
/// # Arguments
/// * `source` - Where connections come from
/// * `reconciler` - Applies events to the entity store
/// * `orchestrator` - Used for refresh checks on unknown entities
/// * `backoff_max` - Cap on the delay between reconnect attempts
pub fn spawn_live_task(
    source: Arc<dyn LiveSource>,
    reconciler: LiveReconciler,
    orchestrator: RefreshOrchestrator,
    backoff_max: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut backoff = INITIAL_BACKOFF.min(backoff_max);

        loop {
            match source.connect().await {
                Ok(mut events) => {
                    info!("Live channel connected");
                    backoff = INITIAL_BACKOFF.min(backoff_max);

                    while let Some(event) = events.recv().await {
                        if reconciler.on_live_event(&event).await == LiveOutcome::UnknownEntity {
                            let orchestrator = orchestrator.clone();
                            let entity_type = reconciler.entity_type();
                            tokio::spawn(async move {
                                orchestrator.check_and_maybe_refresh(entity_type).await;
                            });
                        }
                    }

                    warn!("Live channel disconnected. Reconnecting in {:?}", backoff);
                }
                Err(e) => {
                    warn!("Live channel error: {}. Reconnecting in {:?}", e, backoff);
                }
            }

            sleep(backoff).await;
            backoff = (backoff * 2).min(backoff_max);
        }
    })
}
