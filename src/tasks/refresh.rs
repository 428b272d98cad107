//! Background Refresh Task
//!
//! Periodically asks every entity type whether it is due for a pull.

use std::time::Duration;

use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, info, warn};

use crate::cache::{EntityType, RefreshOrchestrator, RefreshOutcome};

/// Spawns a background task that runs `check_and_maybe_refresh` for every
/// entity type once per interval.
///
/// Checks are gated by the orchestrator, so polling more often than the
/// TTLs never issues extra fetches. The types of one round are checked
/// concurrently; a slow pull only holds back the next round.
///
/// # Arguments
/// * `orchestrator` - Orchestrator of the current session
/// * `interval_secs` - Seconds between polling rounds
///
/// # Returns
/// A JoinHandle for the spawned task, aborted during graceful shutdown.
pub fn spawn_refresh_task(orchestrator: RefreshOrchestrator, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting refresh task with interval of {} seconds",
            interval_secs
        );

        loop {
            let mut checks = JoinSet::new();
            for entity_type in EntityType::ALL {
                let orchestrator = orchestrator.clone();
                checks.spawn(async move {
                    (entity_type, orchestrator.check_and_maybe_refresh(entity_type).await)
                });
            }

            let mut outcomes = Vec::with_capacity(EntityType::ALL.len());
            while let Some(joined) = checks.join_next().await {
                match joined {
                    Ok((entity_type, outcome)) => {
                        if let RefreshOutcome::Failed { error } = &outcome {
                            warn!(entity_type = %entity_type, %error, "Refresh round: pull failed");
                        }
                        outcomes.push(outcome);
                    }
                    Err(e) => warn!("Refresh check panicked: {}", e),
                }
            }

            let (refreshed, failed) = tally(&outcomes);
            if refreshed > 0 || failed > 0 {
                info!(
                    "Refresh round: {} entity types pulled, {} failed",
                    refreshed, failed
                );
            } else {
                debug!("Refresh round: everything fresh");
            }

            tokio::time::sleep(interval).await;
        }
    })
}

/// Counts pulled and failed types of one round. Skipped and discarded
/// checks count as neither.
fn tally(outcomes: &[RefreshOutcome]) -> (usize, usize) {
    outcomes
        .iter()
        .fold((0, 0), |(refreshed, failed), outcome| match outcome {
            RefreshOutcome::Refreshed { .. } => (refreshed + 1, failed),
            RefreshOutcome::Failed { .. } => (refreshed, failed + 1),
            RefreshOutcome::Skipped | RefreshOutcome::Discarded => (refreshed, failed),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheContext, CacheStatus, EntityRecord, InvalidationGraph};
    use crate::clock::ManualClock;
    use crate::config::EntityTtls;
    use crate::fetch::{FetchError, Fetcher};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct CountingFetcher {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Fetcher for CountingFetcher {
        async fn fetch(&self, _: EntityType) -> Result<Vec<EntityRecord>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![EntityRecord::new("X-1")])
        }
    }

    fn orchestrator(fetcher: Arc<CountingFetcher>) -> RefreshOrchestrator {
        let ctx = CacheContext::init(Arc::new(ManualClock::new(1_000_000)));
        RefreshOrchestrator::new(ctx, fetcher, EntityTtls::default(), InvalidationGraph::fleet())
    }

    #[tokio::test]
    async fn test_refresh_task_loads_every_type_once() {
        let fetcher = Arc::new(CountingFetcher::default());
        let orchestrator = orchestrator(fetcher.clone());

        let handle = spawn_refresh_task(orchestrator.clone(), 1);

        // First round runs immediately; the second would only start after 1s
        // and finds everything fresh anyway (the clock never moves).
        tokio::time::sleep(Duration::from_millis(1500)).await;
        handle.abort();

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), EntityType::ALL.len());
        for t in EntityType::ALL {
            assert_eq!(orchestrator.metadata(t).await.status, CacheStatus::Fresh);
        }
    }

    /// Trucks take far longer than any test waits; other types are instant.
    struct SlowTrucksFetcher;

    #[async_trait]
    impl Fetcher for SlowTrucksFetcher {
        async fn fetch(&self, entity_type: EntityType) -> Result<Vec<EntityRecord>, FetchError> {
            if entity_type == EntityType::Trucks {
                tokio::time::sleep(Duration::from_secs(10)).await;
            }
            Ok(vec![EntityRecord::new("X-1")])
        }
    }

    #[tokio::test]
    async fn test_slow_pull_does_not_hold_back_other_types() {
        let ctx = CacheContext::init(Arc::new(ManualClock::new(1_000_000)));
        let orchestrator = RefreshOrchestrator::new(
            ctx,
            Arc::new(SlowTrucksFetcher),
            EntityTtls::default(),
            InvalidationGraph::fleet(),
        );

        let handle = spawn_refresh_task(orchestrator.clone(), 60);
        tokio::time::sleep(Duration::from_millis(500)).await;
        handle.abort();

        assert_eq!(
            orchestrator.metadata(EntityType::Trucks).await.status,
            CacheStatus::Loading
        );
        for t in [EntityType::Drivers, EntityType::Groups, EntityType::Stats] {
            assert_eq!(orchestrator.metadata(t).await.status, CacheStatus::Fresh);
        }
    }

    #[test]
    fn test_tally_counts_only_pulls_and_failures() {
        let outcomes = [
            RefreshOutcome::Refreshed { records: 3 },
            RefreshOutcome::Failed {
                error: "network timeout".to_string(),
            },
            RefreshOutcome::Discarded,
            RefreshOutcome::Skipped,
        ];

        assert_eq!(tally(&outcomes), (1, 1));
        assert_eq!(tally(&[]), (0, 0));
    }

    #[tokio::test]
    async fn test_refresh_task_can_be_aborted() {
        let handle = spawn_refresh_task(orchestrator(Arc::new(CountingFetcher::default())), 1);

        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
