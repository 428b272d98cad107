//! Cache Context Module
//!
//! The session-scoped state shared by the refresh and live paths.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::cache::{EntityStore, MetadataRegistry, RefreshStats};
use crate::clock::Clock;

// == Cache Context ==
/// Explicit handle on the freshness metadata, entity tables, counters and
/// clock of one session. Cheap to clone.
///
/// Lock order when more than one is held: `registry`, then `store`, then `stats`.
#[derive(Clone)]
pub struct CacheContext {
    pub registry: Arc<RwLock<MetadataRegistry>>,
    pub store: Arc<RwLock<EntityStore>>,
    pub stats: Arc<RwLock<RefreshStats>>,
    pub clock: Arc<dyn Clock>,
}

impl CacheContext {
    /// Fresh session state: every type idle, every table empty.
    pub fn init(clock: Arc<dyn Clock>) -> Self {
        Self {
            registry: Arc::new(RwLock::new(MetadataRegistry::new())),
            store: Arc::new(RwLock::new(EntityStore::new())),
            stats: Arc::new(RwLock::new(RefreshStats::new())),
            clock,
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }
}
