//! Cache Metadata Module
//!
//! Per-entity-type freshness state and the registry that owns it.

use std::collections::HashMap;

use serde::Serialize;

use crate::cache::EntityType;

// == Cache Status ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheStatus {
    #[default]
    Idle,
    Loading,
    Fresh,
    Stale,
    Error,
}

// == Cache Metadata ==
/// Freshness record for one entity type.
///
/// `last_updated == 0` means the type has never been loaded successfully.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CacheMetadata {
    pub last_updated: u64,
    pub status: CacheStatus,
    pub error: Option<String>,
    /// Set by `invalidate` while a fetch is in flight.
    #[serde(skip)]
    pub(crate) invalidated_while_loading: bool,
}

impl CacheMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn never_loaded(&self) -> bool {
        self.last_updated == 0
    }
}

// == Metadata Registry ==
/// Owns the `CacheMetadata` of every entity type for one session.
///
/// `generation` is bumped by `clear_all` so that fetches issued before a
/// session reset can recognise they are obsolete.
#[derive(Debug)]
pub struct MetadataRegistry {
    entries: HashMap<EntityType, CacheMetadata>,
    generation: u64,
}

impl MetadataRegistry {
    pub fn new() -> Self {
        Self {
            entries: EntityType::ALL
                .into_iter()
                .map(|t| (t, CacheMetadata::new()))
                .collect(),
            generation: 0,
        }
    }

    pub fn get(&self, entity_type: EntityType) -> CacheMetadata {
        self.entries.get(&entity_type).cloned().unwrap_or_default()
    }

    pub(crate) fn get_mut(&mut self, entity_type: EntityType) -> &mut CacheMetadata {
        self.entries.entry(entity_type).or_default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Resets every type to idle and starts a new generation.
    pub(crate) fn reset(&mut self) {
        for meta in self.entries.values_mut() {
            *meta = CacheMetadata::new();
        }
        self.generation += 1;
    }
}

impl Default for MetadataRegistry {
    fn default() -> Self {
        Self::new()
    }
}
