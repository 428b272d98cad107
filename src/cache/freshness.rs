//! Freshness Tracker
//!
//! Pure decision functions over a `CacheMetadata` record, its TTL and the
//! current instant. Nothing here reads a clock or touches shared state.

use crate::cache::{CacheMetadata, CacheStatus};

// == Is Stale ==
/// True when the type must be refetched before it can be considered fresh.
///
/// Idle, stale and errored types are always stale, as is a type that has
/// never been loaded. Otherwise the type is stale once its age exceeds `ttl_ms`.
pub fn is_stale(meta: &CacheMetadata, ttl_ms: u64, now_ms: u64) -> bool {
    if meta.never_loaded() {
        return true;
    }
    match meta.status {
        CacheStatus::Idle | CacheStatus::Stale | CacheStatus::Error => true,
        CacheStatus::Loading | CacheStatus::Fresh => age_ms(meta, now_ms) > ttl_ms,
    }
}

// == Should Refresh ==
/// Like [`is_stale`], but never while a fetch is already in flight.
pub fn should_refresh(meta: &CacheMetadata, ttl_ms: u64, now_ms: u64) -> bool {
    if meta.status == CacheStatus::Loading {
        return false;
    }
    is_stale(meta, ttl_ms, now_ms)
}

// == Is Fresh ==
/// True only for a `fresh` type whose age is within `ttl_ms` (inclusive).
pub fn is_fresh(meta: &CacheMetadata, ttl_ms: u64, now_ms: u64) -> bool {
    meta.status == CacheStatus::Fresh && !meta.never_loaded() && age_ms(meta, now_ms) <= ttl_ms
}

// == Time Until Expiry ==
/// Milliseconds until the TTL lapses; 0 if already lapsed or never loaded.
pub fn time_until_expiry(meta: &CacheMetadata, ttl_ms: u64, now_ms: u64) -> u64 {
    if meta.never_loaded() {
        return 0;
    }
    meta.last_updated
        .saturating_add(ttl_ms)
        .saturating_sub(now_ms)
}

// == Stale For Display ==
/// Per-entity display flag for live-updated records.
///
/// The freshest of the entity's last live observation and the type's last
/// pull decides the age.
pub fn stale_for_display(
    last_observed: Option<u64>,
    cache_last_updated: u64,
    threshold_ms: u64,
    now_ms: u64,
) -> bool {
    let latest = last_observed.unwrap_or(0).max(cache_last_updated);
    now_ms.saturating_sub(latest) > threshold_ms
}

fn age_ms(meta: &CacheMetadata, now_ms: u64) -> u64 {
    now_ms.saturating_sub(meta.last_updated)
}
