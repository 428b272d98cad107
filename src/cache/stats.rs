//! Refresh Statistics Module
//!
//! Counters for pull refreshes, invalidations and live patches.

use serde::Serialize;

// == Refresh Stats ==
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RefreshStats {
    /// Fetches actually issued to the fleet service
    pub fetches_issued: u64,
    pub fetches_succeeded: u64,
    pub fetches_failed: u64,
    /// Completions thrown away because the session was cleared mid-flight
    pub fetches_discarded: u64,
    /// Refresh checks that decided no fetch was due
    pub refreshes_skipped: u64,
    pub invalidations: u64,
    pub live_patches_applied: u64,
    pub live_events_dropped: u64,
}

impl RefreshStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_issued(&mut self) {
        self.fetches_issued += 1;
    }

    pub fn record_success(&mut self) {
        self.fetches_succeeded += 1;
    }

    pub fn record_failure(&mut self) {
        self.fetches_failed += 1;
    }

    pub fn record_discarded(&mut self) {
        self.fetches_discarded += 1;
    }

    pub fn record_skipped(&mut self) {
        self.refreshes_skipped += 1;
    }

    pub fn record_invalidation(&mut self) {
        self.invalidations += 1;
    }

    pub fn record_live_applied(&mut self) {
        self.live_patches_applied += 1;
    }

    pub fn record_live_dropped(&mut self) {
        self.live_events_dropped += 1;
    }

    /// Fraction of issued fetches that failed, or 0.0 before any fetch.
    pub fn failure_rate(&self) -> f64 {
        if self.fetches_issued == 0 {
            0.0
        } else {
            self.fetches_failed as f64 / self.fetches_issued as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = RefreshStats::new();
        assert_eq!(stats, RefreshStats::default());
        assert_eq!(stats.failure_rate(), 0.0);
    }

    #[test]
    fn test_failure_rate() {
        let mut stats = RefreshStats::new();
        stats.record_issued();
        stats.record_issued();
        stats.record_success();
        stats.record_failure();
        assert_eq!(stats.failure_rate(), 0.5);
    }

    #[test]
    fn test_live_counters() {
        let mut stats = RefreshStats::new();
        stats.record_live_applied();
        stats.record_live_applied();
        stats.record_live_dropped();
        assert_eq!(stats.live_patches_applied, 2);
        assert_eq!(stats.live_events_dropped, 1);
    }
}
