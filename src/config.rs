//! Configuration Module
//!
//! Handles loading fleet cache configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::EntityType;

// == Defaults ==
pub const DEFAULT_TRUCKS_TTL_MS: u64 = 5 * 60 * 1000;
pub const DEFAULT_DRIVERS_TTL_MS: u64 = 5 * 60 * 1000;
pub const DEFAULT_GROUPS_TTL_MS: u64 = 10 * 60 * 1000;
pub const DEFAULT_STATS_TTL_MS: u64 = 60 * 1000;
/// Display threshold for live-updated entities. Kept apart from the trucks TTL.
pub const DEFAULT_LIVE_STALE_THRESHOLD_MS: u64 = 5 * 60 * 1000;

// == Entity TTLs ==
/// TTL per entity type, in milliseconds. One field per type, so no type can
/// be missing an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityTtls {
    pub trucks: u64,
    pub drivers: u64,
    pub groups: u64,
    pub stats: u64,
}

impl EntityTtls {
    pub fn ttl_ms(&self, entity_type: EntityType) -> u64 {
        match entity_type {
            EntityType::Trucks => self.trucks,
            EntityType::Drivers => self.drivers,
            EntityType::Groups => self.groups,
            EntityType::Stats => self.stats,
        }
    }
}

impl Default for EntityTtls {
    fn default() -> Self {
        Self {
            trucks: DEFAULT_TRUCKS_TTL_MS,
            drivers: DEFAULT_DRIVERS_TTL_MS,
            groups: DEFAULT_GROUPS_TTL_MS,
            stats: DEFAULT_STATS_TTL_MS,
        }
    }
}

/// Fleet cache configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pull TTL per entity type
    pub ttls: EntityTtls,
    /// Age after which a live-updated entity is flagged stale for display
    pub live_stale_threshold_ms: u64,
    /// Transport-boundary timeout applied to every pull
    pub fetch_timeout_ms: u64,
    /// Seconds between background freshness checks
    pub refresh_interval: u64,
    /// Cap on the live channel reconnect backoff, in seconds
    pub live_backoff_max_secs: u64,
    /// Base URL of the remote fleet service
    pub fleet_api_url: String,
    /// Console API port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `TRUCKS_TTL_MS`, `DRIVERS_TTL_MS`, `GROUPS_TTL_MS`, `STATS_TTL_MS`
    ///   (defaults: 5 min, 5 min, 10 min, 1 min)
    /// - `LIVE_STALE_THRESHOLD_MS` - Live display threshold (default: 5 min)
    /// - `FETCH_TIMEOUT_MS` - Pull timeout (default: 15000)
    /// - `REFRESH_INTERVAL` - Background poll in seconds (default: 30)
    /// - `LIVE_BACKOFF_MAX_SECS` - Reconnect backoff cap (default: 60)
    /// - `FLEET_API_URL` - Fleet service base URL (default: http://localhost:8080/api)
    /// - `SERVER_PORT` - Console API port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            ttls: EntityTtls {
                trucks: env_or("TRUCKS_TTL_MS", defaults.ttls.trucks),
                drivers: env_or("DRIVERS_TTL_MS", defaults.ttls.drivers),
                groups: env_or("GROUPS_TTL_MS", defaults.ttls.groups),
                stats: env_or("STATS_TTL_MS", defaults.ttls.stats),
            },
            live_stale_threshold_ms: env_or(
                "LIVE_STALE_THRESHOLD_MS",
                defaults.live_stale_threshold_ms,
            ),
            fetch_timeout_ms: env_or("FETCH_TIMEOUT_MS", defaults.fetch_timeout_ms),
            refresh_interval: env_or("REFRESH_INTERVAL", defaults.refresh_interval),
            live_backoff_max_secs: env_or("LIVE_BACKOFF_MAX_SECS", defaults.live_backoff_max_secs),
            fleet_api_url: env::var("FLEET_API_URL").unwrap_or(defaults.fleet_api_url),
            server_port: env_or("SERVER_PORT", defaults.server_port),
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ttls: EntityTtls::default(),
            live_stale_threshold_ms: DEFAULT_LIVE_STALE_THRESHOLD_MS,
            fetch_timeout_ms: 15_000,
            refresh_interval: 30,
            live_backoff_max_secs: 60,
            fleet_api_url: "http://localhost:8080/api".to_string(),
            server_port: 3000,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.ttls.ttl_ms(EntityType::Trucks), 300_000);
        assert_eq!(config.ttls.ttl_ms(EntityType::Drivers), 300_000);
        assert_eq!(config.ttls.ttl_ms(EntityType::Groups), 600_000);
        assert_eq!(config.ttls.ttl_ms(EntityType::Stats), 60_000);
        assert_eq!(config.live_stale_threshold_ms, 300_000);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.fetch_timeout(), Duration::from_secs(15));
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        for name in [
            "TRUCKS_TTL_MS",
            "DRIVERS_TTL_MS",
            "GROUPS_TTL_MS",
            "STATS_TTL_MS",
            "LIVE_STALE_THRESHOLD_MS",
            "FETCH_TIMEOUT_MS",
            "REFRESH_INTERVAL",
            "LIVE_BACKOFF_MAX_SECS",
            "FLEET_API_URL",
            "SERVER_PORT",
        ] {
            env::remove_var(name);
        }

        let config = Config::from_env();
        assert_eq!(config.ttls, EntityTtls::default());
        assert_eq!(config.refresh_interval, 30);
        assert_eq!(config.live_backoff_max_secs, 60);
        assert_eq!(config.fleet_api_url, "http://localhost:8080/api");
    }

    #[test]
    fn test_display_threshold_independent_of_trucks_ttl() {
        let config = Config {
            ttls: EntityTtls {
                trucks: 1_000,
                ..EntityTtls::default()
            },
            ..Config::default()
        };
        assert_eq!(config.live_stale_threshold_ms, DEFAULT_LIVE_STALE_THRESHOLD_MS);
    }
}
