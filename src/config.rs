//! Configuration Module
//!
//! Handles loading cache and server configuration from environment variables.

use std::env;
use std::str::FromStr;

// == TTL Categories ==
/// Logical groups of cached data, each with an independently configured TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TtlCategory {
    Default,
    UserSession,
    Dashboard,
    Reports,
    Config,
}

impl TtlCategory {
    /// Picks a category from readable fragments of a request path.
    ///
    /// Falls back to `Default` when no known fragment is present.
    pub fn for_path(path: &str) -> Self {
        if path.contains("session") {
            TtlCategory::UserSession
        } else if path.contains("dashboard") {
            TtlCategory::Dashboard
        } else if path.contains("report") {
            TtlCategory::Reports
        } else if path.contains("config") {
            TtlCategory::Config
        } else {
            TtlCategory::Default
        }
    }
}

// == Category TTL Table ==
/// Per-category TTLs in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTtls {
    pub default: u64,
    pub user_session: u64,
    pub dashboard: u64,
    pub reports: u64,
    pub config: u64,
}

impl CategoryTtls {
    /// Uses `ttl_ms` for every category.
    pub fn uniform(ttl_ms: u64) -> Self {
        Self {
            default: ttl_ms,
            user_session: ttl_ms,
            dashboard: ttl_ms,
            reports: ttl_ms,
            config: ttl_ms,
        }
    }

    /// Returns the TTL in milliseconds configured for `category`.
    pub fn ttl_for(&self, category: TtlCategory) -> u64 {
        match category {
            TtlCategory::Default => self.default,
            TtlCategory::UserSession => self.user_session,
            TtlCategory::Dashboard => self.dashboard,
            TtlCategory::Reports => self.reports,
            TtlCategory::Config => self.config,
        }
    }
}

impl Default for CategoryTtls {
    fn default() -> Self {
        Self {
            default: 60_000,
            user_session: 300_000,
            dashboard: 120_000,
            reports: 600_000,
            config: 3_600_000,
        }
    }
}

/// Cache and server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// TTLs selected by category when callers cache a value
    pub ttls: CategoryTtls,
    /// Period of the background sweeper in milliseconds
    pub sweep_interval_ms: u64,
    /// Entry count above which the sweeper evicts the coldest third
    pub max_entries: usize,
    /// Whether token invalidation falls back to the legacy token-prefix key
    pub legacy_token_keys: bool,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_TTL_DEFAULT_MS` (default: 60000)
    /// - `CACHE_TTL_USER_SESSION_MS` (default: 300000)
    /// - `CACHE_TTL_DASHBOARD_MS` (default: 120000)
    /// - `CACHE_TTL_REPORTS_MS` (default: 600000)
    /// - `CACHE_TTL_CONFIG_MS` (default: 3600000)
    /// - `CACHE_SWEEP_INTERVAL_MS` (default: 300000)
    /// - `CACHE_MAX_ENTRIES` (default: 1000)
    /// - `CACHE_LEGACY_TOKEN_KEYS` (default: true)
    /// - `SERVER_PORT` (default: 3000)
    ///
    /// Missing or unparseable values fall back to their defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let ttls = CategoryTtls {
            default: env_or("CACHE_TTL_DEFAULT_MS", defaults.ttls.default),
            user_session: env_or("CACHE_TTL_USER_SESSION_MS", defaults.ttls.user_session),
            dashboard: env_or("CACHE_TTL_DASHBOARD_MS", defaults.ttls.dashboard),
            reports: env_or("CACHE_TTL_REPORTS_MS", defaults.ttls.reports),
            config: env_or("CACHE_TTL_CONFIG_MS", defaults.ttls.config),
        };

        Self {
            ttls,
            sweep_interval_ms: env_or("CACHE_SWEEP_INTERVAL_MS", defaults.sweep_interval_ms),
            max_entries: env_or("CACHE_MAX_ENTRIES", defaults.max_entries),
            legacy_token_keys: env_or("CACHE_LEGACY_TOKEN_KEYS", defaults.legacy_token_keys),
            server_port: env_or("SERVER_PORT", defaults.server_port),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ttls: CategoryTtls::default(),
            sweep_interval_ms: 300_000,
            max_entries: 1000,
            legacy_token_keys: true,
            server_port: 3000,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
