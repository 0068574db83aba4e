//! Cache Store Module
//!
//! Main cache engine: a key to entry map with TTL expiry, substring
//! invalidation and a sweep that trims the coldest entries over capacity.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, Clock, SystemClock};
use crate::config::{CategoryTtls, Config, TtlCategory};

// == Sweep Report ==
/// Outcome of one sweep over the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Entries dropped by the expiry pass
    pub expired: usize,
    /// Entries dropped by the capacity pass
    pub evicted: usize,
    /// Entries left after both passes
    pub remaining: usize,
}

// == Cache Store ==
/// In-process cache keyed by caller-built strings.
///
/// Values are opaque to the store. Writes never check capacity; the
/// [`sweep`](CacheStore::sweep) pass is the only place the `max_entries`
/// ceiling is enforced.
#[derive(Debug)]
pub struct CacheStore<V, C = SystemClock> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Performance statistics
    stats: CacheStats,
    /// Soft ceiling enforced by the sweeper
    max_entries: usize,
    /// TTLs in milliseconds, per category
    ttls: CategoryTtls,
    /// Fall back to the token-prefix key when token verification fails
    legacy_token_keys: bool,
    clock: C,
}

impl<V> CacheStore<V, SystemClock> {
    // == Constructor ==
    /// Creates a store using the wall clock.
    ///
    /// # Arguments
    /// * `max_entries` - Entry count above which a sweep evicts the coldest third
    /// * `default_ttl_ms` - TTL in milliseconds used for every category
    pub fn new(max_entries: usize, default_ttl_ms: u64) -> Self {
        Self::with_clock(max_entries, default_ttl_ms, SystemClock)
    }

    /// Creates a store from loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.max_entries, config.ttls.default)
            .with_category_ttls(config.ttls.clone())
            .with_legacy_token_keys(config.legacy_token_keys)
    }
}

impl<V, C: Clock> CacheStore<V, C> {
    /// Creates a store reading time from `clock`.
    pub fn with_clock(max_entries: usize, default_ttl_ms: u64, clock: C) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            max_entries,
            ttls: CategoryTtls::uniform(default_ttl_ms),
            legacy_token_keys: true,
            clock,
        }
    }

    /// Replaces the per-category TTL table.
    pub fn with_category_ttls(mut self, ttls: CategoryTtls) -> Self {
        self.ttls = ttls;
        self
    }

    /// Enables or disables the legacy token-prefix fallback on token invalidation.
    pub fn with_legacy_token_keys(mut self, enabled: bool) -> Self {
        self.legacy_token_keys = enabled;
        self
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// An expired entry is removed on the spot and reported as absent, so a
    /// miss and an expired hit look the same to the caller. A hit refreshes
    /// the entry's last-access time.
    pub fn get(&mut self, key: &str) -> Option<Arc<V>> {
        let now = self.clock.now_ms();

        let expired = match self.entries.get_mut(key) {
            Some(entry) if !entry.is_expired_at(now) => {
                entry.touch(now);
                let value = Arc::clone(&entry.value);
                self.stats.record_hit();
                return Some(value);
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            self.entries.remove(key);
            self.stats.record_expired(1);
            self.stats.set_total_entries(self.entries.len());
            debug!(key, "lazily expired cache entry");
        }
        self.stats.record_miss();
        None
    }

    // == Set ==
    /// Stores a value, overwriting any existing entry for the key.
    ///
    /// `ttl_ms` of `None` or `0` falls back to the default TTL. The write never
    /// consults the capacity ceiling.
    pub fn set(&mut self, key: impl Into<String>, value: V, ttl_ms: Option<u64>) {
        let ttl = match ttl_ms {
            Some(ttl) if ttl > 0 => ttl,
            _ => self.ttls.default,
        };
        let now = self.clock.now_ms();
        self.entries.insert(key.into(), CacheEntry::new(value, now, ttl));
        self.stats.set_total_entries(self.entries.len());
    }

    /// Stores a value with the TTL configured for `category`.
    pub fn set_with_category(&mut self, key: impl Into<String>, value: V, category: TtlCategory) {
        let ttl = self.ttls.ttl_for(category);
        self.set(key, value, Some(ttl));
    }

    // == Delete ==
    /// Removes an entry by key. Returns whether anything was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.stats.record_invalidations(1);
            self.stats.set_total_entries(self.entries.len());
        }
        removed
    }

    // == Clear ==
    /// Removes every entry, or only those whose key contains `pattern`.
    ///
    /// Matching is a plain substring test: `clear(Some("dashboard"))` drops
    /// `/api/dashboard/summary` and `/api/dashboard/chart` alike.
    ///
    /// Returns the number of entries removed.
    pub fn clear(&mut self, pattern: Option<&str>) -> usize {
        match pattern {
            None => {
                let count = self.entries.len();
                self.entries.clear();
                self.stats.record_invalidations(count);
                self.stats.set_total_entries(0);
                count
            }
            Some(pattern) => self.remove_where(|key| key.contains(pattern)),
        }
    }

    /// Removes every entry whose key satisfies `predicate`.
    ///
    /// Returns the number of entries removed.
    pub fn remove_where(&mut self, mut predicate: impl FnMut(&str) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !predicate(key.as_str()));
        let count = before - self.entries.len();

        self.stats.record_invalidations(count);
        self.stats.set_total_entries(self.entries.len());
        count
    }

    // == Contains Key ==
    /// Checks for a live entry without touching it or expiring it.
    pub fn contains_key(&self, key: &str) -> bool {
        let now = self.clock.now_ms();
        self.entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired_at(now))
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
        let count = before - self.entries.len();

        self.stats.record_expired(count);
        self.stats.set_total_entries(self.entries.len());
        count
    }

    // == Evict Coldest ==
    /// When over `max_entries`, removes the least recently accessed third.
    ///
    /// Returns the number of entries removed.
    pub fn evict_coldest(&mut self) -> usize {
        let len = self.entries.len();
        if len <= self.max_entries {
            return 0;
        }

        let mut by_access: Vec<(u64, &String)> = self
            .entries
            .iter()
            .map(|(key, entry)| (entry.last_access, key))
            .collect();
        by_access.sort_unstable();

        let count = len / 3;
        let victims: Vec<String> = by_access
            .into_iter()
            .take(count)
            .map(|(_, key)| key.clone())
            .collect();

        for key in &victims {
            self.entries.remove(key);
        }

        self.stats.record_evictions(count);
        self.stats.set_total_entries(self.entries.len());
        count
    }

    // == Sweep ==
    /// Runs the expiry pass, then the capacity pass.
    pub fn sweep(&mut self) -> SweepReport {
        let expired = self.cleanup_expired();
        let evicted = self.evict_coldest();
        self.stats.record_sweep();

        SweepReport {
            expired,
            evicted,
            remaining: self.entries.len(),
        }
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Returns the current number of entries, expired ones included until
    /// they are read or swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn ttls(&self) -> &CategoryTtls {
        &self.ttls
    }

    pub fn legacy_token_keys(&self) -> bool {
        self.legacy_token_keys
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}
