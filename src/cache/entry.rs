//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::sync::Arc;

// == Cache Entry ==
/// A cached value plus its expiry and last-access timestamps.
///
/// The value sits behind an `Arc` and is never mutated once cached; readers
/// get a shared handle rather than a copy.
#[derive(Debug)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: Arc<V>,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
    /// Last successful read or write (Unix milliseconds)
    pub last_access: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry that expires `ttl_ms` after `now`.
    pub fn new(value: V, now: u64, ttl_ms: u64) -> Self {
        Self {
            value: Arc::new(value),
            expires_at: now.saturating_add(ttl_ms),
            last_access: now,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// An entry is still alive at exactly `expires_at` and expired strictly
    /// after it. Lazy expiry and the sweeper both use this rule.
    pub fn is_expired_at(&self, now: u64) -> bool {
        now > self.expires_at
    }

    // == Touch ==
    pub fn touch(&mut self, now: u64) {
        self.last_access = now;
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds, 0 once expired.
    pub fn ttl_remaining_ms(&self, now: u64) -> u64 {
        self.expires_at.saturating_sub(now)
    }
}

// Manual impl so `V` itself need not be `Clone`.
impl<V> Clone for CacheEntry<V> {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
            expires_at: self.expires_at,
            last_access: self.last_access,
        }
    }
}
