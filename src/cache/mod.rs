//! Cache Module
//!
//! In-process response cache with TTL expiry, substring and identity-scoped
//! invalidation, and a sweep that trims the least recently used entries.

mod clock;
mod entry;
mod invalidation;
pub mod keys;
mod stats;
mod store;


use std::sync::Arc;

use tokio::sync::RwLock;

// Re-export public types
pub use clock::{current_timestamp_ms, Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use invalidation::{SessionIdentity, TokenVerifier};
pub use stats::CacheStats;
pub use store::{CacheStore, SweepReport};

/// Store handle shared by request handlers and the sweeper.
///
/// One lock guards the whole map: reads touch `last_access`, so every
/// operation takes the write side.
pub type SharedCache<V, C = SystemClock> = Arc<RwLock<CacheStore<V, C>>>;

/// Wraps a store for sharing across tasks.
pub fn shared<V, C>(store: CacheStore<V, C>) -> SharedCache<V, C> {
    Arc::new(RwLock::new(store))
}
