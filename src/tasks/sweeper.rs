//! Cache Sweeper Task
//!
//! Background task that periodically drops expired entries and, above the
//! configured ceiling, evicts the least recently used third of the cache.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::cache::{Clock, SharedCache, SweepReport};

// == Sweeper Handle ==
/// Owns the sweeper task. Dropping the handle cancels the task.
#[derive(Debug)]
pub struct SweeperHandle {
    handle: Option<JoinHandle<()>>,
}

impl SweeperHandle {
    /// Cancels the sweeper and waits for the task to wind down.
    pub async fn stop(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            // A cancelled task resolves to a JoinError; nothing to report.
            let _ = handle.await;
            info!("Cache sweeper stopped");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Spawns the periodic sweeper.
///
/// The first sweep runs one full `period` after spawning. Each tick holds the
/// cache's write lock for both passes, so no reader sees a half-evicted map.
/// A sweep that panics is logged and the next tick runs as usual.
///
/// # Example
/// ```ignore
/// let cache = shared(CacheStore::<Bytes>::new(1000, 60_000));
/// let sweeper = spawn_sweeper(cache.clone(), Duration::from_secs(300));
/// // Later, during shutdown:
/// sweeper.stop().await;
/// ```
pub fn spawn_sweeper<V, C>(cache: SharedCache<V, C>, period: Duration) -> SweeperHandle
where
    V: Send + Sync + 'static,
    C: Clock + 'static,
{
    let handle = tokio::spawn(async move {
        info!("Starting cache sweeper with a period of {:?}", period);

        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick of a tokio interval completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let outcome = {
                let mut guard = cache.write().await;
                catch_unwind(AssertUnwindSafe(|| guard.sweep()))
            };

            match outcome {
                Ok(report) => log_report(&report),
                Err(_) => error!("Cache sweep panicked; retrying on the next tick"),
            }
        }
    });

    SweeperHandle {
        handle: Some(handle),
    }
}

fn log_report(report: &SweepReport) {
    if report.expired > 0 || report.evicted > 0 {
        info!(
            expired = report.expired,
            evicted = report.evicted,
            remaining = report.remaining,
            "Cache sweep removed {} entries",
            report.expired + report.evicted
        );
    } else {
        debug!(remaining = report.remaining, "Cache sweep: nothing to remove");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{shared, CacheStore, ManualClock};

    #[tokio::test]
    async fn test_sweeper_removes_expired_entries() {
        let clock = ManualClock::new(0);
        let cache = shared(CacheStore::with_clock(100, 60_000, clock.clone()));

        {
            let mut guard = cache.write().await;
            guard.set("expire_soon", "value".to_string(), Some(10));
            guard.set("long_lived", "value".to_string(), Some(3_600_000));
        }
        clock.advance(11);

        let sweeper = spawn_sweeper(cache.clone(), Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(150)).await;

        {
            let guard = cache.read().await;
            assert_eq!(guard.len(), 1, "expired entry should have been swept");
            assert!(guard.contains_key("long_lived"));
            assert!(guard.stats().sweeps >= 1);
        }

        sweeper.stop().await;
    }

    #[tokio::test]
    async fn test_sweeper_trims_over_capacity() {
        let clock = ManualClock::new(0);
        let cache = shared(CacheStore::with_clock(6, 60_000, clock.clone()));

        {
            let mut guard = cache.write().await;
            for i in 0..9 {
                guard.set(format!("key{i}"), i, None);
                clock.advance(1);
            }
        }

        let sweeper = spawn_sweeper(cache.clone(), Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(150)).await;
        sweeper.stop().await;

        let guard = cache.read().await;
        assert_eq!(guard.len(), 6);
        assert!(!guard.contains_key("key0"));
        assert!(!guard.contains_key("key2"));
        assert!(guard.contains_key("key3"));
    }

    #[tokio::test]
    async fn test_sweeper_survives_panicking_sweep() {
        #[derive(Debug)]
        struct ExplodingClock {
            calls: std::sync::atomic::AtomicU64,
        }

        impl Clock for ExplodingClock {
            fn now_ms(&self) -> u64 {
                use std::sync::atomic::Ordering;
                // First sweep panics, later ones see a normal clock
                if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    panic!("clock failure");
                }
                1_000
            }
        }

        let clock = ExplodingClock {
            calls: std::sync::atomic::AtomicU64::new(0),
        };
        let cache = shared(CacheStore::<String, _>::with_clock(100, 60_000, clock));

        let sweeper = spawn_sweeper(cache.clone(), Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(!sweeper.is_finished(), "sweeper must keep running");
        assert!(cache.read().await.stats().sweeps >= 1);
        sweeper.stop().await;
    }

    #[tokio::test]
    async fn test_sweeper_can_be_stopped() {
        let cache = shared(CacheStore::<String>::new(100, 60_000));

        let sweeper = spawn_sweeper(cache, Duration::from_millis(10));
        assert!(!sweeper.is_finished());
        sweeper.stop().await;
    }

    #[tokio::test]
    async fn test_dropping_handle_cancels_task() {
        let cache = shared(CacheStore::<String>::new(100, 60_000));

        let sweeper = spawn_sweeper(cache.clone(), Duration::from_millis(10));
        drop(sweeper);
        tokio::time::sleep(Duration::from_millis(50)).await;

        // The task held the only other clone of the Arc
        assert_eq!(std::sync::Arc::strong_count(&cache), 1);
    }
}
