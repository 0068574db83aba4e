//! End-to-end cache scenarios
//!
//! Drives the store the way the request and authentication layers do.

use std::time::Duration;

use erp_cache::{
    cache::{shared, CacheStore, ManualClock},
    spawn_sweeper, SessionIdentity,
};
use serde_json::{json, Value};

fn decode_token(token: &str) -> Result<SessionIdentity, String> {
    // Stand-in for the auth layer: "uid:device" tokens
    let (user, device) = token.split_once(':').ok_or("malformed token")?;
    Ok(SessionIdentity::new(user, Some(device.to_string())))
}

#[test]
fn test_dashboard_cache_then_pattern_clear() {
    let clock = ManualClock::new(0);
    let mut cache: CacheStore<Value, ManualClock> = CacheStore::with_clock(1000, 60_000, clock);

    cache.set("/api/dashboard", json!({ "total": 42 }), Some(300_000));
    let hit = cache.get("/api/dashboard").expect("fresh entry");
    assert_eq!(*hit, json!({ "total": 42 }));

    cache.clear(Some("dashboard"));
    assert!(cache.get("/api/dashboard").is_none());
}

#[test]
fn test_logout_invalidates_only_that_identity() {
    let clock = ManualClock::new(0);
    let mut cache: CacheStore<Value, ManualClock> = CacheStore::with_clock(1000, 60_000, clock);

    cache.set("user_session_5_abc", json!({ "user": 5 }), None);
    cache.set("user_session_id_5", json!({ "user": 5 }), None);
    cache.set("user_session_6_xyz", json!({ "user": 6 }), None);

    let removed = cache.invalidate_by_token("5:abc", &decode_token);
    assert_eq!(removed, 2);
    assert!(cache.get("user_session_5_abc").is_none());
    assert!(cache.get("user_session_id_5").is_none());
    assert!(cache.get("user_session_6_xyz").is_some());
}

#[test]
fn test_logout_with_malformed_token_is_harmless() {
    let clock = ManualClock::new(0);
    let mut cache: CacheStore<Value, ManualClock> = CacheStore::with_clock(1000, 60_000, clock);
    cache.set("user_session_6_xyz", json!({ "user": 6 }), None);

    assert_eq!(cache.invalidate_by_token("garbage", &decode_token), 0);
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_overwrite_restarts_the_ttl_clock() {
    let clock = ManualClock::new(0);
    let mut cache: CacheStore<&str, ManualClock> =
        CacheStore::with_clock(1000, 60_000, clock.clone());

    cache.set("k", "v1", Some(1_000));
    clock.advance(900);
    cache.set("k", "v2", Some(1_000));
    clock.advance(900);

    assert_eq!(cache.get("k").as_deref(), Some(&"v2"));
    clock.advance(101);
    assert!(cache.get("k").is_none());
}

#[tokio::test]
async fn test_sweeper_bounds_cache_after_burst() {
    let clock = ManualClock::new(0);
    let cache = shared(CacheStore::with_clock(30, 60_000, clock.clone()));

    {
        let mut guard = cache.write().await;
        for i in 0..60 {
            guard.set(format!("/api/search?q={i}"), i, None);
            clock.advance(1);
        }
        // Writes are never rejected, even well past the ceiling
        assert_eq!(guard.len(), 60);
    }

    let sweeper = spawn_sweeper(cache.clone(), Duration::from_millis(25));
    tokio::time::sleep(Duration::from_millis(300)).await;
    sweeper.stop().await;

    let guard = cache.read().await;
    // 60 -> 40 -> 27, then stable under the ceiling
    assert_eq!(guard.len(), 27);
    assert!(guard.contains_key("/api/search?q=59"));
    assert!(!guard.contains_key("/api/search?q=0"));
}
