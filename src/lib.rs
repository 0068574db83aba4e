//! ERP Cache - in-process response cache
//!
//! Key/value cache with TTL expiry, substring and identity-scoped
//! invalidation, and a periodic sweeper that trims least recently used
//! entries above a soft ceiling.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheStore, SessionIdentity, SharedCache, TokenVerifier};
pub use config::{Config, TtlCategory};
pub use tasks::{spawn_sweeper, SweeperHandle};
