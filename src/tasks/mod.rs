//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside the cache.
//!
//! # Tasks
//! - Sweeper: drops expired entries and trims the cache above its ceiling

mod sweeper;

pub use sweeper::{spawn_sweeper, SweeperHandle};
