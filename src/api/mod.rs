//! API Module
//!
//! Cache-aside middleware for host routes, plus the cache admin REST API.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /cache/stats` - Get cache statistics
//! - `DELETE /cache` - Clear all entries or those matching `?pattern=`
//! - `DELETE /cache/keys/:key` - Delete a key
//! - `DELETE /cache/users/:user_id/sessions` - Force logout everywhere
//! - `POST /cache/sweep` - Run a sweep immediately

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use handlers::*;
pub use middleware::{cache_aside, cache_key, CachedResponse, CACHE_STATUS_HEADER};
pub use routes::{create_router, with_response_cache};
