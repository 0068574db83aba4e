//! Request DTOs for the cache admin API
//!
//! Defines the structure of incoming query strings and path parameters.

use serde::Deserialize;

use crate::cache::keys::is_scoped_user_id;

/// Query string for the clear operation (DELETE /cache)
///
/// # Fields
/// - `pattern`: Optional substring; omitted means flush everything
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClearQuery {
    #[serde(default)]
    pub pattern: Option<String>,
}

impl ClearQuery {
    /// Validates the query.
    ///
    /// An empty pattern would match every key, so it is rejected rather
    /// than silently turned into a full flush.
    pub fn validate(&self) -> Option<String> {
        match self.pattern.as_deref() {
            Some("") => Some("Pattern cannot be empty; omit it to clear everything".to_string()),
            _ => None,
        }
    }
}

/// Validates a user identifier taken from the request path.
///
/// Ids containing `_` are rejected: they are ambiguous inside
/// `user_session_{user}_{device}` keys. `id` is reserved for
/// `user_session_id_{user}` keys.
pub fn validate_user_id(user_id: &str) -> Option<String> {
    if user_id.trim().is_empty() {
        return Some("User id cannot be empty".to_string());
    }
    if !is_scoped_user_id(user_id) {
        return Some(format!("User id '{user_id}' is reserved"));
    }
    if user_id.contains('_') {
        return Some("User id cannot contain '_'".to_string());
    }
    None
}
