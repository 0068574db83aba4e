//! Session Key Conventions
//!
//! Builders for the per-identity keys that identity-scoped invalidation targets.

use std::fmt::Display;

/// Prefix shared by every per-device session key.
pub const SESSION_KEY_PREFIX: &str = "user_session_";

/// Segment that marks a `user_session_id_{user_id}` key.
pub const SESSION_ID_SEGMENT: &str = "id";

/// Number of raw token characters used by the legacy key format.
pub const LEGACY_TOKEN_KEY_CHARS: usize = 32;

/// `user_session_{user_id}_{device_id}`
pub fn session_key(user_id: impl Display, device_id: impl Display) -> String {
    format!("{SESSION_KEY_PREFIX}{user_id}_{device_id}")
}

/// `user_session_id_{user_id}`
pub fn session_id_key(user_id: impl Display) -> String {
    format!("{SESSION_KEY_PREFIX}{SESSION_ID_SEGMENT}_{user_id}")
}

/// Whether session keys built from `user_id` stay scoped to that one user.
///
/// An empty id turns the device prefix into `user_session_`, and `id` turns it
/// into the prefix of every user's id key.
pub fn is_scoped_user_id(user_id: &str) -> bool {
    !user_id.is_empty() && user_id != SESSION_ID_SEGMENT
}

/// Prefix matching every device key of one user: `user_session_{user_id}_`.
pub fn user_device_prefix(user_id: impl Display) -> String {
    format!("{SESSION_KEY_PREFIX}{user_id}_")
}

/// Key built from the first 32 characters of a raw token, used by older
/// session caching code that keyed on the token itself.
pub fn legacy_token_key(token: &str) -> String {
    let head: String = token.chars().take(LEGACY_TOKEN_KEY_CHARS).collect();
    format!("{SESSION_KEY_PREFIX}{head}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_keys() {
        assert_eq!(session_key(7, "deviceA"), "user_session_7_deviceA");
        assert_eq!(session_id_key(7), "user_session_id_7");
        assert_eq!(user_device_prefix("42"), "user_session_42_");
    }

    #[test]
    fn test_device_prefix_does_not_match_longer_ids() {
        let prefix = user_device_prefix(7);
        assert!(session_key(7, "a").starts_with(&prefix));
        assert!(!session_key(70, "a").starts_with(&prefix));
    }

    #[test]
    fn test_reserved_user_ids_are_not_scoped() {
        assert!(is_scoped_user_id("7"));
        assert!(!is_scoped_user_id(""));
        assert!(!is_scoped_user_id("id"));
        // "id" as a device prefix would cover every user's id key
        assert!(session_id_key(5).starts_with(&user_device_prefix("id")));
    }

    #[test]
    fn test_legacy_token_key_truncates() {
        let token = "a".repeat(40);
        assert_eq!(legacy_token_key(&token), format!("user_session_{}", "a".repeat(32)));
        assert_eq!(legacy_token_key("short"), "user_session_short");
    }

    #[test]
    fn test_legacy_token_key_counts_chars_not_bytes() {
        let token = "é".repeat(40);
        let key = legacy_token_key(&token);
        assert_eq!(key.chars().count(), "user_session_".len() + 32);
    }
}
