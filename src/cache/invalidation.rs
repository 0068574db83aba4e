//! Identity-Scoped Invalidation
//!
//! Lets the authentication layer drop cached session data for one device or
//! for every device of a user, without flushing unrelated entries.

use std::fmt::Display;
use std::panic::{catch_unwind, AssertUnwindSafe};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cache::keys::{
    is_scoped_user_id, legacy_token_key, session_id_key, session_key, user_device_prefix,
};
use crate::cache::{CacheStore, Clock};

// == Session Identity ==
/// Identity recovered from a verified session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    pub user_id: String,
    #[serde(default)]
    pub device_id: Option<String>,
}

impl SessionIdentity {
    pub fn new(user_id: impl Into<String>, device_id: Option<String>) -> Self {
        Self {
            user_id: user_id.into(),
            device_id,
        }
    }
}

// == Token Verifier ==
/// Decode/verify capability handed in by the authentication layer.
///
/// The cache has no idea how tokens are built; it only needs the identity
/// they carry. Any `Fn(&str) -> Result<SessionIdentity, E>` qualifies.
pub trait TokenVerifier {
    type Error: Display;

    fn verify(&self, token: &str) -> Result<SessionIdentity, Self::Error>;
}

impl<F, E> TokenVerifier for F
where
    F: Fn(&str) -> Result<SessionIdentity, E>,
    E: Display,
{
    type Error = E;

    fn verify(&self, token: &str) -> Result<SessionIdentity, E> {
        self(token)
    }
}

impl<V, C: Clock> CacheStore<V, C> {
    // == Invalidate By Token ==
    /// Drops the cached session entries for the identity behind `token`.
    ///
    /// On a verified token this removes `user_session_{user}_{device}` (when
    /// the token names a device) and `user_session_id_{user}`. A token that
    /// fails verification is not an error: it falls back to the legacy
    /// token-prefix key when that is enabled, and otherwise removes nothing.
    /// A verifier that panics is treated the same as one that rejects.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate_by_token<T>(&mut self, token: &str, verifier: &T) -> usize
    where
        T: TokenVerifier + ?Sized,
    {
        let verified = match catch_unwind(AssertUnwindSafe(|| verifier.verify(token))) {
            Ok(verified) => verified,
            Err(_) => {
                warn!("token verifier panicked during invalidation");
                return self.invalidate_legacy_token_key(token);
            }
        };

        match verified {
            Ok(identity) if is_scoped_user_id(&identity.user_id) => {
                let mut removed = 0;
                if let Some(device_id) = identity.device_id.as_deref() {
                    removed += usize::from(self.delete(&session_key(&identity.user_id, device_id)));
                }
                removed += usize::from(self.delete(&session_id_key(&identity.user_id)));

                debug!(
                    user_id = %identity.user_id,
                    device_id = ?identity.device_id,
                    removed,
                    "invalidated session cache by token"
                );
                removed
            }
            Ok(identity) => {
                debug!(
                    user_id = %identity.user_id,
                    "token verified without a usable user id, nothing to invalidate"
                );
                self.invalidate_legacy_token_key(token)
            }
            Err(err) => {
                debug!(error = %err, "token failed verification during invalidation");
                self.invalidate_legacy_token_key(token)
            }
        }
    }

    fn invalidate_legacy_token_key(&mut self, token: &str) -> usize {
        if !self.legacy_token_keys() || token.is_empty() {
            return 0;
        }
        usize::from(self.delete(&legacy_token_key(token)))
    }

    // == Invalidate All Sessions For User ==
    /// Drops every `user_session_{user}_*` key plus `user_session_id_{user}`.
    ///
    /// Used for an administrative logout everywhere. An empty id or `id`
    /// would match other users' keys, so those remove nothing. Returns the
    /// number of entries removed.
    pub fn invalidate_all_sessions_for_user(&mut self, user_id: impl Display) -> usize {
        let user_id = user_id.to_string();
        if !is_scoped_user_id(&user_id) {
            warn!(user_id = %user_id, "refusing to invalidate sessions for an unscoped user id");
            return 0;
        }

        let prefix = user_device_prefix(&user_id);
        let id_key = session_id_key(&user_id);

        let removed = self.remove_where(|key| key == id_key || key.starts_with(&prefix));
        info!(user_id = %user_id, removed, "invalidated all cached sessions for user");
        removed
    }
}
