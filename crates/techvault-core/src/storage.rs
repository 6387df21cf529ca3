//! Durable client-side key/value storage.
//!
//! Stands in for the browser's local storage: the session tokens and
//! the selected organization survive a process restart through it.

use crate::error::VaultResult;

/// Storage key for the JWT access token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Storage key for the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
/// Storage key for the JSON-encoded authenticated user.
pub const USER_KEY: &str = "user";
/// Storage key for the selected organization id.
pub const SELECTED_ORGANIZATION_KEY: &str = "selected_organization_id";

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> VaultResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> VaultResult<()>;
    fn remove(&self, key: &str) -> VaultResult<()>;

    /// Drop every key that belongs to the authenticated session.
    fn clear_session(&self) -> VaultResult<()> {
        self.remove(ACCESS_TOKEN_KEY)?;
        self.remove(REFRESH_TOKEN_KEY)?;
        self.remove(USER_KEY)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> VaultResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> VaultResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> VaultResult<()> {
        (**self).remove(key)
    }
}
