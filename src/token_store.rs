//! Session token storage

use std::sync::Arc;

use crate::storage::{MemoryStorage, SessionStorage};
use crate::types::AuthTokens;

const ACCESS_TOKEN_KEY: &str = "access_token";
const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Access and refresh tokens of the current session.
///
/// Cheap to clone; clones share the same underlying storage. Writes are
/// last-write-wins: they either advance the session or clear it.
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn SessionStorage>,
}

impl TokenStore {
    /// Create a token store over any session storage backend
    pub fn new(storage: impl SessionStorage) -> Self {
        Self {
            storage: Arc::new(storage),
        }
    }

    /// Create a token store that only lives as long as the process
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }

    /// Store both tokens, replacing any previous session
    pub fn save(&self, tokens: &AuthTokens) {
        self.storage.set(ACCESS_TOKEN_KEY, &tokens.access_token);
        self.storage.set(REFRESH_TOKEN_KEY, &tokens.refresh_token);
    }

    pub fn access_token(&self) -> Option<String> {
        self.storage.get(ACCESS_TOKEN_KEY)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.storage.get(REFRESH_TOKEN_KEY)
    }

    /// Replace only the access token (after a refresh)
    pub fn set_access_token(&self, token: &str) {
        self.storage.set(ACCESS_TOKEN_KEY, token);
    }

    /// Replace only the refresh token (when the backend rotates it)
    pub fn set_refresh_token(&self, token: &str) {
        self.storage.set(REFRESH_TOKEN_KEY, token);
    }

    /// Check if a session is stored
    pub fn is_logged_in(&self) -> bool {
        self.access_token().is_some() || self.refresh_token().is_some()
    }

    /// Remove both tokens
    pub fn clear(&self) {
        self.storage.remove(ACCESS_TOKEN_KEY);
        self.storage.remove(REFRESH_TOKEN_KEY);
    }
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::in_memory()
    }
}
