//! Admin bearer token store.

use domain::services::{KeyValueStore, StorageError};

/// Key under which the admin token is kept.
pub const ADMIN_TOKEN_KEY: &str = "admin_token";

/// Pure accessor for the admin token. Presence is all that is checked.
#[derive(Debug, Clone)]
pub struct AdminTokenStore<S> {
    store: S,
}

impl<S: KeyValueStore> AdminTokenStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The stored token, if any. Empty values and read failures count as
    /// absent.
    pub fn get(&self) -> Option<String> {
        self.store
            .get(ADMIN_TOKEN_KEY)
            .ok()
            .flatten()
            .filter(|token| !token.is_empty())
    }

    pub fn set(&mut self, token: &str) -> Result<(), StorageError> {
        self.store.set(ADMIN_TOKEN_KEY, token)
    }

    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.store.remove(ADMIN_TOKEN_KEY)
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}
