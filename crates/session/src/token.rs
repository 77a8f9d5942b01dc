use std::sync::{Arc, RwLock};

/// Shared handle to the bearer token for the current login.
///
/// Stands in for the browser storage of the original client: account flows
/// write it, the HTTP profile source reads it. Cloning shares the same slot.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    inner: Arc<RwLock<Option<String>>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeded store (e.g. token restored from the environment).
    pub fn with_token(token: impl Into<String>) -> Self {
        let store = Self::new();
        store.set(token);
        store
    }

    pub fn set(&self, token: impl Into<String>) {
        *self.inner.write().unwrap() = Some(token.into());
    }

    pub fn clear(&self) {
        *self.inner.write().unwrap() = None;
    }

    pub fn get(&self) -> Option<String> {
        self.inner.read().unwrap().clone()
    }

    pub fn is_present(&self) -> bool {
        self.inner.read().unwrap().is_some()
    }
}
