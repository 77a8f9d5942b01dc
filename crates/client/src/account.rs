//! Login/logout flow hooks.
//!
//! The account flow owns the token writes. Every identity change invalidates
//! the session cache so later reads reflect the new identity instead of a
//! stale cached profile.

use prestige_session::{SessionCache, TokenStore};

#[derive(Debug, Clone)]
pub struct AccountFlow {
    tokens: TokenStore,
    cache: SessionCache,
}

impl AccountFlow {
    pub fn new(tokens: TokenStore, cache: SessionCache) -> Self {
        Self { tokens, cache }
    }

    /// Record a successful login.
    pub fn login(&self, token: impl Into<String>) {
        self.tokens.set(token);
        self.cache.invalidate();
        tracing::info!("logged in; session cache invalidated");
    }

    /// Explicit logout.
    pub fn logout(&self) {
        self.tokens.clear();
        self.cache.invalidate();
        tracing::info!("logged out; session cache invalidated");
    }
}
