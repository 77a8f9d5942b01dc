//! Application wiring shared by every page.

use std::sync::Arc;

use prestige_auth::{AuthorizationGate, GateTargets};
use prestige_session::{HttpProfileSource, SessionCache, TokenStore};

use crate::account::AccountFlow;
use crate::config::ClientConfig;
use crate::navigation::{NavigationInterceptor, default_routes};
use crate::view::GreetingLabel;

/// Shared client state, created once at startup.
///
/// Holds the one process-wide [`SessionCache`]; everything else is a view
/// over it.
#[derive(Debug, Clone)]
pub struct App {
    pub cache: SessionCache,
    pub tokens: TokenStore,
    pub account: AccountFlow,
    pub navigation: NavigationInterceptor,
}

impl App {
    pub fn from_config(config: &ClientConfig) -> Self {
        let tokens = match &config.auth_token {
            Some(token) => TokenStore::with_token(token.clone()),
            None => TokenStore::new(),
        };
        let source = Arc::new(HttpProfileSource::new(config.api_url.clone(), tokens.clone()));
        let cache = SessionCache::new(source);

        let gate = AuthorizationGate::new(cache.clone(), GateTargets::default());
        let navigation = NavigationInterceptor::new(gate, default_routes());
        let account = AccountFlow::new(tokens.clone(), cache.clone());

        Self {
            cache,
            tokens,
            account,
            navigation,
        }
    }

    /// New read-only greeting widget over the shared session stream.
    pub fn greeting(&self) -> GreetingLabel {
        GreetingLabel::new(self.cache.observe())
    }
}
