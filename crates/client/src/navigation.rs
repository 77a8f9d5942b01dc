//! Route table and the navigation interceptor.
//!
//! The interceptor is the only caller of the authorization gate: it resolves
//! each navigation attempt to either the requested path or a substituted
//! redirect target, and never commits the requested path on a redirect.

use prestige_auth::{Access, AuthorizationGate};
use prestige_core::Role;

/// One navigable route and the role it requires (if any).
#[derive(Debug, Clone)]
pub struct RouteSpec {
    pub path: &'static str,
    pub required_role: Option<Role>,
}

/// Outcome of resolving one navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Commit the requested path.
    Commit(String),
    /// Substitute this target for the requested path.
    Redirect(String),
}

/// The served pages and their access requirements.
pub fn default_routes() -> Vec<RouteSpec> {
    vec![
        RouteSpec { path: "/", required_role: None },
        RouteSpec { path: "/vehicles", required_role: None },
        RouteSpec { path: "/forbidden", required_role: None },
        RouteSpec { path: "/not-found", required_role: None },
        RouteSpec { path: "/profile", required_role: Some(Role::User) },
        RouteSpec { path: "/admin", required_role: Some(Role::Admin) },
        RouteSpec { path: "/admin/users", required_role: Some(Role::Admin) },
        RouteSpec { path: "/admin/vehicles", required_role: Some(Role::Admin) },
    ]
}

/// Consults the gate before committing a navigation.
#[derive(Debug, Clone)]
pub struct NavigationInterceptor {
    gate: AuthorizationGate,
    routes: Vec<RouteSpec>,
    not_found: String,
}

impl NavigationInterceptor {
    pub fn new(gate: AuthorizationGate, routes: Vec<RouteSpec>) -> Self {
        Self {
            gate,
            routes,
            not_found: "/not-found".to_string(),
        }
    }

    /// Resolve one navigation attempt.
    ///
    /// Unknown paths go to the not-found page. Routes without a role
    /// requirement commit without consulting the gate (no fetch is forced
    /// for public pages).
    pub async fn resolve(&self, path: &str) -> NavigationOutcome {
        let Some(route) = self.routes.iter().find(|r| r.path == path) else {
            tracing::debug!(path, "unknown route");
            return NavigationOutcome::Redirect(self.not_found.clone());
        };

        match route.required_role {
            None => NavigationOutcome::Commit(path.to_string()),
            Some(required) => match self.gate.authorize(required).await {
                Access::Allow => NavigationOutcome::Commit(path.to_string()),
                Access::Redirect(target) => {
                    tracing::info!(path, %target, "navigation redirected");
                    NavigationOutcome::Redirect(target)
                }
            },
        }
    }
}
