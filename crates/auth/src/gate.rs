use prestige_core::{Role, Session};
use prestige_session::SessionCache;

/// Decision for one navigation attempt.
///
/// Terminal: a gate call resolves to exactly one of these, with no retry
/// inside the call. The router must substitute the redirect target and must
/// not commit the originally requested navigation on `Redirect`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Allow,
    Redirect(String),
}

/// Redirect targets for denied navigations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateTargets {
    /// Target when there is no authenticated session.
    pub login: String,
    /// Target when the session is authenticated but under-privileged.
    pub forbidden: String,
}

impl Default for GateTargets {
    fn default() -> Self {
        Self {
            login: "/".to_string(),
            forbidden: "/forbidden".to_string(),
        }
    }
}

/// Authorization gate consulted before a navigation commits.
///
/// Stateless aside from reading the injected shared cache; safe to clone per
/// route.
#[derive(Debug, Clone)]
pub struct AuthorizationGate {
    cache: SessionCache,
    targets: GateTargets,
}

impl AuthorizationGate {
    pub fn new(cache: SessionCache, targets: GateTargets) -> Self {
        Self { cache, targets }
    }

    /// Decide one navigation attempt against `required`.
    ///
    /// Waits for the session to resolve — a still-`Unknown` snapshot must
    /// never produce a decision, or a slow network turns into a false
    /// redirect. Any failure to resolve denies access (fail-closed).
    pub async fn authorize(&self, required: Role) -> Access {
        let session = match self.cache.ensure_loaded().await {
            Ok(session) => session,
            Err(err) => {
                tracing::warn!(%err, "session did not resolve; denying navigation");
                return Access::Redirect(self.targets.login.clone());
            }
        };

        match session {
            Session::Authenticated(profile) if profile.role.satisfies(required) => Access::Allow,
            Session::Authenticated(profile) => {
                tracing::debug!(
                    role = %profile.role,
                    required = %required,
                    "insufficient role for navigation"
                );
                Access::Redirect(self.targets.forbidden.clone())
            }
            Session::Unauthenticated | Session::Unknown => {
                Access::Redirect(self.targets.login.clone())
            }
        }
    }
}
