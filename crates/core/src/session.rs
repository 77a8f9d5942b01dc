use crate::{Profile, Role};

/// Session state of the running client.
///
/// `Unknown` is the initial state of every cache epoch, before the first
/// profile fetch resolves or fails. A resolved epoch holds either
/// `Unauthenticated` or `Authenticated`; it only returns to `Unknown` through
/// an explicit invalidation.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Session {
    /// No fetch outcome is known yet for the current epoch.
    #[default]
    Unknown,
    /// The server reported that there is no valid session.
    Unauthenticated,
    /// A recognized session with the user's profile.
    Authenticated(Profile),
}

impl Session {
    /// Whether the current epoch has reached a definite answer.
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Session::Unknown)
    }

    pub fn profile(&self) -> Option<&Profile> {
        match self {
            Session::Authenticated(profile) => Some(profile),
            _ => None,
        }
    }

    /// Effective role: `Guest` unless authenticated.
    pub fn role(&self) -> Role {
        self.profile().map(|p| p.role).unwrap_or(Role::Guest)
    }
}
