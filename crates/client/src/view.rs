//! Display-state mapping for session-derived widgets.

use tokio::sync::watch;

use prestige_core::Session;

/// Fixed fallback label shown when there is no authenticated session.
pub const GUEST_LABEL: &str = "Guest";

/// What a session-derived widget should render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// Session not resolved yet; render a placeholder. Also used while a
    /// fetch failure leaves the session unresolved — consumers never show an
    /// error dialog for that.
    Loading,
    /// No authenticated session; render the guest label.
    Guest,
    /// Authenticated; render the user's first name.
    Named(String),
}

impl ViewState {
    pub fn from_session(session: &Session) -> Self {
        match session {
            Session::Unknown => ViewState::Loading,
            Session::Unauthenticated => ViewState::Guest,
            Session::Authenticated(profile) => ViewState::Named(profile.first_name.clone()),
        }
    }

    /// Text to render.
    pub fn label(&self) -> &str {
        match self {
            ViewState::Loading => "",
            ViewState::Guest => GUEST_LABEL,
            ViewState::Named(name) => name,
        }
    }
}

/// Read-only greeting consumer (navbar and page-title widgets).
///
/// Subscribes to the shared session stream and re-renders on change. It
/// never calls `ensure_loaded`: consumers read, gates and account flows
/// trigger.
#[derive(Debug)]
pub struct GreetingLabel {
    sessions: watch::Receiver<Session>,
}

impl GreetingLabel {
    pub fn new(sessions: watch::Receiver<Session>) -> Self {
        Self { sessions }
    }

    /// Current display state.
    pub fn state(&self) -> ViewState {
        ViewState::from_session(&self.sessions.borrow())
    }

    /// Wait for the next session change and return the new display state.
    /// Returns `None` when the cache has gone away.
    pub async fn changed(&mut self) -> Option<ViewState> {
        if self.sessions.changed().await.is_err() {
            return None;
        }
        Some(ViewState::from_session(&self.sessions.borrow()))
    }
}
