use async_trait::async_trait;
use thiserror::Error;

use prestige_core::Profile;

/// A profile fetch that reached a definite answer.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The server recognized the session and returned the profile.
    Profile(Profile),
    /// The server explicitly reported no valid session (e.g. HTTP 401).
    /// This is a normal value, not an error.
    NoSession,
}

/// A profile fetch that did not reach a definite answer.
///
/// Never cached: the session stays `Unknown` and the caller may retry.
/// `Malformed` is kept separate from `Transient` for logging, but both are
/// treated identically by the cache.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("transient profile fetch failure: {0}")]
    Transient(String),

    #[error("malformed profile payload: {0}")]
    Malformed(String),
}

/// Source of the current user's profile (one network call).
///
/// Implementations are stateless from the cache's point of view: calls are
/// idempotent and safe to repeat. Transport details, per-request retries and
/// backoff live behind this trait.
#[async_trait]
pub trait ProfileSource: Send + Sync + 'static {
    async fn fetch_profile(&self) -> Result<FetchOutcome, FetchError>;
}
