//! `prestige-session` — session/profile cache for the rental-platform client.
//!
//! One process-wide [`SessionCache`] is the single source of truth for "who
//! is the current user". It fetches the profile at most once per epoch,
//! multicasts the result to any number of subscribers (latest value replayed
//! on subscribe) and discards results that arrive after an invalidation.

pub mod cache;
pub mod http;
pub mod source;
pub mod token;

pub use cache::{SessionCache, SessionError};
pub use http::HttpProfileSource;
pub use source::{FetchError, FetchOutcome, ProfileSource};
pub use token::TokenStore;
