//! `prestige-core` — domain primitives for the rental-platform client.
//!
//! This crate contains **pure values** only (no IO, no async): user identity,
//! roles, the profile and the session state shared by every other crate.

pub mod id;
pub mod profile;
pub mod role;
pub mod session;

pub use id::UserId;
pub use profile::Profile;
pub use role::Role;
pub use session::Session;
