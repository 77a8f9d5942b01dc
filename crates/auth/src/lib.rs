//! `prestige-auth` — navigation authorization over the shared session cache.
//!
//! This crate is intentionally decoupled from routing mechanics: it turns a
//! required role into an allow-or-redirect decision and nothing else.

pub mod gate;

pub use gate::{Access, AuthorizationGate, GateTargets};
