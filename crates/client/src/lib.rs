//! `prestige-client` — session consumers and navigation glue.
//!
//! Wires the shared [`SessionCache`](prestige_session::SessionCache) to its
//! read-only consumers (greeting widgets), the navigation interceptor and
//! the login/logout account flow.

pub mod account;
pub mod app;
pub mod config;
pub mod navigation;
pub mod view;

pub use account::AccountFlow;
pub use app::App;
pub use config::ClientConfig;
pub use navigation::{NavigationInterceptor, NavigationOutcome, RouteSpec, default_routes};
pub use view::{GreetingLabel, ViewState};
