//! Tether Server
//!
//! Bearer-authenticated HTTP API over [`tether_core`]: key/value state, a
//! searchable event log, goal tracking, and context export.
//!
//! Exposed as a library so the router can be driven directly in tests.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod state;

pub use api::{build_router, serve};
pub use config::Config;
pub use error::ApiError;
pub use state::AppState;
