//! HTTP layer of the Upsolve backend.
//!
//! Route modules own their handlers and request/response types; cross-cutting
//! pieces (config, state, errors, middleware) live at the crate root. The
//! server binary composes [`router::router`] with the middleware stack and an
//! [`ApiState`].

pub mod auth;
pub mod codeforces;
pub mod config;
pub mod error;
pub mod gemini;
pub mod middleware;
pub mod router;
pub mod state;
pub mod tracing;
pub mod user;
pub mod validation;

pub use config::ApiConfig;
pub use state::{ApiState, AuthConfig};
