//! Middleware for observability.
//!
//! Authentication lives with the rest of the auth code in `crate::auth`.

pub mod logging;

pub use logging::request_logging;
