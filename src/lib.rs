//! Libros Backend Library
//!
//! Users register, log in for a bearer token, and manage the books they own.
//! The binary in `main.rs` only wires configuration, logging and the server.

pub mod app;
pub mod auth;
pub mod books;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod validation;

pub use app::{build_router, AppState};
pub use config::Config;
pub use db::Database;
pub use error::AppError;
