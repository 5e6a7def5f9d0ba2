//! Authentication Module
//! Mission: Password hashing, JWT bearer tokens and per-request user resolution

pub mod api;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod service;
pub mod user_store;

pub use jwt::JwtHandler;
pub use middleware::auth_middleware;
pub use password::PasswordHasher;
pub use user_store::UserStore;
