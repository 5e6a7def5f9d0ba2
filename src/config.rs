//! Process configuration.
//!
//! Every setting is a CLI flag with an environment fallback. `main` loads
//! `.env` files before parsing, so they feed the same variables.

use crate::auth::{JwtHandler, PasswordHasher};
use chrono::Duration;
use clap::{builder::NonEmptyStringValueParser, Parser};
use std::fmt;

#[derive(Parser, Clone)]
#[command(name = "libros")]
#[command(about = "Authenticated book catalogue API")]
pub struct Config {
    /// Path to the SQLite database file
    #[arg(long, env = "DATABASE_PATH", default_value = "libros.db")]
    pub database_path: String,

    /// Secret used to sign access tokens (HS256)
    #[arg(
        long,
        env = "JWT_SECRET",
        hide_env_values = true,
        value_parser = NonEmptyStringValueParser::new()
    )]
    pub jwt_secret: String,

    /// Lifetime of issued access tokens, in minutes
    #[arg(
        long,
        env = "ACCESS_TOKEN_EXPIRE_MINUTES",
        default_value_t = 30,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub access_token_expire_minutes: u32,

    /// bcrypt work factor for password hashes
    #[arg(
        long,
        env = "BCRYPT_COST",
        default_value_t = bcrypt::DEFAULT_COST,
        value_parser = clap::value_parser!(u32).range(4..=31)
    )]
    pub bcrypt_cost: u32,

    /// Address the HTTP server listens on
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8000")]
    pub bind_addr: String,
}

impl Config {
    pub fn token_ttl(&self) -> Duration {
        Duration::minutes(i64::from(self.access_token_expire_minutes))
    }

    pub fn jwt_handler(&self) -> JwtHandler {
        JwtHandler::with_ttl(&self.jwt_secret, self.token_ttl())
    }

    pub fn password_hasher(&self) -> PasswordHasher {
        PasswordHasher::new(self.bcrypt_cost)
    }
}

// The signing secret must never reach the logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_path", &self.database_path)
            .field("jwt_secret", &"<redacted>")
            .field("access_token_expire_minutes", &self.access_token_expire_minutes)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("bind_addr", &self.bind_addr)
            .finish()
    }
}
