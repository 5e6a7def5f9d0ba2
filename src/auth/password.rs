//! Password Hashing
//! Mission: Store only salted one-way hashes of user passwords

use anyhow::{Context, Result};
use bcrypt::{hash, verify};
use tracing::debug;

/// bcrypt hasher with a fixed work factor.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a plaintext password. Each call draws a fresh salt.
    pub fn hash(&self, plaintext: &str) -> Result<String> {
        hash(plaintext, self.cost).context("Failed to hash password")
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// A malformed hash is a mismatch, not an error.
    pub fn verify(&self, plaintext: &str, hashed: &str) -> bool {
        match verify(plaintext, hashed) {
            Ok(valid) => valid,
            Err(e) => {
                debug!("Stored password hash rejected: {}", e);
                false
            }
        }
    }
}
