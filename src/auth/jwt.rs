//! JWT Token Handler
//! Mission: Issue and validate signed, time-limited bearer tokens

use crate::auth::models::Claims;
use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_TTL_MINUTES: i64 = 30;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Why a token was refused. Callers collapse all of these into one
/// unauthenticated response.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,

    #[error("token has no subject")]
    MissingSubject,

    #[error("invalid token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),
}

/// JWT Handler for token operations
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    default_ttl: Duration,
}

impl JwtHandler {
    /// Create a handler signing with `secret` and the default 30 minute TTL.
    pub fn new(secret: &str) -> Self {
        Self::with_ttl(secret, Duration::minutes(DEFAULT_TTL_MINUTES))
    }

    pub fn with_ttl(secret: &str, default_ttl: Duration) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            default_ttl,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Sign a token for `subject` that expires `ttl` from now.
    pub fn issue(&self, subject: &str, ttl: Duration) -> Result<String> {
        let exp = Utc::now()
            .checked_add_signed(ttl)
            .context("Invalid timestamp")?
            .timestamp();

        let claims = Claims {
            sub: Some(subject.to_string()),
            exp,
        };

        debug!("Issuing JWT for {}, expires at {}", subject, exp);

        encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
            .context("Failed to generate JWT")
    }

    /// Sign a token for `subject` with the default TTL.
    pub fn issue_default(&self, subject: &str) -> Result<String> {
        self.issue(subject, self.default_ttl)
    }

    /// Validate signature and expiry and return the subject claim.
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        let decoded = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e),
            },
        )?;

        // The library accepts exp == now; a token is dead from its expiry second on.
        if decoded.claims.exp <= Utc::now().timestamp() {
            return Err(TokenError::Expired);
        }

        match decoded.claims.sub {
            Some(sub) if !sub.is_empty() => Ok(sub),
            _ => Err(TokenError::MissingSubject),
        }
    }
}
