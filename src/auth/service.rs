//! Authentication Service
//! Mission: Registration, login and bearer-token resolution
//!
//! Every failure on the login and token paths collapses into one error per
//! path, so callers never learn which check failed.

use crate::auth::{
    jwt::JwtHandler,
    models::{LoginRequest, RegisterRequest, TokenResponse, User},
    password::PasswordHasher,
    user_store::UserStore,
};
use crate::db::is_constraint_violation;
use crate::error::AppError;
use rusqlite::Connection;
use tracing::{debug, info, warn};

/// Create a user from an already hashed password. `Conflict` when the email
/// is already registered.
pub fn register(
    conn: &Connection,
    request: &RegisterRequest,
    password_hash: &str,
) -> Result<User, AppError> {
    if UserStore::find_by_email(conn, &request.correo)?.is_some() {
        warn!("Registration rejected, email taken: {}", request.correo);
        return Err(AppError::Conflict);
    }

    UserStore::insert(conn, &request.nombre, &request.correo, password_hash).map_err(|e| {
        if is_constraint_violation(&e) {
            // Lost a race with a concurrent registration.
            AppError::Conflict
        } else {
            e.into()
        }
    })
}

/// Look up the account a login attempt names.
pub fn login_account(conn: &Connection, request: &LoginRequest) -> Result<Option<User>, AppError> {
    info!("🔐 Login attempt: {}", request.correo);
    Ok(UserStore::find_by_email(conn, &request.correo)?)
}

/// Check credentials against the looked-up account and issue a bearer token
/// with the default TTL. Runs outside any session.
pub fn login(
    hasher: &PasswordHasher,
    jwt: &JwtHandler,
    request: &LoginRequest,
    account: Option<User>,
) -> Result<TokenResponse, AppError> {
    let user = account.filter(|user| hasher.verify(&request.contrasena, &user.contrasena));

    let Some(user) = user else {
        warn!("❌ Failed login attempt: {}", request.correo);
        return Err(AppError::InvalidCredentials);
    };

    let token = jwt.issue_default(&user.correo)?;
    info!("✅ Login successful: {} ({})", user.correo, user.id);

    Ok(TokenResponse::bearer(token))
}

/// Resolve a bearer token to its user.
///
/// `None` stands for a missing or malformed `Authorization` header.
pub fn authenticate(
    conn: &Connection,
    jwt: &JwtHandler,
    token: Option<&str>,
) -> Result<User, AppError> {
    let token = token.ok_or_else(|| {
        debug!("Missing bearer token");
        AppError::Unauthenticated
    })?;

    let subject = jwt.verify(token).map_err(|e| {
        debug!("Bearer token rejected: {}", e);
        AppError::Unauthenticated
    })?;

    UserStore::find_by_email(conn, &subject)?.ok_or_else(|| {
        debug!("Bearer token subject has no account: {}", subject);
        AppError::Unauthenticated
    })
}
