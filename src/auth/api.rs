//! Authentication API Endpoints
//! Mission: Provide registration and login endpoints

use crate::app::AppState;
use crate::auth::{
    models::{LoginRequest, RegisterRequest, TokenResponse, UserResponse},
    service,
};
use crate::error::AppError;
use crate::extract::ValidJson;
use axum::{extract::State, Json};
use std::sync::Arc;

/// Register endpoint - POST /register
pub async fn register(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<RegisterRequest>,
) -> Result<Json<UserResponse>, AppError> {
    // bcrypt is slow; hash before the session so no lock is held meanwhile.
    let hasher = state.hasher;
    let plaintext = payload.contrasena.clone();
    let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&plaintext)).await??;

    let user = state
        .db
        .session(move |tx| service::register(tx, &payload, &password_hash))
        .await?;

    // A new account owns nothing yet.
    Ok(Json(UserResponse::from_user(&user, Vec::new())))
}

/// Login endpoint - POST /login
pub async fn login(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let payload = Arc::new(payload);
    let request = payload.clone();
    let account = state
        .db
        .read_session(move |tx| service::login_account(tx, &request))
        .await?;

    let hasher = state.hasher;
    let jwt = state.jwt.clone();
    let response =
        tokio::task::spawn_blocking(move || service::login(&hasher, &jwt, &payload, account))
            .await??;

    Ok(Json(response))
}
