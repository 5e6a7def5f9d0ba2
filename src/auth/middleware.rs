//! Authentication Middleware
//! Mission: Protect API endpoints with JWT validation

use crate::app::AppState;
use crate::auth::{models::User, service::authenticate};
use crate::error::AppError;
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};
use tracing::Span;

/// Token from an `Authorization: Bearer <token>` header, if well formed.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|auth| auth.token().to_string())
}

/// Auth middleware that resolves the bearer token to a `User`
///
/// The user is added to the request extensions; handlers take it with
/// `Extension<User>`. Its id is recorded on the request logging span.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(req.headers());
    let jwt = state.jwt.clone();

    let user: User = state
        .db
        .read_session(move |tx| authenticate(tx, &jwt, token.as_deref()))
        .await?;

    Span::current().record("user_id", user.id);
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}
