//! Application Errors
//! Mission: One error type from the store up to the HTTP response

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub const EMAIL_TAKEN: &str = "El correo ya está registrado";
pub const BAD_CREDENTIALS: &str = "Credenciales incorrectas";
pub const UNAUTHENTICATED: &str = "No se pudo validar las credenciales";
pub const BOOK_NOT_FOUND: &str = "Libro no encontrado";

/// A single rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Where the value came from (`body`, `query`, `path`) followed by the field name.
    pub loc: Vec<String>,
    pub msg: String,
}

impl FieldError {
    pub fn new(source: &str, field: &str, msg: impl Into<String>) -> Self {
        Self {
            loc: vec![source.to_string(), field.to_string()],
            msg: msg.into(),
        }
    }

    /// An error about the whole input rather than one field.
    pub fn whole(source: &str, msg: impl Into<String>) -> Self {
        Self {
            loc: vec![source.to_string()],
            msg: msg.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed: {0:?}")]
    Validation(Vec<FieldError>),

    #[error("email already registered")]
    Conflict,

    #[error("invalid login credentials")]
    InvalidCredentials,

    #[error("missing, invalid or expired credentials")]
    Unauthenticated,

    #[error("book not found")]
    NotFound,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        AppError::Internal(anyhow::Error::new(e).context("database error"))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(e: tokio::task::JoinError) -> Self {
        AppError::Internal(anyhow::Error::new(e).context("database worker failed"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            AppError::Validation(fields) => (status, Json(json!({ "detail": fields }))).into_response(),
            AppError::Conflict => (status, Json(json!({ "detail": EMAIL_TAKEN }))).into_response(),
            AppError::InvalidCredentials => {
                (status, Json(json!({ "detail": BAD_CREDENTIALS }))).into_response()
            }
            AppError::Unauthenticated => (
                status,
                [(header::WWW_AUTHENTICATE, "Bearer")],
                Json(json!({ "detail": UNAUTHENTICATED })),
            )
                .into_response(),
            AppError::NotFound => (status, Json(json!({ "detail": BOOK_NOT_FOUND }))).into_response(),
            AppError::Internal(e) => {
                error!("Request failed: {:#}", e);
                (status, Json(json!({ "detail": "Internal server error" }))).into_response()
            }
        }
    }
}
