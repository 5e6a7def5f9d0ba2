//! Book API Endpoints
//! Mission: `/libros` CRUD for the authenticated owner

use crate::app::AppState;
use crate::auth::models::User;
use crate::books::{
    models::{Book, BookPayload, DeleteResponse, ListQuery},
    service,
};
use crate::error::AppError;
use crate::extract::{ValidJson, ValidPath, ValidQuery};
use axum::{extract::State, Extension, Json};

/// GET /libros?skip=&limit=
pub async fn list_books(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ValidQuery(query): ValidQuery<ListQuery>,
) -> Result<Json<Vec<Book>>, AppError> {
    let books = state
        .db
        .read_session(move |tx| service::list(tx, &user, query))
        .await?;
    Ok(Json(books))
}

/// POST /libros
pub async fn create_book(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ValidJson(payload): ValidJson<BookPayload>,
) -> Result<Json<Book>, AppError> {
    let book = state
        .db
        .session(move |tx| service::create(tx, &user, &payload))
        .await?;
    Ok(Json(book))
}

/// PUT /libros/:id
pub async fn update_book(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ValidPath(id): ValidPath<i64>,
    ValidJson(payload): ValidJson<BookPayload>,
) -> Result<Json<Book>, AppError> {
    let book = state
        .db
        .session(move |tx| service::update(tx, &user, id, &payload))
        .await?;
    Ok(Json(book))
}

/// DELETE /libros/:id
pub async fn delete_book(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ValidPath(id): ValidPath<i64>,
) -> Result<Json<DeleteResponse>, AppError> {
    state
        .db
        .session(move |tx| service::delete(tx, &user, id))
        .await?;
    Ok(Json(DeleteResponse { ok: true }))
}
