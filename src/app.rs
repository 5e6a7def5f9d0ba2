//! Router and shared application state.

use crate::auth::{api as auth_api, auth_middleware, JwtHandler, PasswordHasher};
use crate::books::api as books_api;
use crate::db::Database;
use crate::middleware::request_logging;
use axum::{
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Application state shared by every request. Nothing in here is mutable.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: Arc<JwtHandler>,
    pub hasher: PasswordHasher,
}

impl AppState {
    pub fn new(db: Database, jwt: Arc<JwtHandler>, hasher: PasswordHasher) -> Self {
        Self { db, jwt, hasher }
    }
}

async fn root() -> Json<Value> {
    Json(json!({ "Hello": "World" }))
}

/// Build the full HTTP surface.
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(root))
        .route("/register", post(auth_api::register))
        .route("/login", post(auth_api::login));

    let protected_routes = Router::new()
        .route(
            "/libros",
            get(books_api::list_books).post(books_api::create_book),
        )
        .route(
            "/libros/:id",
            put(books_api::update_book).delete(books_api::delete_book),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn(request_logging))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
