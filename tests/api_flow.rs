//! HTTP-level tests for the libros API
//!
//! Each test builds the real router over a throwaway SQLite file and drives
//! it with `tower::ServiceExt::oneshot`.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Duration;
use libros_backend::{
    auth::{JwtHandler, PasswordHasher, UserStore},
    build_router, AppState, Database,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tower::ServiceExt;

const SECRET: &str = "integration-test-secret";

struct TestApp {
    router: Router,
    db: Database,
    _temp: NamedTempFile,
}

fn test_app() -> TestApp {
    test_app_with_cost(4)
}

fn test_app_with_cost(bcrypt_cost: u32) -> TestApp {
    let temp = NamedTempFile::new().unwrap();
    let db = Database::open(temp.path()).unwrap();
    let state = AppState::new(
        db.clone(),
        Arc::new(JwtHandler::new(SECRET)),
        PasswordHasher::new(bcrypt_cost),
    );
    TestApp {
        router: build_router(state),
        db,
        _temp: temp,
    }
}

impl TestApp {
    async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn register(&self, nombre: &str, correo: &str, contrasena: &str) -> (StatusCode, Value) {
        self.call(
            Method::POST,
            "/register",
            None,
            Some(json!({ "nombre": nombre, "correo": correo, "contrasena": contrasena })),
        )
        .await
    }

    async fn login(&self, correo: &str, contrasena: &str) -> (StatusCode, Value) {
        self.call(
            Method::POST,
            "/login",
            None,
            Some(json!({ "correo": correo, "contrasena": contrasena })),
        )
        .await
    }

    /// Register and log in, returning the user id and a bearer token.
    async fn account(&self, nombre: &str, correo: &str) -> (i64, String) {
        let (status, user) = self.register(nombre, correo, "secret1").await;
        assert_eq!(status, StatusCode::OK);
        let (status, token) = self.login(correo, "secret1").await;
        assert_eq!(status, StatusCode::OK);
        (
            user["id"].as_i64().unwrap(),
            token["access_token"].as_str().unwrap().to_string(),
        )
    }

    async fn create_book(&self, token: &str, nombre: &str) -> Value {
        let (status, book) = self
            .call(
                Method::POST,
                "/libros",
                Some(token),
                Some(json!({ "nombre": nombre, "descripcion": "d" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        book
    }
}

#[tokio::test]
async fn test_root_hello_world() {
    let app = test_app();
    let (status, body) = app.call(Method::GET, "/", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "Hello": "World" }));
}

#[tokio::test]
async fn test_full_book_lifecycle() {
    let app = test_app();

    let (status, user) = app.register("Ana", "ana@x.com", "secret1").await;
    assert_eq!(status, StatusCode::OK);
    let ana_id = user["id"].as_i64().unwrap();
    assert_eq!(user["nombre"], "Ana");
    assert_eq!(user["correo"], "ana@x.com");
    assert_eq!(user["libros"], json!([]));
    assert!(user.get("contrasena").is_none());

    let (status, login) = app.login("ana@x.com", "secret1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(login["token_type"], "bearer");
    let token = login["access_token"].as_str().unwrap().to_string();

    let (status, book) = app
        .call(
            Method::POST,
            "/libros",
            Some(&token),
            Some(json!({ "nombre": "Libro1", "descripcion": "d" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(book["id"].as_i64().unwrap() > 0);
    assert_eq!(book["propietario_id"].as_i64().unwrap(), ana_id);

    let (status, books) = app.call(Method::GET, "/libros", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(books, json!([book.clone()]));

    let uri = format!("/libros/{}", book["id"]);
    let (status, deleted) = app.call(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted, json!({ "ok": true }));

    let (status, books) = app.call(Method::GET, "/libros", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(books, json!([]));
}

#[tokio::test]
async fn test_duplicate_registration_rejected() {
    let app = test_app();
    let (status, first) = app.register("Ana", "ana@x.com", "secret1").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.register("Otra", "ana@x.com", "another1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "El correo ya está registrado");

    // The original account still logs in with its own password.
    let (status, _) = app.login("ana@x.com", "secret1").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.login("ana@x.com", "another1").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(first["id"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_bad_credentials_rejected_uniformly() {
    let app = test_app();
    app.register("Ana", "ana@x.com", "secret1").await;

    let (status, wrong_password) = app.login("ana@x.com", "wrong-1").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, unknown) = app.login("nadie@x.com", "secret1").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert_eq!(wrong_password, unknown);
    assert_eq!(unknown["detail"], "Credenciales incorrectas");
}

#[tokio::test]
async fn test_invalid_input_is_unprocessable() {
    let app = test_app();

    let (status, body) = app.register("", "no-es-correo", "123").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"].as_array().unwrap().len(), 3);

    let (status, _) = app.login("ana@x.com", "123").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = app
        .call(Method::POST, "/register", None, Some(json!({ "nombre": "Ana" })))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, token) = app.account("Ana", "ana@x.com").await;
    let (status, _) = app
        .call(
            Method::POST,
            "/libros",
            Some(&token),
            Some(json!({ "nombre": "", "descripcion": "d" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = app
        .call(Method::GET, "/libros?skip=-1", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = app
        .call(Method::DELETE, "/libros/abc", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_protected_routes_require_valid_token() {
    let app = test_app();
    app.account("Ana", "ana@x.com").await;
    let expired = JwtHandler::new(SECRET)
        .issue("ana@x.com", Duration::zero())
        .unwrap();
    let forged = JwtHandler::new("not-the-secret")
        .issue_default("ana@x.com")
        .unwrap();

    for token in [None, Some("garbage"), Some(expired.as_str()), Some(forged.as_str())] {
        let (status, body) = app.call(Method::GET, "/libros", token, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{token:?}");
        assert_eq!(body["detail"], "No se pudo validar las credenciales");
    }
}

#[tokio::test]
async fn test_unauthorized_carries_bearer_challenge() {
    let app = test_app();
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/libros")
                .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        "Bearer"
    );
}

#[tokio::test]
async fn test_owners_are_isolated() {
    let app = test_app();
    let (_, ana) = app.account("Ana", "ana@x.com").await;
    let (_, bob) = app.account("Bob", "bob@x.com").await;

    let book = app.create_book(&ana, "De Ana").await;
    let uri = format!("/libros/{}", book["id"]);

    let (status, body) = app
        .call(
            Method::PUT,
            &uri,
            Some(&bob),
            Some(json!({ "nombre": "Robado", "descripcion": "x" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Libro no encontrado");

    let (status, _) = app.call(Method::DELETE, &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, bobs_books) = app.call(Method::GET, "/libros", Some(&bob), None).await;
    assert_eq!(bobs_books, json!([]));

    let (_, anas_books) = app.call(Method::GET, "/libros", Some(&ana), None).await;
    assert_eq!(anas_books, json!([book]));
}

#[tokio::test]
async fn test_update_replaces_book() {
    let app = test_app();
    let (ana_id, token) = app.account("Ana", "ana@x.com").await;
    let book = app.create_book(&token, "Viejo").await;
    let uri = format!("/libros/{}", book["id"]);

    let (status, updated) = app
        .call(
            Method::PUT,
            &uri,
            Some(&token),
            Some(json!({ "nombre": "Nuevo", "descripcion": "otra" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        updated,
        json!({
            "id": book["id"],
            "nombre": "Nuevo",
            "descripcion": "otra",
            "propietario_id": ana_id,
        })
    );

    let (status, _) = app
        .call(
            Method::PUT,
            "/libros/9999",
            Some(&token),
            Some(json!({ "nombre": "a", "descripcion": "b" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_pagination() {
    let app = test_app();
    let (_, token) = app.account("Ana", "ana@x.com").await;
    for n in 0..12 {
        app.create_book(&token, &format!("L{n}")).await;
    }

    let names = |books: &Value| -> Vec<String> {
        books
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["nombre"].as_str().unwrap().to_string())
            .collect()
    };

    let (_, default_page) = app.call(Method::GET, "/libros", Some(&token), None).await;
    assert_eq!(names(&default_page).len(), 10);
    assert_eq!(names(&default_page)[0], "L0");

    let (_, page) = app
        .call(Method::GET, "/libros?skip=10&limit=5", Some(&token), None)
        .await;
    assert_eq!(names(&page), vec!["L10", "L11"]);

    let (_, big) = app
        .call(Method::GET, "/libros?limit=1000", Some(&token), None)
        .await;
    assert_eq!(names(&big).len(), 12);
}

#[tokio::test]
async fn test_deleted_user_loses_access_and_books() {
    let app = test_app();
    let (ana_id, token) = app.account("Ana", "ana@x.com").await;
    app.create_book(&token, "Libro1").await;

    assert!(app
        .db
        .with_session(|tx| UserStore::delete(tx, ana_id))
        .unwrap());

    let (status, _) = app.call(Method::GET, "/libros", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let remaining: i64 = app
        .db
        .with_session(|tx| {
            tx.query_row("SELECT COUNT(*) FROM libros", [], |row| row.get(0))
        })
        .unwrap();
    assert_eq!(remaining, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_registration_concurrent_with_book_writes() {
    // Production-grade cost so hashing spans the concurrent write.
    let app = Arc::new(test_app_with_cost(12));
    let (_, bob) = app.account("Bob", "bob@x.com").await;

    for round in 0..3 {
        let registering = {
            let app = app.clone();
            tokio::spawn(async move {
                app.register("Ana", &format!("ana{round}@x.com"), "secret1")
                    .await
            })
        };
        tokio::time::sleep(std::time::Duration::from_millis(30)).await;
        let book = app.create_book(&bob, &format!("B{round}")).await;

        let (status, body) = registering.await.unwrap();
        assert_eq!(status, StatusCode::OK, "round {round}: {body}");
        assert!(book["id"].as_i64().unwrap() > 0);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_registrations_for_one_email() {
    let app = Arc::new(test_app_with_cost(10));

    let attempts: Vec<_> = (0..2)
        .map(|n| {
            let app = app.clone();
            tokio::spawn(async move {
                app.register(&format!("Ana{n}"), "ana@x.com", "secret1")
                    .await
            })
        })
        .collect();

    let mut statuses = Vec::new();
    for attempt in attempts {
        statuses.push(attempt.await.unwrap().0.as_u16());
    }
    statuses.sort();

    assert_eq!(statuses, vec![200, 400]);
}
