//! Authentication Models
//! Mission: Define user and authentication data structures

use crate::books::models::Book;
use serde::{Deserialize, Serialize};

/// User account (`usuarios` row)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub nombre: String,
    pub correo: String,
    #[serde(skip_serializing)]
    pub contrasena: String, // bcrypt hash - never serialize
}

/// JWT Claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>, // subject (user email)
    pub exp: i64,            // expiration timestamp
}

/// Registration request body
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub nombre: String,
    pub correo: String,
    pub contrasena: String,
}

/// Login request body
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub correo: String,
    pub contrasena: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// User response (sanitized)
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub nombre: String,
    pub correo: String,
    pub libros: Vec<Book>,
}

impl UserResponse {
    pub fn from_user(user: &User, libros: Vec<Book>) -> Self {
        Self {
            id: user.id,
            nombre: user.nombre.clone(),
            correo: user.correo.clone(),
            libros,
        }
    }
}
