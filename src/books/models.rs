//! Book Models

use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: u32 = 10;

/// A book (`libros` row). Holds its owner's id, never the owner itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Book {
    pub id: i64,
    pub nombre: String,
    pub descripcion: String,
    pub propietario_id: i64,
}

/// Create and update body. Updates replace both fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookPayload {
    pub nombre: String,
    pub descripcion: String,
}

/// Offset pagination for `GET /libros`
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub skip: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Delete acknowledgement
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteResponse {
    pub ok: bool,
}
