//! User Storage
//! Mission: Persist user accounts in the `usuarios` table

use crate::auth::models::User;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::info;

const USER_COLUMNS: &str = "id, nombre, correo, contrasena";

/// Credential store. Stateless; every call runs on the caller's connection
/// (normally the request's transaction).
pub struct UserStore;

impl UserStore {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<User> {
        Ok(User {
            id: row.get(0)?,
            nombre: row.get(1)?,
            correo: row.get(2)?,
            contrasena: row.get(3)?,
        })
    }

    /// Get user by email (exact, case-sensitive match)
    pub fn find_by_email(conn: &Connection, correo: &str) -> rusqlite::Result<Option<User>> {
        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM usuarios WHERE correo = ?1"),
            params![correo],
            Self::from_row,
        )
        .optional()
    }

    /// Insert a user whose password is already hashed.
    pub fn insert(
        conn: &Connection,
        nombre: &str,
        correo: &str,
        password_hash: &str,
    ) -> rusqlite::Result<User> {
        conn.execute(
            "INSERT INTO usuarios (nombre, correo, contrasena) VALUES (?1, ?2, ?3)",
            params![nombre, correo, password_hash],
        )?;

        let user = User {
            id: conn.last_insert_rowid(),
            nombre: nombre.to_string(),
            correo: correo.to_string(),
            contrasena: password_hash.to_string(),
        };

        info!("✅ Created user {} ({})", user.correo, user.id);
        Ok(user)
    }

    /// Delete a user by id. Their books go with them (ON DELETE CASCADE).
    /// Returns false when no such user exists.
    pub fn delete(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
        let rows_affected = conn.execute("DELETE FROM usuarios WHERE id = ?1", params![id])?;

        if rows_affected > 0 {
            info!("🗑️  Deleted user {}", id);
        }
        Ok(rows_affected > 0)
    }
}
