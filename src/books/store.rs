//! Book Storage
//! Mission: SQL for the `libros` table, always keyed by owner

use crate::books::models::{Book, BookPayload};
use rusqlite::{params, Connection, OptionalExtension, Row};

const BOOK_COLUMNS: &str = "id, nombre, descripcion, propietario_id";

pub struct BookStore;

impl BookStore {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Book> {
        Ok(Book {
            id: row.get(0)?,
            nombre: row.get(1)?,
            descripcion: row.get(2)?,
            propietario_id: row.get(3)?,
        })
    }

    /// Owner's books in insertion order.
    pub fn list_for_owner(
        conn: &Connection,
        owner_id: i64,
        skip: u32,
        limit: u32,
    ) -> rusqlite::Result<Vec<Book>> {
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {BOOK_COLUMNS} FROM libros
             WHERE propietario_id = ?1
             ORDER BY id ASC
             LIMIT ?2 OFFSET ?3"
        ))?;

        let books = stmt
            .query_map(params![owner_id, limit, skip], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(books)
    }

    pub fn find_owned(conn: &Connection, owner_id: i64, id: i64) -> rusqlite::Result<Option<Book>> {
        conn.query_row(
            &format!("SELECT {BOOK_COLUMNS} FROM libros WHERE id = ?1 AND propietario_id = ?2"),
            params![id, owner_id],
            Self::from_row,
        )
        .optional()
    }

    pub fn insert(conn: &Connection, owner_id: i64, payload: &BookPayload) -> rusqlite::Result<Book> {
        conn.execute(
            "INSERT INTO libros (nombre, descripcion, propietario_id) VALUES (?1, ?2, ?3)",
            params![payload.nombre, payload.descripcion, owner_id],
        )?;

        Ok(Book {
            id: conn.last_insert_rowid(),
            nombre: payload.nombre.clone(),
            descripcion: payload.descripcion.clone(),
            propietario_id: owner_id,
        })
    }

    /// Replace name and description. `None` when the owner has no such book.
    pub fn update_owned(
        conn: &Connection,
        owner_id: i64,
        id: i64,
        payload: &BookPayload,
    ) -> rusqlite::Result<Option<Book>> {
        let rows_affected = conn.execute(
            "UPDATE libros SET nombre = ?1, descripcion = ?2
             WHERE id = ?3 AND propietario_id = ?4",
            params![payload.nombre, payload.descripcion, id, owner_id],
        )?;

        if rows_affected == 0 {
            return Ok(None);
        }
        Self::find_owned(conn, owner_id, id)
    }

    /// False when the owner has no such book.
    pub fn delete_owned(conn: &Connection, owner_id: i64, id: i64) -> rusqlite::Result<bool> {
        let rows_affected = conn.execute(
            "DELETE FROM libros WHERE id = ?1 AND propietario_id = ?2",
            params![id, owner_id],
        )?;
        Ok(rows_affected > 0)
    }
}
