//! Book Service
//! Mission: Book CRUD where the caller is always the owner
//!
//! A book owned by someone else is reported exactly like a missing one.

use crate::auth::models::User;
use crate::books::models::{Book, BookPayload, ListQuery};
use crate::books::store::BookStore;
use crate::error::AppError;
use rusqlite::Connection;
use tracing::{debug, info};

pub fn list(conn: &Connection, owner: &User, query: ListQuery) -> Result<Vec<Book>, AppError> {
    let books = BookStore::list_for_owner(conn, owner.id, query.skip, query.limit)?;
    debug!(
        owner = owner.id,
        skip = query.skip,
        limit = query.limit,
        count = books.len(),
        "Listed books"
    );
    Ok(books)
}

pub fn create(conn: &Connection, owner: &User, payload: &BookPayload) -> Result<Book, AppError> {
    let book = BookStore::insert(conn, owner.id, payload)?;
    info!(owner = owner.id, book = book.id, "📗 Book created");
    Ok(book)
}

pub fn update(
    conn: &Connection,
    owner: &User,
    id: i64,
    payload: &BookPayload,
) -> Result<Book, AppError> {
    let book = BookStore::update_owned(conn, owner.id, id, payload)?.ok_or(AppError::NotFound)?;
    info!(owner = owner.id, book = book.id, "📝 Book updated");
    Ok(book)
}

pub fn delete(conn: &Connection, owner: &User, id: i64) -> Result<(), AppError> {
    if !BookStore::delete_owned(conn, owner.id, id)? {
        return Err(AppError::NotFound);
    }
    info!(owner = owner.id, book = id, "🗑️  Book deleted");
    Ok(())
}
