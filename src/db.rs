//! Relational Store
//! Mission: Own the SQLite schema and hand out one transaction per request
//!
//! Every unit of work opens its own connection, runs inside a transaction and
//! commits only when the work returns `Ok`. On `Err` the
//! transaction is rolled back and the connection dropped. Keep slow work
//! (password hashing) outside a session; locks are held until it ends.

use crate::error::AppError;
use anyhow::{Context, Result};
use rusqlite::{Connection, ErrorCode, Transaction, TransactionBehavior};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS usuarios (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    nombre TEXT NOT NULL,
    correo TEXT NOT NULL UNIQUE,
    contrasena TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS libros (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    nombre TEXT NOT NULL,
    descripcion TEXT NOT NULL,
    propietario_id INTEGER NOT NULL REFERENCES usuarios(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_libros_propietario ON libros(propietario_id, id);
"#;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle to the SQLite database file. Cheap to clone.
#[derive(Clone, Debug)]
pub struct Database {
    path: Arc<str>,
}

impl Database {
    /// Open (creating if needed) the database at `path` and apply the schema.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_string_lossy().to_string();
        let db = Self { path: path.into() };

        let conn = db.connect().context("open database")?;
        conn.execute_batch(SCHEMA_SQL)
            .context("Failed to apply schema")?;

        info!("📚 Database ready at {}", db.path);
        Ok(db)
    }

    fn connect(&self) -> rusqlite::Result<Connection> {
        let conn = Connection::open(&*self.path)?;
        // SQLite leaves foreign keys (and so ON DELETE CASCADE) off per connection.
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(conn)
    }

    /// Run `work` inside a fresh write transaction on the calling thread.
    ///
    /// The write lock is taken up front (`BEGIN IMMEDIATE`), so concurrent
    /// writers queue on the busy timeout instead of failing on lock upgrade.
    pub fn with_session<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, E>,
        E: From<rusqlite::Error>,
    {
        self.run(TransactionBehavior::Immediate, work)
    }

    /// Run read-only `work` inside a fresh deferred transaction.
    pub fn with_read_session<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, E>,
        E: From<rusqlite::Error>,
    {
        self.run(TransactionBehavior::Deferred, work)
    }

    fn run<T, E, F>(&self, behavior: TransactionBehavior, work: F) -> Result<T, E>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, E>,
        E: From<rusqlite::Error>,
    {
        let mut conn = self.connect()?;
        let tx = conn.transaction_with_behavior(behavior)?;

        match work(&tx) {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback() {
                    warn!("Rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }

    /// `with_session` on tokio's blocking pool.
    pub async fn session<T, F>(&self, work: F) -> Result<T, AppError>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, AppError> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.clone();
        tokio::task::spawn_blocking(move || db.with_session(work)).await?
    }

    /// `with_read_session` on tokio's blocking pool.
    pub async fn read_session<T, F>(&self, work: F) -> Result<T, AppError>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, AppError> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.clone();
        tokio::task::spawn_blocking(move || db.with_read_session(work)).await?
    }
}

/// True when `err` is a UNIQUE (or other) constraint violation.
pub fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}
