//! SQLite storage bootstrap and schema migration entry points.
//!
//! # Responsibility
//! - Open and configure SQLite connections for PayXpert core.
//! - Apply schema migrations in deterministic order.
//! - Expose the connection provider contract used by callers.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Core code must not read/write payroll data before migrations succeed.
//! - Returned connections enforce foreign keys, so employee removal cascades.

use rusqlite::Connection;
use std::path::PathBuf;
use thiserror::Error;

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    /// The store could not be reached or opened. No retry is attempted.
    #[error("failed to connect to database `{target}`: {source}")]
    Connection {
        target: String,
        source: rusqlite::Error,
    },
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error("database schema version {db_version} is newer than supported {latest_supported}")]
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

/// Where a provider opens its connections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbTarget {
    File(PathBuf),
    Memory,
}

/// Source of ready-to-use store connections.
///
/// Every returned connection has migrations applied and `foreign_keys=ON`.
/// Callers decide whether to retry after a failure.
pub trait ConnectionProvider {
    fn get_connection(&self) -> DbResult<Connection>;
}

/// Connection provider backed by the bundled SQLite engine.
#[derive(Debug, Clone)]
pub struct SqliteConnectionProvider {
    target: DbTarget,
}

impl SqliteConnectionProvider {
    pub fn new(target: DbTarget) -> Self {
        Self { target }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(DbTarget::File(path.into()))
    }

    pub fn in_memory() -> Self {
        Self::new(DbTarget::Memory)
    }
}

impl ConnectionProvider for SqliteConnectionProvider {
    fn get_connection(&self) -> DbResult<Connection> {
        match &self.target {
            DbTarget::File(path) => open_db(path),
            DbTarget::Memory => open_db_in_memory(),
        }
    }
}
