//! Database connection management
//!
//! This module provides the core SQLite connection wrapper used by the store.

use crate::database::error::{Result, StoreError};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// Largest value SQLite's signed 32-bit `user_version` can hold
pub const MAX_USER_VERSION: u32 = i32::MAX as u32;

/// Core database connection wrapper
///
/// `DatabaseConn` is a thin wrapper around a SQLite connection that
/// remembers the backing file (if any) and exposes the `user_version`
/// field the store uses as its schema version.
pub struct DatabaseConn {
    pub conn: Connection,
    path: Option<PathBuf>,
}

impl DatabaseConn {
    /// Open a database at the specified path
    ///
    /// If the path is `None`, an in-memory database is created. The file is
    /// created when missing. The header is read once here so that a file
    /// which is not a SQLite database is reported as an open failure rather
    /// than surfacing later from the first upgrade step.
    pub fn open(path: Option<&Path>) -> Result<Self> {
        let display = path
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| ":memory:".to_string());
        let open_err = |source: rusqlite::Error| StoreError::Open {
            path: display.clone(),
            source,
        };

        let conn = match path {
            Some(p) => Connection::open(p).map_err(open_err)?,
            None => Connection::open_in_memory().map_err(open_err)?,
        };

        let db = DatabaseConn {
            conn,
            path: path.map(Path::to_path_buf),
        };
        db.configure().map_err(open_err)?;
        db.user_version().map_err(|e| match e {
            StoreError::Sqlite(source) => open_err(source),
            other => other,
        })?;
        Ok(db)
    }

    /// Open a database at the specified path (convenience method)
    pub fn open_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open(Some(path.as_ref()))
    }

    /// Create an in-memory database
    pub fn open_in_memory() -> Result<Self> {
        Self::open(None)
    }

    /// Path of the backing file, `None` for in-memory databases
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Configure the connection
    ///
    /// The journal stays in rollback mode so the main file is always
    /// complete after a commit and can be byte-copied for backups.
    fn configure(&self) -> rusqlite::Result<()> {
        self.conn.execute("PRAGMA synchronous=FULL", [])?;
        self.conn.execute("PRAGMA temp_store=MEMORY", [])?;
        self.conn.execute("PRAGMA foreign_keys=ON", [])?;
        Ok(())
    }

    /// Read the stored schema version (`PRAGMA user_version`)
    pub fn user_version(&self) -> Result<u32> {
        let version: i64 = self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))?;
        u32::try_from(version).map_err(|_| StoreError::InvalidVersion(version))
    }

    /// Persist the schema version
    ///
    /// Values above [`MAX_USER_VERSION`] are rejected. PRAGMA statements
    /// cannot take bound parameters, so the integer is embedded as a literal.
    pub fn set_user_version(&self, version: u32) -> Result<()> {
        set_user_version(&self.conn, version)
    }

    /// Execute a SQL statement
    pub fn execute(&self, sql: &str) -> Result<usize> {
        Ok(self.conn.execute(sql, [])?)
    }

    /// Begin an unchecked transaction
    pub fn transaction(&self) -> Result<rusqlite::Transaction<'_>> {
        Ok(self.conn.unchecked_transaction()?)
    }

    /// Check if a table exists in the database
    pub fn table_exists(&self, table_name: &str) -> Result<bool> {
        table_exists(&self.conn, table_name)
    }

    /// Get the row count for a table
    pub fn table_count(&self, table_name: &str) -> Result<u64> {
        let query = format!("SELECT COUNT(*) FROM {}", table_name);
        let count: u64 = self.conn.query_row(&query, [], |row| row.get(0))?;
        Ok(count)
    }
}

pub(crate) fn set_user_version(conn: &Connection, version: u32) -> Result<()> {
    if version > MAX_USER_VERSION {
        return Err(StoreError::InvalidVersion(i64::from(version)));
    }
    conn.execute_batch(&format!("PRAGMA user_version = {}", version))?;
    Ok(())
}

pub(crate) fn table_exists(conn: &Connection, table_name: &str) -> Result<bool> {
    let count: i32 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
        [table_name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}
