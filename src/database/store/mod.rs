//! Application store
//!
//! This module provides the persistent store of the break reminder:
//! - `McDatabase`: an open, fully upgraded store handle
//! - `ConnectionManager`: lazily opens the store once and hands out the handle
//! - `shared_connection`: process-wide handle for callers without an owner
//! - Repositories for settings, phrases and rest actions

mod phrases;
mod populate;
mod rest_actions;
mod settings;
mod upgrades;

pub use phrases::{NewPhrase, Phrase, PhraseRepository};
pub use populate::DefaultPopulator;
pub use rest_actions::{RestAction, RestActionRepository};
pub use settings::{Settings, SettingsRepository};
pub use upgrades::{initial_schema_and_setup, upgrade_steps, INITIAL_SCHEMA_VERSION};

use crate::config::McConfig;
use crate::database::core::{
    DatabaseConn, MigrationOptions, MigrationReport, Migrator, Populator, RunMode,
    SchemaDefinitions,
};
use crate::database::error::Result;
use chrono::Local;
use std::path::{Path, PathBuf};
use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use std::sync::OnceLock;
use tracing::info;

/// Open, upgraded store handle
///
/// Opening runs every pending upgrade step before the handle is returned.
/// The connection is released when the handle is dropped.
pub struct McDatabase {
    db: DatabaseConn,
    report: MigrationReport,
}

impl McDatabase {
    /// Open (creating if absent) the store at `path` and upgrade it
    pub fn open<P: AsRef<Path>>(
        path: P,
        run_mode: RunMode,
        populator: &dyn Populator,
    ) -> Result<Self> {
        let path = path.as_ref();
        let fresh_store = !path.exists();
        let db = DatabaseConn::open_path(path)?;
        info!(
            "Opened store at {} ({})",
            path.display(),
            if fresh_store { "new" } else { "existing" }
        );

        let options = MigrationOptions {
            run_mode,
            fresh_store,
            populator,
            ..Default::default()
        };
        Self::with_migrator(db, &upgrade_steps()?, &options)
    }

    /// Create an upgraded in-memory store (for testing)
    pub fn open_in_memory(run_mode: RunMode, populator: &dyn Populator) -> Result<Self> {
        let db = DatabaseConn::open_in_memory()?;
        let options = MigrationOptions {
            run_mode,
            fresh_store: true,
            populator,
            ..Default::default()
        };
        Self::with_migrator(db, &upgrade_steps()?, &options)
    }

    /// Upgrade an already opened connection with a custom set of steps
    pub fn with_migrator(
        db: DatabaseConn,
        migrator: &Migrator,
        options: &MigrationOptions<'_>,
    ) -> Result<Self> {
        let report = migrator.run(&db, options)?;
        Ok(Self { db, report })
    }

    /// Get the underlying database connection
    pub fn connection(&self) -> &rusqlite::Connection {
        &self.db.conn
    }

    /// Path of the backing file, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.db.path()
    }

    /// Stored schema version
    pub fn schema_version(&self) -> Result<u32> {
        self.db.user_version()
    }

    /// Upgrade steps applied when this handle was opened
    pub fn last_migration(&self) -> &MigrationReport {
        &self.report
    }

    /// Check that every table of the schema exists
    pub fn verify_integrity(&self) -> Result<bool> {
        for table in SchemaDefinitions::required_tables() {
            if !self.db.table_exists(table)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Copy the store file to a timestamped sibling now
    ///
    /// Returns `None` for in-memory stores.
    pub fn backup(&self) -> Result<Option<PathBuf>> {
        match self.db.path() {
            Some(path) => crate::database::core::backup_db_file(path, &Local::now()).map(Some),
            None => Ok(None),
        }
    }

    pub fn settings(&self) -> SettingsRepository<'_> {
        SettingsRepository::new(&self.db.conn)
    }

    pub fn phrases(&self) -> PhraseRepository<'_> {
        PhraseRepository::new(&self.db.conn)
    }

    pub fn rest_actions(&self) -> RestActionRepository<'_> {
        RestActionRepository::new(&self.db.conn)
    }
}

/// Owner of the application's single store handle
///
/// The store is opened and upgraded on the first [`get_connection`] call;
/// later calls return the same handle without checking versions again.
///
/// [`get_connection`]: ConnectionManager::get_connection
pub struct ConnectionManager {
    path: PathBuf,
    run_mode: RunMode,
    populator: Box<dyn Populator>,
    db: Option<McDatabase>,
}

impl ConnectionManager {
    pub fn new<P: Into<PathBuf>>(path: P, run_mode: RunMode) -> Self {
        Self {
            path: path.into(),
            run_mode,
            populator: Box::new(DefaultPopulator),
            db: None,
        }
    }

    pub fn from_config(config: &McConfig) -> Self {
        Self::new(config.database_path(None), config.run_mode())
    }

    /// Replace the population hooks used when the store is first created
    pub fn with_populator(mut self, populator: Box<dyn Populator>) -> Self {
        self.populator = populator;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.db.is_some()
    }

    /// Return the store handle, opening and upgrading it on first use
    pub fn get_connection(&mut self) -> Result<&McDatabase> {
        let db = match self.db.take() {
            Some(db) => db,
            None => McDatabase::open(&self.path, self.run_mode, self.populator.as_ref())?,
        };
        Ok(&*self.db.insert(db))
    }

    /// Release the handle; the next `get_connection` opens the store again
    pub fn close(&mut self) -> Option<McDatabase> {
        self.db.take()
    }
}

static SHARED: OnceLock<ReentrantMutex<McDatabase>> = OnceLock::new();

/// Process-wide store handle
///
/// The first call opens and upgrades the store configured by `config`;
/// every later call returns the same handle and ignores its argument.
/// Handles may be held several at a time on one thread; other threads wait
/// until the holding thread has released all of its handles.
pub fn shared_connection(config: &McConfig) -> Result<ReentrantMutexGuard<'static, McDatabase>> {
    let cell = match SHARED.get() {
        Some(cell) => cell,
        None => {
            let db = McDatabase::open(
                config.database_path(None),
                config.run_mode(),
                &DefaultPopulator,
            )?;
            SHARED.get_or_init(|| ReentrantMutex::new(db))
        }
    };
    Ok(cell.lock())
}
