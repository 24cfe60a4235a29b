//! Error types for the store layer

use std::path::PathBuf;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors raised while opening, upgrading or backing up the store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing file could not be created, opened or read
    #[error("failed to open store at '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    /// An upgrade step failed; the store stays at the version before it
    #[error("upgrade step v{version} failed: {source}")]
    Migration {
        version: u32,
        #[source]
        source: Box<StoreError>,
    },

    /// The pre-upgrade backup copy could not be written
    #[error("failed to back up '{}' to '{}': {source}", from.display(), to.display())]
    Backup {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Two upgrade steps were registered for the same version
    #[error("upgrade step v{0} registered twice")]
    DuplicateStep(u32),

    /// Upgrade steps must target a version in `1..=i32::MAX`
    #[error("upgrade step version {0} is invalid, versions range from 1 to {max}", max = i32::MAX)]
    InvalidStep(u32),

    /// The stored schema version does not fit SQLite's signed `user_version`
    #[error("schema version {0} is out of range (0 to {max})", max = i32::MAX)]
    InvalidVersion(i64),

    /// The settings row was expected but is missing
    #[error("settings row {0} is missing")]
    MissingSettings(i64),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

impl StoreError {
    /// Version of the failed upgrade step, if this is a migration failure
    pub fn failed_version(&self) -> Option<u32> {
        match self {
            StoreError::Migration { version, .. } => Some(*version),
            _ => None,
        }
    }

    /// Whether the root cause is a failed backup copy
    pub fn is_backup_failure(&self) -> bool {
        match self {
            StoreError::Backup { .. } => true,
            StoreError::Migration { source, .. } => source.is_backup_failure(),
            _ => false,
        }
    }
}
