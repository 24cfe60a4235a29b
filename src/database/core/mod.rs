//! Core database infrastructure
//!
//! This module provides the foundational store components:
//! - `DatabaseConn`: Core SQLite connection wrapper
//! - `schema`: Table and column names and the creation statements
//! - `Migrator`: Versioned upgrade steps tracked in `user_version`
//! - `backup`: Timestamped copies of the store file taken before upgrades

pub mod backup;
mod connection;
mod migration;
pub mod schema;

pub use backup::{backup_db_file, backup_path, backup_timestamp, BACKUP_TIMESTAMP_FORMAT};
pub use connection::{DatabaseConn, MAX_USER_VERSION};
pub use migration::{
    MigrationOptions, MigrationReport, Migrator, NoopPopulator, Populator, RunMode, StepContext,
    UpgradeStep,
};
pub use schema::{
    BreathingNotificationType, PhraseSetup, PhrasesTable, RestActionsTable, SchemaDefinitions,
    SettingsTable,
};
