//! Database module
//!
//! This module provides all store functionality for mcstore, organized into:
//!
//! - **core**: SQLite connection wrapper, schema definitions, upgrade steps, backups
//! - **store**: The application store (connection lifecycle, repositories, content)
//!
//! # Architecture
//!
//! ```text
//! database/
//! ├── core/           # Foundation
//! │   ├── connection  # SQLite DatabaseConn wrapper, user_version access
//! │   ├── schema      # Table/column names and creation statements
//! │   ├── migration   # Migrator: sparse, ordered upgrade steps
//! │   └── backup      # Timestamped copies of the store file
//! │
//! └── store/          # Application store
//!     ├── upgrades    # Registered steps (v7: initial schema and setup)
//!     ├── settings    # Singleton settings row
//!     ├── phrases     # Breathing phrases
//!     ├── rest_actions
//!     └── populate    # First-run and test content
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use mcstore::database::{ConnectionManager, RunMode};
//!
//! let mut manager = ConnectionManager::new("/path/to/store.sqlite", RunMode::Normal);
//!
//! // Opens, upgrades and seeds the store on first use
//! let db = manager.get_connection()?;
//! let settings = db.settings().get()?;
//! println!("rest every {} minutes", settings.rest_reminder_interval);
//! ```

pub mod core;
mod error;
pub mod store;

// Core store infrastructure
pub use core::{
    backup_db_file, backup_path, backup_timestamp, BreathingNotificationType, DatabaseConn,
    MigrationOptions, MigrationReport, Migrator, NoopPopulator, PhraseSetup, PhrasesTable,
    Populator, RestActionsTable, RunMode, SchemaDefinitions, SettingsTable, StepContext,
    UpgradeStep,
};

// Errors
pub use error::{Result, StoreError};

// Application store
pub use store::{
    initial_schema_and_setup, shared_connection, upgrade_steps, ConnectionManager,
    DefaultPopulator, McDatabase, NewPhrase, Phrase, PhraseRepository, RestAction,
    RestActionRepository, Settings, SettingsRepository, INITIAL_SCHEMA_VERSION,
};
