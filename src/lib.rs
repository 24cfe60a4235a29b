#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! mcstore - local store of the mindfulness-at-the-computer break reminder
//!
//! mcstore owns the single SQLite file the application keeps its phrases,
//! rest actions and reminder settings in. It creates the schema, applies
//! versioned upgrades on open, seeds the settings row and first-run
//! content, and backs the file up before schema changes.
//!
//! # Feature Flags
//!
//! | Feature | Description | Key Dependencies |
//! |---------|-------------|------------------|
//! | `display` | Table formatting with `tabled` | `tabled` |
//! | `cli` | The `mcstore` binary | `clap`, `tracing-subscriber` |
//!
//! # Architecture
//!
//! - **[`database`]**: All store functionality
//!   - `core`: SQLite connection, schema definitions, upgrade steps, backups
//!   - `store`: Connection lifecycle, repositories and seeded content
//! - **[`config`]**: Configuration management
//! - **[`output`]**: Output formats of the command-line tool
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use mcstore::{ConnectionManager, McConfig};
//!
//! let config = McConfig::new(&None)?;
//! let mut manager = ConnectionManager::from_config(&config);
//!
//! // First call creates the file if needed and applies pending upgrades
//! let db = manager.get_connection()?;
//! println!("store at v{}", db.schema_version()?);
//!
//! // Later calls hand out the same handle
//! let settings = manager.get_connection()?.settings().get()?;
//! ```

pub mod config;
pub mod database;
pub mod output;

// =============================================================================
// Configuration
// =============================================================================

pub use config::{format_size, McConfig};

// =============================================================================
// Database Module - Re-export commonly used types
// =============================================================================

pub use database::{
    shared_connection, ConnectionManager, DatabaseConn, McDatabase, MigrationReport, Migrator,
    Populator, RunMode, Settings, StoreError, UpgradeStep, INITIAL_SCHEMA_VERSION,
};

pub use output::OutputFormat;
