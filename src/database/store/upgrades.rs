//! Registered schema upgrades of the application store
//!
//! Steps are keyed by the version they bring the store to. The first step
//! is numbered 7 because the store's versions continue an older numbering
//! scheme. Later steps make narrow additive changes and back up the store
//! file first, for example:
//!
//! ```rust,ignore
//! fn add_phrase_notes(ctx: &StepContext<'_>) -> Result<()> {
//!     ctx.backup()?;
//!     ctx.conn.execute(
//!         "ALTER TABLE phrases ADD COLUMN notes TEXT NOT NULL DEFAULT ''",
//!         [],
//!     )?;
//!     Ok(())
//! }
//! ```

use crate::database::core::{Migrator, RunMode, SchemaDefinitions, StepContext, UpgradeStep};
use crate::database::error::Result;
use crate::database::store::settings::SettingsRepository;
use tracing::{debug, info};

/// Version reached by the initial schema step
pub const INITIAL_SCHEMA_VERSION: u32 = 7;

/// The application's upgrade steps
pub fn upgrade_steps() -> Result<Migrator> {
    Migrator::from_steps([UpgradeStep::new(
        INITIAL_SCHEMA_VERSION,
        "initial schema and setup",
        initial_schema_and_setup,
    )])
}

/// Create all tables, seed the settings row and populate content
pub fn initial_schema_and_setup(ctx: &StepContext<'_>) -> Result<()> {
    for sql in SchemaDefinitions::create_statements() {
        ctx.conn.execute(&sql, [])?;
    }

    if SettingsRepository::new(ctx.conn).seed_defaults()? {
        debug!("Seeded default settings row");
    }

    match (ctx.options.run_mode, ctx.options.fresh_store) {
        (RunMode::Testing, _) => {
            info!("Testing run, populating store with test data");
            ctx.options.populator.populate_test_data(ctx.conn)?;
        }
        (RunMode::Normal, true) => {
            info!("New store, populating with setup data");
            ctx.options.populator.populate_setup_data(ctx.conn)?;
        }
        (RunMode::Normal, false) => {
            debug!("Existing store, skipping population");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::core::{DatabaseConn, MigrationOptions, Populator};
    use rusqlite::Connection;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingPopulator {
        calls: RefCell<Vec<&'static str>>,
    }

    impl Populator for RecordingPopulator {
        fn populate_test_data(&self, _conn: &Connection) -> Result<()> {
            self.calls.borrow_mut().push("test");
            Ok(())
        }

        fn populate_setup_data(&self, _conn: &Connection) -> Result<()> {
            self.calls.borrow_mut().push("setup");
            Ok(())
        }
    }

    fn run_initial(run_mode: RunMode, fresh_store: bool) -> Vec<&'static str> {
        let db = DatabaseConn::open_in_memory().unwrap();
        let populator = RecordingPopulator::default();
        let options = MigrationOptions {
            run_mode,
            fresh_store,
            populator: &populator,
            ..Default::default()
        };
        upgrade_steps().unwrap().run(&db, &options).unwrap();
        let calls = populator.calls.borrow().clone();
        calls
    }

    #[test]
    fn test_population_selection() {
        assert_eq!(run_initial(RunMode::Testing, true), vec!["test"]);
        assert_eq!(run_initial(RunMode::Testing, false), vec!["test"]);
        assert_eq!(run_initial(RunMode::Normal, true), vec!["setup"]);
        assert!(run_initial(RunMode::Normal, false).is_empty());
    }

    #[test]
    fn test_initial_step_creates_schema() {
        let db = DatabaseConn::open_in_memory().unwrap();
        let report = upgrade_steps()
            .unwrap()
            .run(&db, &MigrationOptions::default())
            .unwrap();

        assert_eq!(report.applied, vec![INITIAL_SCHEMA_VERSION]);
        assert_eq!(db.user_version().unwrap(), INITIAL_SCHEMA_VERSION);
        for table in SchemaDefinitions::required_tables() {
            assert!(db.table_exists(table).unwrap(), "missing table {table}");
        }
        assert_eq!(db.table_count("settings").unwrap(), 1);
    }

    #[test]
    fn test_rerunning_initial_step_keeps_single_settings_row() {
        let db = DatabaseConn::open_in_memory().unwrap();
        let options = MigrationOptions::default();
        upgrade_steps().unwrap().run(&db, &options).unwrap();

        let ctx = StepContext {
            conn: &db.conn,
            db_path: None,
            version: INITIAL_SCHEMA_VERSION,
            options: &options,
        };
        initial_schema_and_setup(&ctx).unwrap();

        assert_eq!(db.table_count("settings").unwrap(), 1);
    }
}
