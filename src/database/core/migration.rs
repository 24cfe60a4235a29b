//! Versioned schema upgrades
//!
//! The store's schema version lives in SQLite's `user_version` header field.
//! A [`Migrator`] holds a sparse set of upgrade steps keyed by the version
//! they bring the store to. Running it applies every registered step above
//! the stored version in ascending order. Unregistered version numbers are
//! skipped, so the stored version only ever lands on a registered step.
//!
//! Each step runs in its own transaction together with its version bump:
//! a failed step rolls back and leaves the store at the version of the last
//! step that completed.

use crate::database::core::backup::backup_db_file;
use crate::database::core::connection::{set_user_version, DatabaseConn, MAX_USER_VERSION};
use crate::database::error::{Result, StoreError};
use chrono::{DateTime, Local};
use rusqlite::Connection;
use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Unbounded};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Whether the process runs under tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunMode {
    #[default]
    Normal,
    Testing,
}

/// Content hooks called by the initial upgrade step
///
/// Exactly one of them runs, at most once per store: test fixtures under
/// [`RunMode::Testing`], first-run content when the backing file was just
/// created, neither otherwise.
pub trait Populator {
    fn populate_test_data(&self, conn: &Connection) -> Result<()>;
    fn populate_setup_data(&self, conn: &Connection) -> Result<()>;
}

/// Populator that inserts nothing
pub struct NoopPopulator;

impl Populator for NoopPopulator {
    fn populate_test_data(&self, _conn: &Connection) -> Result<()> {
        Ok(())
    }

    fn populate_setup_data(&self, _conn: &Connection) -> Result<()> {
        Ok(())
    }
}

static NOOP_POPULATOR: NoopPopulator = NoopPopulator;

/// Inputs shared by every step of one migration run
#[derive(Clone, Copy)]
pub struct MigrationOptions<'a> {
    pub run_mode: RunMode,
    /// The backing file did not exist before this process opened it
    pub fresh_store: bool,
    pub populator: &'a dyn Populator,
    pub clock: fn() -> DateTime<Local>,
}

impl Default for MigrationOptions<'_> {
    fn default() -> Self {
        Self {
            run_mode: RunMode::Normal,
            fresh_store: false,
            populator: &NOOP_POPULATOR,
            clock: Local::now,
        }
    }
}

/// What a step sees while it runs
pub struct StepContext<'a> {
    /// Connection with the step's transaction open
    pub conn: &'a Connection,
    pub db_path: Option<&'a Path>,
    pub version: u32,
    pub options: &'a MigrationOptions<'a>,
}

impl StepContext<'_> {
    /// Back up the store file before the step mutates it
    ///
    /// Returns the backup path, or `None` for in-memory stores which have
    /// no file to copy. An error here must abort the step.
    pub fn backup(&self) -> Result<Option<PathBuf>> {
        match self.db_path {
            Some(path) => backup_db_file(path, &(self.options.clock)()).map(Some),
            None => {
                debug!("v{}: in-memory store, nothing to back up", self.version);
                Ok(None)
            }
        }
    }
}

type StepFn = Box<dyn Fn(&StepContext<'_>) -> Result<()>>;

/// One schema upgrade, bringing the store to `version`
pub struct UpgradeStep {
    version: u32,
    name: &'static str,
    apply: StepFn,
}

impl UpgradeStep {
    pub fn new<F>(version: u32, name: &'static str, apply: F) -> Self
    where
        F: Fn(&StepContext<'_>) -> Result<()> + 'static,
    {
        Self {
            version,
            name,
            apply: Box::new(apply),
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl std::fmt::Debug for UpgradeStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpgradeStep")
            .field("version", &self.version)
            .field("name", &self.name)
            .finish()
    }
}

/// Outcome of one migration run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    /// Stored version before the run
    pub from: u32,
    /// Stored version after the run
    pub to: u32,
    /// Versions whose steps ran, in order
    pub applied: Vec<u32>,
}

impl MigrationReport {
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

/// Sparse, ordered registry of upgrade steps
#[derive(Debug, Default)]
pub struct Migrator {
    steps: BTreeMap<u32, UpgradeStep>,
}

impl Migrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a migrator from a list of steps, rejecting duplicate versions
    pub fn from_steps<I>(steps: I) -> Result<Self>
    where
        I: IntoIterator<Item = UpgradeStep>,
    {
        let mut migrator = Self::new();
        for step in steps {
            migrator.register(step)?;
        }
        Ok(migrator)
    }

    /// Register a step
    pub fn register(&mut self, step: UpgradeStep) -> Result<()> {
        if step.version == 0 || step.version > MAX_USER_VERSION {
            return Err(StoreError::InvalidStep(step.version));
        }
        if self.steps.contains_key(&step.version) {
            return Err(StoreError::DuplicateStep(step.version));
        }
        self.steps.insert(step.version, step);
        Ok(())
    }

    /// Highest registered version, 0 when no step is registered
    pub fn target(&self) -> u32 {
        self.steps.keys().next_back().copied().unwrap_or(0)
    }

    /// All registered versions, ascending
    pub fn versions(&self) -> Vec<u32> {
        self.steps.keys().copied().collect()
    }

    /// Versions that would run for a store currently at `current`
    pub fn pending(&self, current: u32) -> Vec<u32> {
        self.steps
            .range((Excluded(current), Unbounded))
            .map(|(v, _)| *v)
            .collect()
    }

    /// Bring the store up to [`Migrator::target`]
    pub fn run(&self, db: &DatabaseConn, options: &MigrationOptions<'_>) -> Result<MigrationReport> {
        let from = db.user_version()?;
        let target = self.target();

        if from > target {
            warn!(
                "Store is at v{} which is newer than the latest known step v{}; leaving it untouched",
                from, target
            );
        }
        if from >= target {
            debug!("Store schema is current at v{}", from);
            return Ok(MigrationReport {
                from,
                to: from,
                applied: Vec::new(),
            });
        }

        info!("Upgrading store schema from v{} to v{}", from, target);

        let mut applied = Vec::new();
        for (&version, step) in self.steps.range((Excluded(from), Unbounded)) {
            self.apply_step(db, step, options)
                .map_err(|e| StoreError::Migration {
                    version,
                    source: Box::new(e),
                })?;
            info!("Applied upgrade step v{} ({})", version, step.name);
            applied.push(version);
        }

        Ok(MigrationReport {
            from,
            to: target,
            applied,
        })
    }

    fn apply_step(
        &self,
        db: &DatabaseConn,
        step: &UpgradeStep,
        options: &MigrationOptions<'_>,
    ) -> Result<()> {
        let tx = db.transaction()?;
        let ctx = StepContext {
            conn: &tx,
            db_path: db.path(),
            version: step.version,
            options,
        };
        (step.apply)(&ctx)?;
        set_user_version(&tx, step.version)?;
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<u32>>>;

    fn recording_step(version: u32, log: &Log) -> UpgradeStep {
        let log = Rc::clone(log);
        UpgradeStep::new(version, "record", move |ctx| {
            log.borrow_mut().push(ctx.version);
            Ok(())
        })
    }

    fn fixed_clock() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
    }

    #[test]
    fn test_target_and_pending() {
        let log = Log::default();
        let migrator =
            Migrator::from_steps([recording_step(10, &log), recording_step(7, &log)]).unwrap();

        assert_eq!(migrator.target(), 10);
        assert_eq!(migrator.versions(), vec![7, 10]);
        assert_eq!(migrator.pending(0), vec![7, 10]);
        assert_eq!(migrator.pending(7), vec![10]);
        assert_eq!(migrator.pending(8), vec![10]);
        assert!(migrator.pending(10).is_empty());
        assert_eq!(Migrator::new().target(), 0);
    }

    #[test]
    fn test_rejects_duplicate_and_zero_versions() {
        let log = Log::default();
        let err = Migrator::from_steps([recording_step(7, &log), recording_step(7, &log)])
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateStep(7)));

        let err = Migrator::from_steps([recording_step(0, &log)]).unwrap_err();
        assert!(matches!(err, StoreError::InvalidStep(0)));
    }

    #[test]
    fn test_rejects_versions_beyond_user_version_range() {
        let log = Log::default();
        let err = Migrator::from_steps([recording_step(3_000_000_000, &log)]).unwrap_err();
        assert!(matches!(err, StoreError::InvalidStep(3_000_000_000)));

        let migrator = Migrator::from_steps([recording_step(MAX_USER_VERSION, &log)]).unwrap();
        let db = DatabaseConn::open_in_memory().unwrap();
        migrator.run(&db, &MigrationOptions::default()).unwrap();
        assert_eq!(db.user_version().unwrap(), MAX_USER_VERSION);

        // A second run sees the stored version and applies nothing
        assert!(migrator
            .run(&db, &MigrationOptions::default())
            .unwrap()
            .is_noop());
        assert_eq!(*log.borrow(), vec![MAX_USER_VERSION]);
    }

    #[test]
    fn test_fresh_store_runs_all_steps_in_order() {
        let db = DatabaseConn::open_in_memory().unwrap();
        let log = Log::default();
        let migrator = Migrator::from_steps([
            recording_step(10, &log),
            recording_step(7, &log),
            recording_step(8, &log),
        ])
        .unwrap();

        let report = migrator.run(&db, &MigrationOptions::default()).unwrap();

        assert_eq!(*log.borrow(), vec![7, 8, 10]);
        assert_eq!(
            report,
            MigrationReport {
                from: 0,
                to: 10,
                applied: vec![7, 8, 10]
            }
        );
        assert_eq!(db.user_version().unwrap(), 10);
    }

    #[test]
    fn test_gap_runs_only_registered_step() {
        let db = DatabaseConn::open_in_memory().unwrap();
        db.set_user_version(7).unwrap();
        let log = Log::default();
        let migrator =
            Migrator::from_steps([recording_step(7, &log), recording_step(10, &log)]).unwrap();

        let report = migrator.run(&db, &MigrationOptions::default()).unwrap();

        assert_eq!(*log.borrow(), vec![10]);
        assert_eq!(report.applied, vec![10]);
        assert_eq!(db.user_version().unwrap(), 10);
    }

    #[test]
    fn test_second_run_is_noop() {
        let db = DatabaseConn::open_in_memory().unwrap();
        let log = Log::default();
        let migrator = Migrator::from_steps([recording_step(7, &log)]).unwrap();

        migrator.run(&db, &MigrationOptions::default()).unwrap();
        let report = migrator.run(&db, &MigrationOptions::default()).unwrap();

        assert!(report.is_noop());
        assert_eq!(*log.borrow(), vec![7]);
        assert_eq!(db.user_version().unwrap(), 7);
    }

    #[test]
    fn test_newer_store_is_left_alone() {
        let db = DatabaseConn::open_in_memory().unwrap();
        db.set_user_version(12).unwrap();
        let log = Log::default();
        let migrator = Migrator::from_steps([recording_step(7, &log)]).unwrap();

        let report = migrator.run(&db, &MigrationOptions::default()).unwrap();

        assert!(report.is_noop());
        assert!(log.borrow().is_empty());
        assert_eq!(db.user_version().unwrap(), 12);
    }

    #[test]
    fn test_failed_step_keeps_previous_version() {
        let db = DatabaseConn::open_in_memory().unwrap();
        let log = Log::default();
        let migrator = Migrator::from_steps([
            recording_step(7, &log),
            UpgradeStep::new(9, "broken", |ctx| {
                ctx.conn.execute("CREATE TABLE half_done (id INTEGER)", [])?;
                ctx.conn.execute("ALTER TABLE missing ADD COLUMN x TEXT", [])?;
                Ok(())
            }),
            recording_step(11, &log),
        ])
        .unwrap();

        let err = migrator.run(&db, &MigrationOptions::default()).unwrap_err();

        assert_eq!(err.failed_version(), Some(9));
        assert_eq!(db.user_version().unwrap(), 7);
        assert!(!db.table_exists("half_done").unwrap());
        assert_eq!(*log.borrow(), vec![7]);

        // Version never goes backwards and the run resumes after the last good step
        let fixed = Migrator::from_steps([
            recording_step(7, &log),
            recording_step(9, &log),
            recording_step(11, &log),
        ])
        .unwrap();
        let report = fixed.run(&db, &MigrationOptions::default()).unwrap();
        assert_eq!(report.applied, vec![9, 11]);
        assert_eq!(db.user_version().unwrap(), 11);
    }

    #[test]
    fn test_backup_taken_before_step() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.db");
        let db = DatabaseConn::open_path(&path).unwrap();
        let migrator = Migrator::from_steps([
            UpgradeStep::new(7, "initial", |ctx| {
                ctx.conn
                    .execute("CREATE TABLE notes (id INTEGER PRIMARY KEY)", [])?;
                Ok(())
            }),
            UpgradeStep::new(8, "add column", |ctx| {
                ctx.backup()?;
                ctx.conn
                    .execute("ALTER TABLE notes ADD COLUMN body TEXT DEFAULT ''", [])?;
                Ok(())
            }),
        ])
        .unwrap();
        let options = MigrationOptions {
            clock: fixed_clock,
            ..Default::default()
        };

        migrator.run(&db, &options).unwrap();

        let backup = dir.path().join("app.db_2024-01-02_03-04-05");
        assert!(backup.exists());
        let old = DatabaseConn::open_path(&backup).unwrap();
        assert_eq!(old.user_version().unwrap(), 7);
        assert!(old.table_exists("notes").unwrap());
    }

    #[test]
    fn test_backup_failure_aborts_step() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.db");
        let db = DatabaseConn::open_path(&path).unwrap();
        db.execute("CREATE TABLE notes (id INTEGER PRIMARY KEY)")
            .unwrap();
        db.set_user_version(7).unwrap();

        // A directory squatting on the backup name makes the copy fail
        std::fs::create_dir(dir.path().join("app.db_2024-01-02_03-04-05")).unwrap();

        let migrator = Migrator::from_steps([UpgradeStep::new(8, "add column", |ctx| {
            ctx.backup()?;
            ctx.conn
                .execute("ALTER TABLE notes ADD COLUMN body TEXT DEFAULT ''", [])?;
            Ok(())
        })])
        .unwrap();
        let options = MigrationOptions {
            clock: fixed_clock,
            ..Default::default()
        };

        let err = migrator.run(&db, &options).unwrap_err();

        assert!(err.is_backup_failure());
        assert_eq!(err.failed_version(), Some(8));
        assert_eq!(db.user_version().unwrap(), 7);
        let columns: i64 = db
            .conn
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('notes') WHERE name = 'body'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(columns, 0);
    }

    #[test]
    fn test_in_memory_backup_is_noop() {
        let db = DatabaseConn::open_in_memory().unwrap();
        let migrator = Migrator::from_steps([UpgradeStep::new(3, "backup only", |ctx| {
            assert_eq!(ctx.backup()?, None);
            Ok(())
        })])
        .unwrap();

        migrator.run(&db, &MigrationOptions::default()).unwrap();
        assert_eq!(db.user_version().unwrap(), 3);
    }
}
