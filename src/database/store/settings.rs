//! Settings repository
//!
//! The settings relation holds exactly one row, addressed by
//! [`SINGLE_SETTINGS_ID`]. It is seeded by the initial upgrade step and
//! edited by the application's settings UI afterwards.

use crate::database::core::schema::{
    from_sqlite_bool, BreathingNotificationType, PhraseSetup, SettingsTable,
    DEFAULT_BREATHING_REMINDER_INTERVAL_MINUTES, DEFAULT_BREATHING_REMINDER_VOLUME,
    DEFAULT_REST_REMINDER_INTERVAL_MINUTES, SINGLE_SETTINGS_ID,
};
use crate::database::error::{Result, StoreError};
use rusqlite::{Connection, OptionalExtension};
use serde::Serialize;

/// Reminder settings as stored in the singleton row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub rest_reminder_active: bool,
    /// Minutes between rest reminders
    pub rest_reminder_interval: i64,
    pub breathing_reminder_active: bool,
    /// Minutes between breathing reminders
    pub breathing_reminder_interval: i64,
    pub breathing_reminder_audio_path: String,
    /// Percent, 0-100
    pub breathing_reminder_volume: i64,
    pub breathing_reminder_notification_type: BreathingNotificationType,
    pub breathing_reminder_phrase_setup: PhraseSetup,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rest_reminder_active: true,
            rest_reminder_interval: DEFAULT_REST_REMINDER_INTERVAL_MINUTES,
            breathing_reminder_active: true,
            breathing_reminder_interval: DEFAULT_BREATHING_REMINDER_INTERVAL_MINUTES,
            breathing_reminder_audio_path: String::new(),
            breathing_reminder_volume: DEFAULT_BREATHING_REMINDER_VOLUME,
            breathing_reminder_notification_type: BreathingNotificationType::default(),
            breathing_reminder_phrase_setup: PhraseSetup::default(),
        }
    }
}

/// Repository for the singleton settings row
pub struct SettingsRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SettingsRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert the settings row with column defaults unless it already exists
    ///
    /// Returns `true` when a row was inserted.
    pub fn seed_defaults(&self) -> Result<bool> {
        let inserted = self.conn.execute(
            &format!(
                "INSERT OR IGNORE INTO {} ({}) VALUES (?1)",
                SettingsTable::NAME,
                SettingsTable::ID
            ),
            [SINGLE_SETTINGS_ID],
        )?;
        Ok(inserted > 0)
    }

    /// Whether the singleton row is present
    pub fn exists(&self) -> Result<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM {} WHERE {} = ?1",
                    SettingsTable::ID,
                    SettingsTable::NAME,
                    SettingsTable::ID
                ),
                [SINGLE_SETTINGS_ID],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Number of rows in the settings table, 1 for a healthy store
    pub fn count(&self) -> Result<u64> {
        let count: u64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", SettingsTable::NAME),
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Read the settings row
    pub fn get(&self) -> Result<Settings> {
        let sql = format!(
            "SELECT {}, {}, {}, {}, {}, {}, {}, {} FROM {} WHERE {} = ?1",
            SettingsTable::REST_REMINDER_ACTIVE,
            SettingsTable::REST_REMINDER_INTERVAL,
            SettingsTable::BREATHING_REMINDER_ACTIVE,
            SettingsTable::BREATHING_REMINDER_INTERVAL,
            SettingsTable::BREATHING_REMINDER_AUDIO_PATH,
            SettingsTable::BREATHING_REMINDER_VOLUME,
            SettingsTable::BREATHING_REMINDER_NOTIFICATION_TYPE,
            SettingsTable::BREATHING_REMINDER_PHRASE_SETUP,
            SettingsTable::NAME,
            SettingsTable::ID,
        );

        let settings = self
            .conn
            .query_row(&sql, [SINGLE_SETTINGS_ID], |row| {
                Ok(Settings {
                    rest_reminder_active: from_sqlite_bool(row.get(0)?),
                    rest_reminder_interval: row.get(1)?,
                    breathing_reminder_active: from_sqlite_bool(row.get(2)?),
                    breathing_reminder_interval: row.get(3)?,
                    breathing_reminder_audio_path: row.get(4)?,
                    breathing_reminder_volume: row.get(5)?,
                    breathing_reminder_notification_type: BreathingNotificationType::from_value(
                        row.get(6)?,
                    )
                    .unwrap_or_default(),
                    breathing_reminder_phrase_setup: PhraseSetup::from_value(row.get(7)?)
                        .unwrap_or_default(),
                })
            })
            .optional()?;

        settings.ok_or(StoreError::MissingSettings(SINGLE_SETTINGS_ID))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute(&SettingsTable::create_sql(), []).unwrap();
        conn
    }

    #[test]
    fn test_missing_row() {
        let conn = create_test_db();
        let repo = SettingsRepository::new(&conn);

        assert!(!repo.exists().unwrap());
        assert!(matches!(
            repo.get(),
            Err(StoreError::MissingSettings(SINGLE_SETTINGS_ID))
        ));
    }

    #[test]
    fn test_seed_defaults() {
        let conn = create_test_db();
        let repo = SettingsRepository::new(&conn);

        assert!(repo.seed_defaults().unwrap());
        assert!(repo.exists().unwrap());
        assert_eq!(repo.get().unwrap(), Settings::default());
    }

    #[test]
    fn test_seed_twice_keeps_single_row() {
        let conn = create_test_db();
        let repo = SettingsRepository::new(&conn);

        assert!(repo.seed_defaults().unwrap());
        conn.execute("UPDATE settings SET rest_reminder_interval = 45", [])
            .unwrap();
        assert!(!repo.seed_defaults().unwrap());

        assert_eq!(repo.count().unwrap(), 1);
        assert_eq!(repo.get().unwrap().rest_reminder_interval, 45);
    }

    #[test]
    fn test_disabled_reminders_read_as_false() {
        let conn = create_test_db();
        let repo = SettingsRepository::new(&conn);
        repo.seed_defaults().unwrap();
        conn.execute(
            "UPDATE settings SET rest_reminder_active = 0, breathing_reminder_active = 0",
            [],
        )
        .unwrap();

        let settings = repo.get().unwrap();
        assert!(!settings.rest_reminder_active);
        assert!(!settings.breathing_reminder_active);
    }

    #[test]
    fn test_documented_defaults() {
        let settings = Settings::default();
        assert!(settings.rest_reminder_active);
        assert_eq!(settings.rest_reminder_interval, 30);
        assert!(settings.breathing_reminder_active);
        assert_eq!(settings.breathing_reminder_interval, 10);
        assert_eq!(settings.breathing_reminder_volume, 100);
        assert_eq!(
            settings.breathing_reminder_notification_type,
            BreathingNotificationType::Both
        );
        assert_eq!(settings.breathing_reminder_phrase_setup, PhraseSetup::Switch);
    }
}
