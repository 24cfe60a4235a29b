//! Database schema definitions
//!
//! Table and column names for every relation in the store, plus the
//! creation statements built from them. Everything that addresses a column
//! by name goes through these constants so the statements and the queries
//! cannot drift apart.

use serde::{Deserialize, Serialize};

pub const SQLITE_FALSE: i64 = 0;
pub const SQLITE_TRUE: i64 = 1;

/// Integer stored for a boolean column
pub fn to_sqlite_bool(value: bool) -> i64 {
    if value {
        SQLITE_TRUE
    } else {
        SQLITE_FALSE
    }
}

/// Read a boolean column; any non-zero integer is true
pub fn from_sqlite_bool(value: i64) -> bool {
    value != SQLITE_FALSE
}

/// Default rest reminder interval, in minutes
pub const DEFAULT_REST_REMINDER_INTERVAL_MINUTES: i64 = 30;
/// Default breathing reminder interval, in minutes
pub const DEFAULT_BREATHING_REMINDER_INTERVAL_MINUTES: i64 = 10;
/// Default breathing reminder volume, in percent
pub const DEFAULT_BREATHING_REMINDER_VOLUME: i64 = 100;

/// Sentinel id of the single settings row
pub const SINGLE_SETTINGS_ID: i64 = 0;

/// How a breathing reminder is presented
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreathingNotificationType {
    Visual = 0,
    Audio = 1,
    #[default]
    Both = 2,
}

impl BreathingNotificationType {
    pub fn value(self) -> i64 {
        self as i64
    }

    pub fn from_value(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Visual),
            1 => Some(Self::Audio),
            2 => Some(Self::Both),
            _ => None,
        }
    }
}

/// How phrases are picked for successive breathing reminders
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhraseSetup {
    #[default]
    Switch = 0,
    Same = 1,
    Random = 2,
}

impl PhraseSetup {
    pub fn value(self) -> i64 {
        self as i64
    }

    pub fn from_value(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Switch),
            1 => Some(Self::Same),
            2 => Some(Self::Random),
            _ => None,
        }
    }
}

/// Breathing phrases shown during breathing reminders
pub struct PhrasesTable;

impl PhrasesTable {
    pub const NAME: &'static str = "phrases";

    pub const ID: &'static str = "id";
    pub const TITLE: &'static str = "title";
    pub const IB_PHRASE: &'static str = "ib_phrase";
    pub const OB_PHRASE: &'static str = "ob_phrase";
    pub const VERTICAL_ORDER: &'static str = "vertical_order";
    pub const IB_SHORT_PHRASE: &'static str = "ib_short_phrase";
    pub const OB_SHORT_PHRASE: &'static str = "ob_short_phrase";

    pub const COLUMNS: &'static [&'static str] = &[
        Self::ID,
        Self::TITLE,
        Self::IB_PHRASE,
        Self::OB_PHRASE,
        Self::VERTICAL_ORDER,
        Self::IB_SHORT_PHRASE,
        Self::OB_SHORT_PHRASE,
    ];

    pub fn create_sql() -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {} (\
             {} INTEGER PRIMARY KEY, \
             {} TEXT NOT NULL, \
             {} TEXT NOT NULL, \
             {} TEXT NOT NULL, \
             {} INTEGER NOT NULL, \
             {} TEXT NOT NULL DEFAULT '', \
             {} TEXT NOT NULL DEFAULT ''\
             )",
            Self::NAME,
            Self::ID,
            Self::TITLE,
            Self::IB_PHRASE,
            Self::OB_PHRASE,
            Self::VERTICAL_ORDER,
            Self::IB_SHORT_PHRASE,
            Self::OB_SHORT_PHRASE,
        )
    }
}

/// Actions suggested during rest breaks
pub struct RestActionsTable;

impl RestActionsTable {
    pub const NAME: &'static str = "rest_actions";

    pub const ID: &'static str = "id";
    pub const TITLE: &'static str = "title";
    pub const IMAGE_PATH: &'static str = "image_path";
    pub const VERTICAL_ORDER: &'static str = "vertical_order";

    pub const COLUMNS: &'static [&'static str] = &[
        Self::ID,
        Self::TITLE,
        Self::IMAGE_PATH,
        Self::VERTICAL_ORDER,
    ];

    pub fn create_sql() -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {} (\
             {} INTEGER PRIMARY KEY, \
             {} TEXT NOT NULL, \
             {} TEXT NOT NULL, \
             {} INTEGER NOT NULL\
             )",
            Self::NAME,
            Self::ID,
            Self::TITLE,
            Self::IMAGE_PATH,
            Self::VERTICAL_ORDER,
        )
    }
}

/// Singleton settings relation, one row keyed by [`SINGLE_SETTINGS_ID`]
pub struct SettingsTable;

impl SettingsTable {
    pub const NAME: &'static str = "settings";

    pub const ID: &'static str = "id";
    pub const REST_REMINDER_ACTIVE: &'static str = "rest_reminder_active";
    pub const REST_REMINDER_INTERVAL: &'static str = "rest_reminder_interval";
    pub const BREATHING_REMINDER_ACTIVE: &'static str = "breathing_reminder_active";
    pub const BREATHING_REMINDER_INTERVAL: &'static str = "breathing_reminder_interval";
    pub const BREATHING_REMINDER_AUDIO_PATH: &'static str = "breathing_reminder_audio_path";
    pub const BREATHING_REMINDER_VOLUME: &'static str = "breathing_reminder_volume";
    pub const BREATHING_REMINDER_NOTIFICATION_TYPE: &'static str =
        "breathing_reminder_notification_type";
    pub const BREATHING_REMINDER_PHRASE_SETUP: &'static str = "breathing_reminder_phrase_setup";

    pub const COLUMNS: &'static [&'static str] = &[
        Self::ID,
        Self::REST_REMINDER_ACTIVE,
        Self::REST_REMINDER_INTERVAL,
        Self::BREATHING_REMINDER_ACTIVE,
        Self::BREATHING_REMINDER_INTERVAL,
        Self::BREATHING_REMINDER_AUDIO_PATH,
        Self::BREATHING_REMINDER_VOLUME,
        Self::BREATHING_REMINDER_NOTIFICATION_TYPE,
        Self::BREATHING_REMINDER_PHRASE_SETUP,
    ];

    pub fn create_sql() -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {} (\
             {} INTEGER PRIMARY KEY, \
             {} INTEGER NOT NULL DEFAULT {}, \
             {} INTEGER NOT NULL DEFAULT {}, \
             {} INTEGER NOT NULL DEFAULT {}, \
             {} INTEGER NOT NULL DEFAULT {}, \
             {} TEXT NOT NULL DEFAULT '', \
             {} INTEGER NOT NULL DEFAULT {}, \
             {} INTEGER NOT NULL DEFAULT {}, \
             {} INTEGER NOT NULL DEFAULT {}\
             )",
            Self::NAME,
            Self::ID,
            Self::REST_REMINDER_ACTIVE,
            to_sqlite_bool(true),
            Self::REST_REMINDER_INTERVAL,
            DEFAULT_REST_REMINDER_INTERVAL_MINUTES,
            Self::BREATHING_REMINDER_ACTIVE,
            to_sqlite_bool(true),
            Self::BREATHING_REMINDER_INTERVAL,
            DEFAULT_BREATHING_REMINDER_INTERVAL_MINUTES,
            Self::BREATHING_REMINDER_AUDIO_PATH,
            Self::BREATHING_REMINDER_VOLUME,
            DEFAULT_BREATHING_REMINDER_VOLUME,
            Self::BREATHING_REMINDER_NOTIFICATION_TYPE,
            BreathingNotificationType::Both.value(),
            Self::BREATHING_REMINDER_PHRASE_SETUP,
            PhraseSetup::Switch.value(),
        )
    }
}

/// Schema definitions for all tables in the store
pub struct SchemaDefinitions;

impl SchemaDefinitions {
    /// Creation statements, in the order the initial upgrade step runs them
    pub fn create_statements() -> Vec<String> {
        vec![
            PhrasesTable::create_sql(),
            RestActionsTable::create_sql(),
            SettingsTable::create_sql(),
        ]
    }

    /// Names of every table the initial step creates
    pub fn required_tables() -> &'static [&'static str] {
        &[
            PhrasesTable::NAME,
            RestActionsTable::NAME,
            SettingsTable::NAME,
        ]
    }
}
