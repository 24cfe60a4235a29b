use crate::database::core::{backup_path, RunMode};
use anyhow::{anyhow, Result};
use config::Config;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Default name of the store file inside the data directory
pub const DEFAULT_DB_FILE_NAME: &str = "matc_database.sqlite";

#[derive(Debug, Clone, Serialize)]
pub struct McConfig {
    /// Path to the directory holding the store file and its backups
    pub data_dir: String,

    /// File name of the store inside `data_dir`
    pub db_file_name: String,

    /// Seed test fixtures instead of first-run content
    pub testing: bool,
}

const EMPTY_CONFIG: &str = r#"### mcstore configuration file

### directory holding the store file and its backups
# data_dir = "~/.mcstore"

### file name of the store inside data_dir
# db_file_name = "matc_database.sqlite"

### seed deterministic test data when the store is created
# testing = false
"#;

impl Default for McConfig {
    fn default() -> Self {
        let home_dir = dirs::home_dir()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|| ".".to_string());

        Self {
            data_dir: format!("{}/.mcstore", home_dir),
            db_file_name: DEFAULT_DB_FILE_NAME.to_string(),
            testing: false,
        }
    }
}

impl McConfig {
    /// Function to create and initialize a new configuration
    pub fn new(path: &Option<String>) -> Result<McConfig> {
        let mut builder = Config::builder();

        // Add in toml configuration file
        match path {
            Some(p) => {
                let path = Path::new(p.as_str());
                if path.exists() {
                    let path_str = path
                        .to_str()
                        .ok_or_else(|| anyhow!("Could not convert path to string"))?;
                    builder = builder.add_source(config::File::with_name(path_str));
                } else {
                    std::fs::write(p.as_str(), EMPTY_CONFIG)
                        .map_err(|e| anyhow!("Unable to create config file: {}", e))?;
                }
            }
            None => {
                let mcstore_dir = Self::default_dir()?;
                std::fs::create_dir_all(mcstore_dir.as_str())
                    .map_err(|e| anyhow!("Unable to create mcstore directory: {}", e))?;
                let p = format!("{}/mcstore.toml", mcstore_dir.as_str());
                if Path::new(p.as_str()).exists() {
                    builder = builder.add_source(config::File::with_name(p.as_str()));
                } else {
                    std::fs::write(p.as_str(), EMPTY_CONFIG).map_err(|e| {
                        anyhow!("Unable to create config file {}: {}", p.as_str(), e)
                    })?;
                }
            }
        }

        // Add in settings from the environment (with a prefix of MCSTORE)
        // E.g., `MCSTORE_TESTING=true ./mcstore init` seeds test data
        builder = builder.add_source(config::Environment::with_prefix("MCSTORE"));

        let settings = builder
            .build()
            .map_err(|e| anyhow!("Failed to build configuration: {}", e))?;

        let config = settings
            .try_deserialize::<HashMap<String, String>>()
            .map_err(|e| anyhow!("Failed to deserialize configuration: {}", e))?;

        Self::from_map(&config)
    }

    /// Build a configuration from already merged key/value settings
    pub fn from_map(config: &HashMap<String, String>) -> Result<McConfig> {
        let data_dir = match config.get("data_dir") {
            Some(p) => expand_home(p)?,
            None => Self::default_dir()?,
        };
        std::fs::create_dir_all(data_dir.as_str())
            .map_err(|e| anyhow!("Unable to create data directory '{}': {}", data_dir, e))?;

        let db_file_name = config
            .get("db_file_name")
            .filter(|s| !s.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| DEFAULT_DB_FILE_NAME.to_string());

        let testing = match config.get("testing") {
            Some(v) => parse_bool(v)
                .ok_or_else(|| anyhow!("Invalid value for testing: '{}'", v))?,
            None => false,
        };

        Ok(McConfig {
            data_dir,
            db_file_name,
            testing,
        })
    }

    fn default_dir() -> Result<String> {
        let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
        let home_str = home
            .to_str()
            .ok_or_else(|| anyhow!("Could not convert home directory path to string"))?;
        Ok(format!("{}/.mcstore", home_str))
    }

    /// Path of the store file, or of a backup sibling when a date stamp is given
    pub fn database_path(&self, stamp: Option<&str>) -> PathBuf {
        let path = Path::new(self.data_dir.trim_end_matches('/')).join(&self.db_file_name);
        backup_path(&path, stamp)
    }

    pub fn run_mode(&self) -> RunMode {
        if self.testing {
            RunMode::Testing
        } else {
            RunMode::Normal
        }
    }

    /// Display configuration summary
    pub fn summary(&self) -> String {
        [
            format!("Config File:        {}", Self::config_file_path()),
            format!("Data Directory:     {}", self.data_dir),
            format!("Store Path:         {}", self.database_path(None).display()),
            format!("Testing:            {}", self.testing),
        ]
        .join("\n")
    }

    /// Get the config file path
    pub fn config_file_path() -> String {
        let home_dir = dirs::home_dir()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|| "~".to_string());
        format!("{}/.mcstore/mcstore.toml", home_dir)
    }
}

fn expand_home(path: &str) -> Result<String> {
    match path.strip_prefix("~") {
        Some(rest) => {
            let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
            Ok(format!("{}{}", home.to_string_lossy(), rest))
        }
        None => Ok(path.to_string()),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Format bytes as human-readable size
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
