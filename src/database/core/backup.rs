//! Pre-upgrade backups of the store file
//!
//! A backup is a byte copy of the backing file written next to it as
//! `<file-name>_<YYYY-MM-DD_HH-MM-SS>`.

use crate::database::error::{Result, StoreError};
use chrono::{DateTime, TimeZone};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::info;

/// strftime format of the backup suffix
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Format an instant as a backup suffix
pub fn backup_timestamp<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    now.format(BACKUP_TIMESTAMP_FORMAT).to_string()
}

/// Path of the store file, or of a sibling backup when a stamp is given
pub fn backup_path(path: &Path, stamp: Option<&str>) -> PathBuf {
    match stamp {
        None => path.to_path_buf(),
        Some(stamp) => {
            let mut name: OsString = path
                .file_name()
                .map(|n| n.to_os_string())
                .unwrap_or_default();
            name.push("_");
            name.push(stamp);
            path.with_file_name(name)
        }
    }
}

/// Copy the store file to its timestamped sibling
///
/// Returns the path of the written copy.
pub fn backup_db_file<Tz>(path: &Path, now: &DateTime<Tz>) -> Result<PathBuf>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let stamp = backup_timestamp(now);
    let dest = backup_path(path, Some(&stamp));

    let bytes = std::fs::copy(path, &dest).map_err(|source| StoreError::Backup {
        from: path.to_path_buf(),
        to: dest.clone(),
        source,
    })?;

    info!("Backed up {} ({} bytes) to {}", path.display(), bytes, dest.display());
    Ok(dest)
}
