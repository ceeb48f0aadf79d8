//! Timestamped sibling backups written before a target file is modified.

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};
use tracing::info;

use crate::error::Error;

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Path of the backup for `path` taken at `at`.
///
/// The last extension is replaced, so `values-lv/strings.xml` becomes
/// `values-lv/strings.backup_20240131_235959.xml`. Two backups within the same
/// second share a name; the later one overwrites the earlier.
pub fn backup_path(path: &Path, at: DateTime<Local>) -> PathBuf {
    path.with_extension(format!("backup_{}.xml", at.format(TIMESTAMP_FORMAT)))
}

/// Copies `path` next to itself. Returns `None` when there is nothing to back up.
pub fn create_backup(path: &Path) -> Result<Option<PathBuf>, Error> {
    if !path.exists() {
        return Ok(None);
    }
    let backup = backup_path(path, Local::now());
    fs::copy(path, &backup)?;
    info!(original = %path.display(), backup = %backup.display(), "backup written");
    Ok(Some(backup))
}
