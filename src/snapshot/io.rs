mod locking;
mod migration;
mod persist;

use crate::error::{BertError, Result};
use crate::project_identity;
use crate::snapshot::types::BackupFile;
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

pub use locking::{SnapshotLock, acquire_lock};

fn read_failed(path: &Path, reason: impl ToString) -> BertError {
    BertError::RestoreReadFailed {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// `bert_backup_<YYYYmmdd_HHMMSS>.json`
pub fn default_file_name(now: DateTime<Local>) -> String {
    format!(
        "{}{}.json",
        project_identity::BACKUP_FILE_PREFIX,
        now.format("%Y%m%d_%H%M%S")
    )
}

pub fn write_backup(backup: &BackupFile, path: &Path) -> Result<()> {
    let mut backup = backup.clone();
    backup.normalize();
    persist::write_backup_atomically(path, &backup)
}

pub fn read_backup(path: &Path) -> Result<BackupFile> {
    if !path.is_file() {
        return Err(read_failed(path, "file does not exist"));
    }
    let content = fs::read_to_string(path).map_err(|e| read_failed(path, e))?;
    migration::parse_backup(&content).map_err(|reason| read_failed(path, reason))
}

/// Backup files in `dir`, oldest first by modification time.
pub fn list_backups(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(dir).map_err(|e| BertError::IoError {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut backups: Vec<(SystemTime, PathBuf)> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
        .map(|path| {
            let modified = fs::metadata(&path)
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            (modified, path)
        })
        .collect();

    backups.sort();
    Ok(backups.into_iter().map(|(_, path)| path).collect())
}

/// Most recently modified backup in `dir`.
pub fn latest_backup(dir: &Path) -> Result<PathBuf> {
    list_backups(dir)?
        .pop()
        .ok_or_else(|| read_failed(dir, "no backup files found"))
}

/// Filesystem-based backup store implementing the BackupStore trait
pub struct FilesystemBackupStore;

impl crate::traits::BackupStore for FilesystemBackupStore {
    fn write(&self, backup: &BackupFile, path: &Path) -> Result<()> {
        write_backup(backup, path)
    }

    fn read(&self, path: &Path) -> Result<BackupFile> {
        read_backup(path)
    }

    fn latest(&self, dir: &Path) -> Result<PathBuf> {
        latest_backup(dir)
    }
}
