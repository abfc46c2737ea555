use crate::error::{BertError, Result};
use crate::project_identity;
use crate::utils::paths;
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Held for the whole of a backup or restore; the lock file is removed on drop.
pub struct SnapshotLock {
    file: File,
    path: PathBuf,
}

impl Drop for SnapshotLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
        let _ = FileExt::unlock(&self.file);
    }
}

/// Take the exclusive snapshot lock. The OS releases it if bert dies, so a
/// leftover lock file from a crashed run never blocks the next one.
pub fn acquire_lock(lock_path: &Path) -> Result<SnapshotLock> {
    if let Some(dir) = lock_path.parent() {
        paths::ensure_dir(dir)?;
    }

    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(lock_path)
        .map_err(|e| BertError::IoError {
            path: lock_path.to_path_buf(),
            source: e,
        })?;

    if file.try_lock_exclusive().is_err() {
        let mut holder = String::new();
        let _ = file.read_to_string(&mut holder);
        let holder = match holder.trim() {
            "" => String::new(),
            pid => format!(" (pid {})", pid),
        };
        return Err(BertError::LockError(format!(
            "Another {} backup or restore is currently running{}.\nLock file: {}",
            project_identity::BINARY_NAME,
            holder,
            lock_path.display()
        )));
    }

    // record our pid for whoever hits the lock next
    let _ = file.set_len(0);
    let _ = file.seek(SeekFrom::Start(0));
    let _ = writeln!(file, "{}", std::process::id());

    Ok(SnapshotLock {
        file,
        path: lock_path.to_path_buf(),
    })
}
