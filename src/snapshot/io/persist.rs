use crate::error::{BertError, Result};
use crate::snapshot::types::BackupFile;
use std::fs;
use std::io::Write;
use std::path::Path;

fn write_failed(path: &Path, reason: impl ToString) -> BertError {
    BertError::BackupWriteFailed {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Serialize, write to a sibling temp file, then rename over `path` so a
/// crash never leaves a half-written backup behind.
pub(super) fn write_backup_atomically(path: &Path, backup: &BackupFile) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| write_failed(path, e))?;

    let content = serde_json::to_string_pretty(backup).map_err(|e| write_failed(path, e))?;

    let _: BackupFile = serde_json::from_str(&content)
        .map_err(|e| write_failed(path, format!("invalid JSON generated: {}", e)))?;

    let file_name = path
        .file_name()
        .ok_or_else(|| write_failed(path, "path has no file name"))?;
    let tmp_path = dir.join(format!(".{}.tmp", file_name.to_string_lossy()));

    let result = (|| -> std::io::Result<()> {
        let mut tmp_file = fs::File::create(&tmp_path)?;
        tmp_file.write_all(content.as_bytes())?;
        tmp_file.write_all(b"\n")?;
        tmp_file.sync_all()?;
        drop(tmp_file);
        fs::rename(&tmp_path, path)
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&tmp_path);
        return Err(write_failed(path, e));
    }

    Ok(())
}
