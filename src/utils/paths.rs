use crate::error::{BertError, Result};
use crate::project_identity;
use directories::UserDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Filesystem locations bert reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BertPaths {
    pub home: PathBuf,
}

impl BertPaths {
    /// Resolve the bert home: `$BERT_HOME` when set, else `~/.bert`.
    pub fn discover() -> Result<Self> {
        if let Some(custom) = std::env::var_os(project_identity::env_key("HOME"))
            && !custom.is_empty()
        {
            return Ok(Self::at(expand_home(Path::new(&custom))?));
        }

        let user_dirs = UserDirs::new().ok_or_else(|| {
            BertError::ConfigError("Could not determine user home directory".to_string())
        })?;
        Ok(Self::at(
            user_dirs.home_dir().join(project_identity::HOME_DIR_NAME),
        ))
    }

    pub fn at(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    pub fn config_file(&self) -> PathBuf {
        self.home.join(project_identity::CONFIG_FILE_NAME)
    }

    pub fn default_backups_dir(&self) -> PathBuf {
        self.home.join(project_identity::BACKUPS_DIR_NAME)
    }

    pub fn lock_file(&self) -> PathBuf {
        self.home.join(project_identity::LOCK_FILE_NAME)
    }
}

pub fn expand_home(path: &Path) -> Result<PathBuf> {
    let path_str = path.to_string_lossy();

    if !path_str.starts_with('~') {
        return Ok(path.to_path_buf());
    }

    let user_dirs = UserDirs::new().ok_or_else(|| {
        BertError::ConfigError("Could not determine user home directory".to_string())
    })?;
    let home = user_dirs.home_dir();

    if path_str == "~" {
        return Ok(home.to_path_buf());
    }

    let stripped = path_str
        .strip_prefix("~/")
        .ok_or_else(|| BertError::ConfigError(format!("Invalid path format: {}", path_str)))?;

    Ok(home.join(stripped))
}

pub fn ensure_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|e| BertError::IoError {
        path: dir.to_path_buf(),
        source: e,
    })
}
