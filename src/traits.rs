//! Core traits for dependency injection and testability
//!
//! Commands receive an [`AppContext`] instead of reaching for globals, so
//! tests can hand them a mock backend registry and a temporary bert home.

use crate::config::Settings;
use crate::core::types::Backend;
use crate::error::Result;
use crate::packages::{BackendOptions, BackendRegistry, PackageManager};
use crate::snapshot::BackupFile;
use crate::utils::paths::BertPaths;
use crate::utils::platform::Platform;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Trait for backup persistence
pub trait BackupStore: Send + Sync {
    fn write(&self, backup: &BackupFile, path: &Path) -> Result<()>;

    fn read(&self, path: &Path) -> Result<BackupFile>;

    /// Most recent backup in `dir`
    fn latest(&self, dir: &Path) -> Result<PathBuf>;
}

/// Application context holding all dependencies
pub struct AppContext {
    pub paths: BertPaths,
    pub platform: Platform,
    pub settings: Settings,
    pub registry: BackendRegistry,
    pub backup_store: Box<dyn BackupStore>,
    /// `--yes`: never prompt
    pub assume_yes: bool,
    /// Set by the Ctrl-C handler
    pub interrupted: Arc<AtomicBool>,
}

impl AppContext {
    pub fn new(
        paths: BertPaths,
        platform: Platform,
        settings: Settings,
        registry: BackendRegistry,
        backup_store: Box<dyn BackupStore>,
        assume_yes: bool,
    ) -> Self {
        Self {
            paths,
            platform,
            settings,
            registry,
            backup_store,
            assume_yes,
            interrupted: crate::ui::interrupt_flag(),
        }
    }

    /// Create a context for the real machine: bert home on disk, Homebrew
    /// and the configured Node tool.
    pub fn new_filesystem(assume_yes: bool) -> Result<Self> {
        let paths = BertPaths::discover()?;
        let settings = Settings::load(&paths.config_file())?;
        Ok(Self::new(
            paths,
            Platform::current(),
            settings,
            BackendRegistry::default(),
            Box::new(crate::snapshot::io::FilesystemBackupStore),
            assume_yes,
        ))
    }

    pub fn backend_options(&self) -> BackendOptions {
        BackendOptions {
            platform: self.platform,
            node_tool: self.settings.node_package_manager,
            assume_yes: self.assume_yes,
        }
    }

    pub fn manager(&self, backend: Backend) -> Result<Box<dyn PackageManager>> {
        self.registry.create_manager(backend, &self.backend_options())
    }

    pub fn backups_dir(&self) -> Result<PathBuf> {
        self.settings.backups_dir(&self.paths.default_backups_dir())
    }

    pub fn is_interrupted(&self) -> bool {
        self.interrupted.load(Ordering::SeqCst)
    }
}
