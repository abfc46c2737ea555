//! Settings Module
//!
//! Persistent user preferences in `~/.bert/config.json`.

use crate::error::{BertError, Result};
use crate::packages::node::NodeTool;
use crate::ui;
use crate::utils::paths;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Tool used for the language backend
    #[serde(default, deserialize_with = "lenient_node_tool")]
    pub node_package_manager: NodeTool,

    /// Overrides `~/.bert/backups`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_dir: Option<PathBuf>,
}

/// Unknown tool names fall back to npm with a warning.
fn lenient_node_tool<'de, D>(deserializer: D) -> std::result::Result<NodeTool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(NodeTool::default());
    };
    match raw.parse() {
        Ok(tool) => Ok(tool),
        Err(_) => {
            ui::warning(&format!(
                "Unknown node_package_manager '{}' in config; using {}",
                raw,
                NodeTool::default()
            ));
            Ok(NodeTool::default())
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            node_package_manager: NodeTool::Npm,
            backup_dir: None,
        }
    }
}

impl Settings {
    /// Load settings from file, writing defaults on first run.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            let settings = Settings::default();
            settings.save(path)?;
            return Ok(settings);
        }

        let content = fs::read_to_string(path).map_err(|e| BertError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Settings::default());
        }

        serde_json::from_str(&content).map_err(|e| {
            BertError::ConfigError(format!("Invalid settings file {}: {}", path.display(), e))
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            paths::ensure_dir(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| BertError::IoError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn set_node_package_manager(&mut self, tool: NodeTool, path: &Path) -> Result<()> {
        self.node_package_manager = tool;
        self.save(path)
    }

    /// Directory holding backup files.
    pub fn backups_dir(&self, default_dir: &Path) -> Result<PathBuf> {
        match &self.backup_dir {
            Some(dir) => paths::expand_home(dir),
            None => Ok(default_dir.to_path_buf()),
        }
    }
}
