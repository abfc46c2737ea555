//! Reading backup documents, including the pre-schema format that only
//! knew about Homebrew.

use crate::core::types::Backend;
use crate::project_identity;
use crate::snapshot::CURRENT_SCHEMA_VERSION;
use crate::snapshot::types::{BackupFile, BackupPackage};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct LegacyBackup {
    #[serde(default)]
    created_at: String,
    #[serde(default)]
    formulas: Vec<LegacyFormula>,
    #[serde(default)]
    casks: Vec<LegacyCask>,
    #[serde(default)]
    taps: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct LegacyFormula {
    name: String,
    version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LegacyCask {
    name: String,
    version: Option<String>,
}

/// Parse a backup document of any known schema into the current one.
pub(super) fn parse_backup(content: &str) -> Result<BackupFile, String> {
    let value: Value = serde_json::from_str(content).map_err(|e| e.to_string())?;
    let Some(object) = value.as_object() else {
        return Err("backup is not a JSON object".to_string());
    };

    let mut backup = if let Some(version) = object.get("schema_version") {
        let version = version
            .as_u64()
            .ok_or_else(|| "schema_version is not a number".to_string())?;
        if version > u64::from(CURRENT_SCHEMA_VERSION) {
            return Err(format!(
                "backup schema {} is newer than this {} supports ({}); run `{} self-update`",
                version,
                project_identity::BINARY_NAME,
                CURRENT_SCHEMA_VERSION,
                project_identity::BINARY_NAME
            ));
        }
        serde_json::from_value::<BackupFile>(value).map_err(|e| e.to_string())?
    } else if object.contains_key("formulas") || object.contains_key("casks") {
        let legacy: LegacyBackup = serde_json::from_value(value).map_err(|e| e.to_string())?;
        migrate_legacy(legacy)
    } else {
        return Err("unrecognized backup format".to_string());
    };

    backup.schema_version = CURRENT_SCHEMA_VERSION;
    backup.normalize();
    Ok(backup)
}

fn migrate_legacy(legacy: LegacyBackup) -> BackupFile {
    let created_at = DateTime::parse_from_rfc3339(&legacy.created_at)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);

    let formulae = legacy.formulas.into_iter().map(|f| BackupPackage {
        name: f.name,
        version: f.version,
        backend: Backend::System,
        cask: false,
    });
    let casks = legacy.casks.into_iter().map(|c| BackupPackage {
        name: c.name,
        version: c.version,
        backend: Backend::System,
        cask: true,
    });

    BackupFile {
        schema_version: CURRENT_SCHEMA_VERSION,
        created_at,
        generator: String::new(),
        platform: None,
        hostname: None,
        node_package_manager: None,
        taps: legacy.taps,
        packages: formulae.chain(casks).collect(),
    }
}
