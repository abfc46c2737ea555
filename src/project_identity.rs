//! Central project identity contract.
//!
//! Single source of truth for names, directories and release locations.

pub const BINARY_NAME: &str = "bert";
pub const HOME_DIR_NAME: &str = ".bert";
pub const BACKUPS_DIR_NAME: &str = "backups";
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const LOCK_FILE_NAME: &str = "bert.lock";
pub const BACKUP_FILE_PREFIX: &str = "bert_backup_";
pub const ENV_PREFIX: &str = "BERT";
pub const RELEASE_ASSET_PREFIX: &str = "bert";
pub const REPO_SLUG: &str = "michaelessiet/bert-cli";

pub fn env_key(suffix: &str) -> String {
    format!("{}_{}", ENV_PREFIX, suffix)
}

pub fn generator() -> String {
    format!("{} {}", BINARY_NAME, env!("CARGO_PKG_VERSION"))
}

pub fn github_latest_release_api() -> String {
    format!("https://api.github.com/repos/{}/releases/latest", REPO_SLUG)
}

pub fn github_release_api(version: &str) -> String {
    format!(
        "https://api.github.com/repos/{}/releases/tags/v{}",
        REPO_SLUG, version
    )
}

pub fn user_agent() -> String {
    format!("{}-updater", BINARY_NAME)
}
