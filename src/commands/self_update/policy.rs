use crate::error::{BertError, Result};
use crate::project_identity;
use std::cmp::Ordering;
use std::env;
use std::path::Path;

/// Who put the running binary where it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum InstallOwner {
    Homebrew,
    Cargo,
    Unknown,
}

impl InstallOwner {
    pub(super) fn is_package_manager(&self) -> bool {
        matches!(self, InstallOwner::Homebrew | InstallOwner::Cargo)
    }
}

pub(super) fn detect_install_owner() -> InstallOwner {
    env::current_exe()
        .map(|exe| owner_of_path(&exe))
        .unwrap_or(InstallOwner::Unknown)
}

pub(super) fn owner_of_path(exe: &Path) -> InstallOwner {
    let path = exe.to_string_lossy().replace('\\', "/").to_ascii_lowercase();
    if path.contains("/cellar/") || path.contains("/homebrew/") || path.contains("/linuxbrew/") {
        InstallOwner::Homebrew
    } else if path.contains("/.cargo/bin/") {
        InstallOwner::Cargo
    } else {
        InstallOwner::Unknown
    }
}

pub(super) fn managed_update_hint(owner: &InstallOwner) -> String {
    match owner {
        InstallOwner::Homebrew => format!(
            "This {} installation is managed by Homebrew. Use: brew upgrade {}",
            project_identity::BINARY_NAME,
            project_identity::BINARY_NAME
        ),
        InstallOwner::Cargo => format!(
            "This {} installation is managed by Cargo. Use: cargo install {} --force",
            project_identity::BINARY_NAME,
            project_identity::BINARY_NAME
        ),
        InstallOwner::Unknown => format!(
            "This {} installation is managed externally. Use your package manager to update.",
            project_identity::BINARY_NAME
        ),
    }
}

pub(super) fn normalize_requested_version(input: &str) -> Result<String> {
    let clean = input.trim().trim_start_matches('v');
    if clean.is_empty() {
        return Err(BertError::Other(
            "Invalid version. Use semantic version like 0.2.1".to_string(),
        ));
    }

    if !clean.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(BertError::Other(
            "Invalid version. Only digits and dots are allowed (example: 0.2.1)".to_string(),
        ));
    }
    Ok(clean.to_string())
}

pub(super) fn current_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

pub(super) fn compare_versions(a: &str, b: &str) -> Ordering {
    match (version_tuple(a), version_tuple(b)) {
        (Some(va), Some(vb)) => va.cmp(&vb),
        _ => a.cmp(b),
    }
}

pub(super) fn version_tuple(input: &str) -> Option<(u64, u64, u64)> {
    let core = input.trim().trim_start_matches('v');
    let core = core.split(['-', '+']).next()?;
    let mut parts = core.split('.');
    let major = parts.next()?.parse::<u64>().ok()?;
    let minor = parts.next().unwrap_or("0").parse::<u64>().ok()?;
    let patch = parts.next().unwrap_or("0").parse::<u64>().ok()?;
    Some((major, minor, patch))
}
