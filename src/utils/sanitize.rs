//! Input validation for names handed to external processes.
//!
//! Backends are spawned without a shell, but a name starting with `-` would
//! still be read as a flag, and a command name with a path separator would
//! escape the PATH lookup.

use crate::error::{BertError, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Homebrew formulae/casks/taps and npm names, scoped ones included.
static PACKAGE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@?[a-zA-Z0-9][a-zA-Z0-9@._+/-]*$").expect("Invalid regex pattern")
});

/// Executable names for the auto-install fallback.
static COMMAND_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9._+-]*$").expect("Invalid regex pattern")
});

/// Versions: `1.2.3`, `3.11`, `latest`, `5.0.0-beta.1`.
static VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9._+-]*$").expect("Invalid regex pattern")
});

const MAX_NAME_LEN: usize = 214;

pub fn validate_package_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(BertError::ConfigError("Package name cannot be empty".to_string()));
    }

    if name.len() > MAX_NAME_LEN {
        return Err(BertError::ConfigError(format!(
            "Package name too long (max {} chars)",
            MAX_NAME_LEN
        )));
    }

    if name.contains("..") || name.contains("//") || name.ends_with('/') {
        return Err(BertError::ConfigError(format!(
            "Package name is not a valid path segment: {}",
            name
        )));
    }

    if !PACKAGE_NAME.is_match(name) {
        return Err(BertError::ConfigError(format!(
            "Package name contains invalid characters: {}",
            name
        )));
    }

    Ok(())
}

pub fn validate_package_names(names: &[String]) -> Result<()> {
    for name in names {
        validate_package_name(name)?;
    }
    Ok(())
}

pub fn validate_version(version: &str) -> Result<()> {
    if !VERSION.is_match(version) {
        return Err(BertError::ConfigError(format!(
            "Invalid version: {}",
            version
        )));
    }
    Ok(())
}

/// A tap is `user/repo`.
pub fn validate_tap(tap: &str) -> Result<()> {
    validate_package_name(tap)?;
    if tap.starts_with('@') || tap.matches('/').count() != 1 {
        return Err(BertError::ConfigError(format!(
            "Invalid tap (expected user/repo): {}",
            tap
        )));
    }
    Ok(())
}

pub fn validate_command_name(command: &str) -> Result<()> {
    if !COMMAND_NAME.is_match(command) {
        return Err(BertError::CommandNotFound(command.to_string()));
    }
    Ok(())
}
