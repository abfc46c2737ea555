use crate::error::{BertError, Result};
use crate::project_identity;
use reqwest::blocking::Client;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

pub(super) fn download_bytes(client: &Client, url: &str) -> Result<Vec<u8>> {
    let response = client
        .get(url)
        .send()
        .map_err(|e| BertError::RemoteFetchError(e.to_string()))?;
    if !response.status().is_success() {
        return Err(BertError::RemoteFetchError(format!(
            "HTTP {} for {}",
            response.status(),
            url
        )));
    }
    let body = response
        .bytes()
        .map_err(|e| BertError::RemoteFetchError(e.to_string()))?;
    Ok(body.to_vec())
}

pub(super) fn compute_sha256(path: &Path) -> Result<String> {
    use sha2::{Digest, Sha256};

    let mut file = fs::File::open(path).map_err(|e| BertError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).map_err(|e| BertError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(format!("{:x}", hasher.finalize()))
}

pub(super) fn verify_checksum(asset: &str, expected: &str, actual: &str) -> Result<()> {
    if expected.eq_ignore_ascii_case(actual) {
        return Ok(());
    }

    Err(BertError::Other(format!(
        "Checksum verification failed for {} (expected {}, got {})",
        asset, expected, actual
    )))
}

/// Staging path for the downloaded binary, next to the one it replaces.
pub(super) fn staging_path(current_exe: &Path) -> PathBuf {
    current_exe.with_extension(format!("{}.new", project_identity::BINARY_NAME))
}

pub(super) fn create_backup_binary(current_exe: &Path) -> Result<PathBuf> {
    let backup = current_exe.with_extension(format!("{}.backup", project_identity::BINARY_NAME));
    fs::copy(current_exe, &backup).map_err(|e| BertError::IoError {
        path: backup.clone(),
        source: e,
    })?;
    Ok(backup)
}

pub(super) fn write_executable(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).map_err(|e| BertError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    }
    Ok(())
}

pub(super) fn dest_dir_is_writable(dir: &Path) -> bool {
    let check_file = dir.join(format!(".{}-write-check", project_identity::BINARY_NAME));
    let created = fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&check_file)
        .is_ok();
    let _ = fs::remove_file(check_file);
    created
}

/// Put `new_bin` in place of `current_exe`, escalating with sudo when the
/// install directory is not writable.
pub(super) fn install_binary(new_bin: &Path, current_exe: &Path) -> Result<()> {
    let dest_dir = current_exe.parent().ok_or_else(|| {
        BertError::Other(format!(
            "Cannot resolve install directory for {}",
            current_exe.display()
        ))
    })?;

    if dest_dir_is_writable(dest_dir) {
        return replace_in_place(new_bin, current_exe);
    }

    sudo_install(new_bin, current_exe)
}

#[cfg(windows)]
fn replace_in_place(new_bin: &Path, current_exe: &Path) -> Result<()> {
    // a running executable can be renamed but not overwritten
    let old_exe = current_exe.with_extension("old.exe");
    let _ = fs::remove_file(&old_exe);
    fs::rename(current_exe, &old_exe)?;
    fs::rename(new_bin, current_exe)?;
    let _ = fs::remove_file(old_exe);
    Ok(())
}

#[cfg(not(windows))]
fn replace_in_place(new_bin: &Path, current_exe: &Path) -> Result<()> {
    fs::rename(new_bin, current_exe).map_err(|e| BertError::IoError {
        path: current_exe.to_path_buf(),
        source: e,
    })
}

fn sudo_install(source: &Path, current_exe: &Path) -> Result<()> {
    let status = Command::new("sudo")
        .arg("install")
        .arg("-m")
        .arg("755")
        .arg(source)
        .arg(current_exe)
        .status()
        .map_err(|e| BertError::SystemCommandFailed {
            command: format!(
                "sudo install -m 755 {} {}",
                source.display(),
                current_exe.display()
            ),
            reason: e.to_string(),
        })?;
    if !status.success() {
        return Err(BertError::Other(
            "Failed to install updated binary with sudo".to_string(),
        ));
    }
    Ok(())
}

pub(super) fn restore_from_backup(backup: &Path, current_exe: &Path) -> Result<()> {
    let writable = current_exe
        .parent()
        .is_some_and(dest_dir_is_writable);

    if writable {
        fs::copy(backup, current_exe)?;
        return Ok(());
    }
    sudo_install(backup, current_exe)
}

/// `<exe> --version` must succeed after the swap.
pub(super) fn smoke_check(current_exe: &Path) -> Result<bool> {
    let output = Command::new(current_exe)
        .arg("--version")
        .output()
        .map_err(|e| BertError::SystemCommandFailed {
            command: format!("{} --version", current_exe.display()),
            reason: e.to_string(),
        })?;
    Ok(output.status.success())
}
