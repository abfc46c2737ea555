mod install_ops;
mod policy;
mod release;

use crate::error::{BertError, Result};
use crate::project_identity;
use crate::ui as output;
use policy::{
    compare_versions, current_version, detect_install_owner, managed_update_hint,
    normalize_requested_version,
};
use std::env;
use std::fs;

pub struct SelfUpdateOptions {
    pub check: bool,
    pub version: Option<String>,
    pub yes: bool,
}

pub fn run(options: SelfUpdateOptions) -> Result<()> {
    let current = current_version();
    let requested = options
        .version
        .as_deref()
        .map(normalize_requested_version)
        .transpose()?;

    output::info(&format!("Current version: {}", current));

    let client = release::http_client()?;
    let release = release::fetch_release(&client, requested.as_deref())?;
    let target = release.version().to_string();
    output::info(&format!("Latest version: {}", target));

    let newer = compare_versions(&target, &current).is_gt();

    if options.check {
        if newer {
            output::warning(&format!("Update available: {} -> {}", current, target));
        } else {
            output::success(&format!("Already up-to-date ({})", current));
        }
        return Ok(());
    }

    // an explicit version may be a downgrade
    if requested.is_none() && !newer {
        output::success(&format!(
            "{} is already up to date!",
            project_identity::BINARY_NAME
        ));
        return Ok(());
    }
    if requested.is_some() && target == current {
        output::success(&format!("Already at {}", current));
        return Ok(());
    }

    let owner = detect_install_owner();
    if owner.is_package_manager() {
        return Err(BertError::Other(managed_update_hint(&owner)));
    }

    if let Some(notes) = release.body.as_deref().map(str::trim)
        && !notes.is_empty()
    {
        output::header("Release notes");
        println!("{}", notes);
    }

    if !options.yes
        && !output::prompt_yes_no(&format!(
            "Update {} from {} to {}?",
            project_identity::BINARY_NAME,
            current,
            target
        ))
    {
        output::warning("Update cancelled.");
        return Ok(());
    }

    install_release(&client, &release)?;

    output::success("Update completed successfully!");
    output::keyval("New version", &target);
    if !release.html_url.is_empty() {
        output::keyval("Release page", &release.html_url);
    }
    Ok(())
}

fn install_release(
    client: &reqwest::blocking::Client,
    release: &release::GitHubRelease,
) -> Result<()> {
    let asset_name = release::platform_asset_name(env::consts::OS, env::consts::ARCH)
        .ok_or_else(|| {
            BertError::Other(format!(
                "Self-update is not supported for this platform: {}/{}",
                env::consts::OS,
                env::consts::ARCH
            ))
        })?;
    let asset = release.asset(&asset_name).ok_or_else(|| {
        BertError::Other(format!(
            "No compatible binary ({}) found in release {}",
            asset_name, release.tag_name
        ))
    })?;

    let current_exe = env::current_exe()
        .map_err(|e| BertError::Other(format!("Unable to locate current executable: {}", e)))?;
    let staged = install_ops::staging_path(&current_exe);

    output::info(&format!("Downloading {}...", asset_name));
    let bytes = install_ops::download_bytes(client, &asset.browser_download_url)?;
    install_ops::write_executable(&staged, &bytes)?;

    let result = verify_and_swap(client, release, &asset_name, &staged, &current_exe);
    let _ = fs::remove_file(&staged);
    result
}

fn verify_and_swap(
    client: &reqwest::blocking::Client,
    release: &release::GitHubRelease,
    asset_name: &str,
    staged: &std::path::Path,
    current_exe: &std::path::Path,
) -> Result<()> {
    match release.asset("checksums.txt") {
        Some(checksums) => {
            output::info("Downloading checksums...");
            let content = install_ops::download_bytes(client, &checksums.browser_download_url)?;
            let expected =
                release::find_expected_checksum(&String::from_utf8_lossy(&content), asset_name)?;
            let actual = install_ops::compute_sha256(staged)?;
            install_ops::verify_checksum(asset_name, &expected, &actual)?;
            output::success("Checksum verification passed.");
        }
        None => output::warning("Release has no checksums.txt; skipping verification."),
    }

    let backup = install_ops::create_backup_binary(current_exe)?;
    output::info("Installing update...");
    if let Err(e) = install_ops::install_binary(staged, current_exe) {
        let _ = fs::remove_file(&backup);
        return Err(e);
    }

    if !install_ops::smoke_check(current_exe)? {
        let _ = install_ops::restore_from_backup(&backup, current_exe);
        let _ = fs::remove_file(&backup);
        return Err(BertError::Other(
            "Updated binary failed smoke check (--version). Rolled back to previous binary."
                .to_string(),
        ));
    }

    let _ = fs::remove_file(&backup);
    Ok(())
}
