//! Installing Homebrew itself when it is missing.

use crate::error::{BertError, Result};
use crate::ui;
use crate::utils::platform::Platform;
use reqwest::blocking::Client;
use std::process::Command;
use std::time::Duration;

const INSTALL_SCRIPT_URL: &str = "https://raw.githubusercontent.com/Homebrew/install/HEAD/install.sh";
const HTTP_TIMEOUT_SECS: u64 = 30;

pub(super) fn install_homebrew(platform: Platform, assume_yes: bool) -> Result<()> {
    if platform == Platform::Windows {
        return Err(BertError::BackendUnavailable {
            backend: "Homebrew".to_string(),
            hint: "Homebrew does not run natively on Windows; use WSL".to_string(),
        });
    }

    ui::warning("Homebrew is required but not installed.");
    if !assume_yes && !ui::prompt_yes_no("Would you like to install Homebrew?") {
        return Err(BertError::BackendUnavailable {
            backend: "Homebrew".to_string(),
            hint: "installation declined".to_string(),
        });
    }

    ui::info("Installing Homebrew...");
    let script = fetch_install_script()?;

    let mut cmd = Command::new("bash");
    cmd.arg("-c").arg(&script);
    if assume_yes {
        cmd.env("NONINTERACTIVE", "1");
    }
    let status = cmd.status().map_err(|e| BertError::SystemCommandFailed {
        command: "bash -c <homebrew install script>".to_string(),
        reason: e.to_string(),
    })?;

    if !status.success() {
        return Err(BertError::PackageManagerError(
            "Homebrew installation script failed".to_string(),
        ));
    }

    ui::success("Homebrew installed.");
    ui::info("Add Homebrew to your shell profile, then restart the terminal:");
    ui::indent(platform.brew_shellenv_hint(), 2);
    Ok(())
}

fn fetch_install_script() -> Result<String> {
    let client = Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .build()
        .map_err(|e| BertError::RemoteFetchError(e.to_string()))?;

    let response = client
        .get(INSTALL_SCRIPT_URL)
        .send()
        .map_err(|e| BertError::RemoteFetchError(e.to_string()))?;

    if !response.status().is_success() {
        return Err(BertError::RemoteFetchError(format!(
            "HTTP {} for {}",
            response.status(),
            INSTALL_SCRIPT_URL
        )));
    }

    response
        .text()
        .map_err(|e| BertError::RemoteFetchError(e.to_string()))
}
