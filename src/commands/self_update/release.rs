//! GitHub release lookup.

use crate::error::{BertError, Result};
use crate::project_identity;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

const HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
pub(super) struct GitHubRelease {
    pub tag_name: String,
    pub body: Option<String>,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub assets: Vec<GitHubAsset>,
}

#[derive(Debug, Deserialize)]
pub(super) struct GitHubAsset {
    pub name: String,
    pub browser_download_url: String,
}

impl GitHubRelease {
    pub(super) fn version(&self) -> &str {
        let tag = self.tag_name.trim();
        tag.strip_prefix('v').unwrap_or(tag)
    }

    pub(super) fn asset(&self, name: &str) -> Option<&GitHubAsset> {
        self.assets.iter().find(|asset| asset.name == name)
    }
}

pub(super) fn http_client() -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .user_agent(project_identity::user_agent())
        .build()
        .map_err(|e| BertError::RemoteFetchError(e.to_string()))
}

/// Latest release, or the release tagged `v<version>`.
pub(super) fn fetch_release(client: &Client, version: Option<&str>) -> Result<GitHubRelease> {
    let url = match version {
        Some(v) => project_identity::github_release_api(v),
        None => project_identity::github_latest_release_api(),
    };

    let response = client
        .get(&url)
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
        .text()
        .map_err(|e| BertError::RemoteFetchError(e.to_string()))?;
    parse_release(&body)
}

pub(super) fn parse_release(body: &str) -> Result<GitHubRelease> {
    serde_json::from_str(body).map_err(|e| {
        BertError::RemoteFetchError(format!("Unexpected release document: {}", e))
    })
}

/// Release asset built for `os`/`arch` (`std::env::consts` values).
pub(super) fn platform_asset_name(os: &str, arch: &str) -> Option<String> {
    let suffix = match (os, arch) {
        ("linux", "x86_64") => "linux-amd64",
        ("linux", "aarch64") => "linux-arm64",
        ("macos", "x86_64") => "darwin-amd64",
        ("macos", "aarch64") => "darwin-arm64",
        ("windows", "x86_64") => "windows-amd64.exe",
        _ => return None,
    };
    Some(format!(
        "{}-{}",
        project_identity::RELEASE_ASSET_PREFIX,
        suffix
    ))
}

pub(super) fn parse_checksum_line(line: &str) -> Option<(&str, &str)> {
    let mut parts = line.split_whitespace();
    let sha = parts.next()?;
    let file = parts.next()?;
    let file = file.strip_prefix('*').unwrap_or(file);
    Some((sha, file))
}

pub(super) fn find_expected_checksum(checksums: &str, asset_name: &str) -> Result<String> {
    checksums
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(parse_checksum_line)
        .find(|(_, file)| *file == asset_name)
        .map(|(sha, _)| sha.to_string())
        .ok_or_else(|| {
            BertError::Other(format!("Could not find checksum entry for {}", asset_name))
        })
}
