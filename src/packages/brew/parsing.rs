//! Parsers for Homebrew's command output.

use crate::core::types::{Backend, InstalledPackage, PackageDetails, PackageSearchResult};
use crate::error::Result;
use serde::Deserialize;

/// `brew info --json=v2` document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrewInfo {
    #[serde(default)]
    pub formulae: Vec<FormulaInfo>,
    #[serde(default)]
    pub casks: Vec<CaskInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FormulaInfo {
    pub name: String,
    pub full_name: String,
    pub desc: Option<String>,
    pub homepage: Option<String>,
    pub license: Option<String>,
    pub tap: Option<String>,
    #[serde(default)]
    pub versions: Versions,
    #[serde(default)]
    pub versioned_formulae: Vec<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Versions {
    pub stable: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaskInfo {
    pub token: String,
    pub desc: Option<String>,
    pub homepage: Option<String>,
    pub tap: Option<String>,
    pub version: Option<String>,
}

impl BrewInfo {
    /// Details of the first cask or formula in the document.
    pub fn details(&self, cask: bool) -> Option<PackageDetails> {
        if cask {
            return self.casks.first().map(CaskInfo::details);
        }
        self.formulae.first().map(FormulaInfo::details)
    }
}

impl CaskInfo {
    fn details(&self) -> PackageDetails {
        PackageDetails {
            name: self.token.clone(),
            kind: "Cask".to_string(),
            description: self.desc.clone(),
            homepage: self.homepage.clone(),
            tap: self.tap.clone(),
            latest: self.version.clone(),
            ..PackageDetails::default()
        }
    }
}

impl FormulaInfo {
    pub fn stable(&self) -> &str {
        self.versions.stable.as_deref().unwrap_or("unknown")
    }

    /// `name@version` when Homebrew ships that versioned formula.
    pub fn versioned_name(&self, version: &str) -> Option<String> {
        let candidate = format!("{}@{}", self.name, version);
        self.versioned_formulae
            .iter()
            .any(|v| v == &candidate)
            .then_some(candidate)
    }

    fn details(&self) -> PackageDetails {
        PackageDetails {
            name: self.full_name.clone(),
            kind: "Formula".to_string(),
            description: self.desc.clone(),
            license: self.license.clone(),
            homepage: self.homepage.clone(),
            tap: self.tap.clone(),
            latest: self.versions.stable.clone(),
            other_versions: self.versioned_formulae.clone(),
            aliases: self.aliases.clone(),
            ..PackageDetails::default()
        }
    }

    pub fn other_versions(&self) -> Vec<&str> {
        self.versioned_formulae
            .iter()
            .filter_map(|v| v.split('@').nth(1))
            .collect()
    }
}

pub(super) fn parse_info(stdout: &str) -> Result<BrewInfo> {
    Ok(serde_json::from_str(stdout)?)
}

/// Parse `brew list --versions` lines: `name 1.2.3 [1.2.2 ...]`.
pub(super) fn parse_list_versions(stdout: &str, cask: bool) -> Vec<InstalledPackage> {
    stdout
        .lines()
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let name = parts.next()?;
            Some(InstalledPackage {
                name: name.to_string(),
                version: parts.next().map(str::to_string),
                backend: Backend::System,
                cask,
            })
        })
        .collect()
}

/// Parse `brew search` output: names, optionally under `==>` headings and
/// in columns when stdout is a terminal.
pub(super) fn parse_search(stdout: &str, cask: bool) -> Vec<PackageSearchResult> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("==>"))
        .flat_map(str::split_whitespace)
        .map(|token| token.trim_end_matches('✔'))
        .filter(|name| !name.is_empty())
        .map(|name| PackageSearchResult {
            name: name.to_string(),
            version: None,
            description: None,
            backend: Backend::System,
            cask,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PYTHON_INFO: &str = r#"{
      "formulae": [{
        "name": "python",
        "full_name": "python@3.12",
        "desc": "Interpreted, interactive, object-oriented programming language",
        "versions": {"stable": "3.12.3", "head": null, "bottle": true},
        "homepage": "https://www.python.org/",
        "license": "Python-2.0",
        "tap": "homebrew/core",
        "versioned_formulae": ["python@3.11", "python@3.10"],
        "aliases": ["python3"]
      }],
      "casks": []
    }"#;

    #[test]
    fn parses_info_document() {
        let info = parse_info(PYTHON_INFO).expect("valid json");
        let formula = &info.formulae[0];
        assert_eq!(formula.stable(), "3.12.3");
        assert_eq!(formula.other_versions(), vec!["3.11", "3.10"]);
        assert!(info.casks.is_empty());
    }

    #[test]
    fn versioned_name_only_for_shipped_versions() {
        let info = parse_info(PYTHON_INFO).expect("valid json");
        let formula = &info.formulae[0];
        assert_eq!(
            formula.versioned_name("3.11").as_deref(),
            Some("python@3.11")
        );
        assert_eq!(formula.versioned_name("2.7"), None);
    }

    #[test]
    fn parses_cask_info() {
        let info = parse_info(
            r#"{"formulae":[],"casks":[{"token":"firefox","desc":"Web browser","version":"125.0"}]}"#,
        )
        .expect("valid json");
        assert_eq!(info.casks[0].token, "firefox");
        assert_eq!(info.casks[0].version.as_deref(), Some("125.0"));

        let details = info.details(true).expect("cask details");
        assert_eq!(details.kind, "Cask");
        assert_eq!(details.latest.as_deref(), Some("125.0"));
        assert!(info.details(false).is_none());
    }

    #[test]
    fn formula_details_carry_versions_and_aliases() {
        let info = parse_info(PYTHON_INFO).expect("valid json");
        let details = info.details(false).expect("formula details");
        assert_eq!(details.name, "python@3.12");
        assert_eq!(details.kind, "Formula");
        assert_eq!(details.latest.as_deref(), Some("3.12.3"));
        assert_eq!(details.other_versions, vec!["python@3.11", "python@3.10"]);
        assert_eq!(details.aliases, vec!["python3"]);
        assert_eq!(details.license.as_deref(), Some("Python-2.0"));
        assert_eq!(details.tap.as_deref(), Some("homebrew/core"));
    }

    #[test]
    fn parses_list_versions_output() {
        let pkgs = parse_list_versions("git 2.44.0\nopenssl@3 3.3.0 3.2.1\n\n", false);
        assert_eq!(pkgs.len(), 2);
        assert_eq!(pkgs[0].name, "git");
        assert_eq!(pkgs[0].version.as_deref(), Some("2.44.0"));
        assert_eq!(pkgs[1].name, "openssl@3");
        assert_eq!(pkgs[1].version.as_deref(), Some("3.3.0"));
        assert!(!pkgs[0].cask);
    }

    #[test]
    fn list_versions_without_version_column() {
        let pkgs = parse_list_versions("firefox\n", true);
        assert_eq!(pkgs[0].version, None);
        assert!(pkgs[0].cask);
    }

    #[test]
    fn parses_search_with_headings_and_columns() {
        let out = "==> Formulae\nripgrep ✔    ripgrep-all\n\n==> Casks\n";
        let results = parse_search(out, false);
        let names: Vec<_> = results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["ripgrep", "ripgrep-all"]);
        assert!(results.iter().all(|r| r.backend == Backend::System));
    }
}
