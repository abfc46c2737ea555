//! Node package managers
//!
//! Language backend: globally installed packages through npm, yarn, pnpm
//! or bun. Search always goes through the npm registry CLI.

mod parsing;

use crate::core::types::{
    Backend, InstalledPackage, PackageDetails, PackageSearchResult, PackageSpec,
};
use crate::error::{BertError, Result};
use crate::packages::traits::PackageManager;
use crate::project_identity;
use crate::utils::{process, sanitize};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_REGISTRY: &str = "https://registry.npmjs.org";
const REGISTRY_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeTool {
    #[default]
    Npm,
    Yarn,
    Pnpm,
    Bun,
}

impl NodeTool {
    pub fn command(&self) -> &'static str {
        match self {
            NodeTool::Npm => "npm",
            NodeTool::Yarn => "yarn",
            NodeTool::Pnpm => "pnpm",
            NodeTool::Bun => "bun",
        }
    }

    pub fn install_args(&self) -> &'static [&'static str] {
        match self {
            NodeTool::Npm => &["install", "-g"],
            NodeTool::Yarn => &["global", "add"],
            NodeTool::Pnpm => &["add", "-g"],
            NodeTool::Bun => &["add", "-g"],
        }
    }

    pub fn uninstall_args(&self) -> &'static [&'static str] {
        match self {
            NodeTool::Npm => &["uninstall", "-g"],
            NodeTool::Yarn => &["global", "remove"],
            NodeTool::Pnpm => &["remove", "-g"],
            NodeTool::Bun => &["remove", "-g"],
        }
    }

    pub fn update_args(&self) -> &'static [&'static str] {
        match self {
            NodeTool::Npm => &["update", "-g"],
            NodeTool::Yarn => &["global", "upgrade"],
            NodeTool::Pnpm => &["update", "-g"],
            NodeTool::Bun => &["update", "-g"],
        }
    }

    pub fn list_args(&self) -> &'static [&'static str] {
        match self {
            NodeTool::Npm => &["list", "-g", "--depth=0", "--json"],
            NodeTool::Yarn => &["global", "list"],
            NodeTool::Pnpm => &["list", "-g", "--depth=0", "--json"],
            NodeTool::Bun => &["pm", "ls", "-g"],
        }
    }
}

impl fmt::Display for NodeTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}

impl FromStr for NodeTool {
    type Err = BertError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "npm" => Ok(NodeTool::Npm),
            "yarn" => Ok(NodeTool::Yarn),
            "pnpm" => Ok(NodeTool::Pnpm),
            "bun" => Ok(NodeTool::Bun),
            other => Err(BertError::ConfigError(format!(
                "Invalid package manager: {}. Valid options are: npm, yarn, pnpm, bun",
                other
            ))),
        }
    }
}

/// Registry base URL; `BERT_NPM_REGISTRY` overrides the public one.
fn registry_url() -> String {
    std::env::var(project_identity::env_key("NPM_REGISTRY"))
        .ok()
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_REGISTRY.to_string())
}

/// Registry path of a package; the scope separator is escaped.
fn registry_path(name: &str) -> String {
    name.replace('/', "%2f")
}

fn fetch_registry_details(name: &str) -> Result<Option<PackageDetails>> {
    let client = Client::builder()
        .timeout(Duration::from_secs(REGISTRY_TIMEOUT_SECS))
        .user_agent(project_identity::user_agent())
        .build()
        .map_err(|e| BertError::RemoteFetchError(e.to_string()))?;

    let url = format!(
        "{}/{}",
        registry_url().trim_end_matches('/'),
        registry_path(name)
    );
    let response = client
        .get(&url)
        .send()
        .map_err(|e| BertError::RemoteFetchError(e.to_string()))?;

    if response.status() == StatusCode::NOT_FOUND {
        return Ok(None);
    }
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
    parsing::parse_registry_document(&body).map(Some)
}

pub struct NodeManager {
    tool: NodeTool,
}

impl NodeManager {
    pub fn new(tool: NodeTool) -> Self {
        Self { tool }
    }

    fn require_available(&self) -> Result<()> {
        if self.is_available() {
            return Ok(());
        }
        Err(BertError::BackendUnavailable {
            backend: self.tool.command().to_string(),
            hint: "install Node.js (bert install node) or choose another tool with `bert set-manager`"
                .to_string(),
        })
    }

    fn run_with(&self, base: &[&str], packages: &[String]) -> Result<()> {
        let mut args: Vec<&str> = base.to_vec();
        args.extend(packages.iter().map(String::as_str));
        process::interactive_checked(self.tool.command(), &args)
    }
}

impl PackageManager for NodeManager {
    fn backend_type(&self) -> Backend {
        Backend::Language
    }

    fn tool_name(&self) -> &str {
        self.tool.command()
    }

    fn is_available(&self) -> bool {
        which::which(self.tool.command()).is_ok()
    }

    fn ensure_ready(&self) -> Result<()> {
        self.require_available()
    }

    fn list_installed(&self) -> Result<Vec<InstalledPackage>> {
        self.require_available()?;

        let program = self.tool.command();
        let args = self.tool.list_args();
        let output = process::capture(program, args)?;
        let stdout = String::from_utf8_lossy(&output.stdout);

        // npm exits non-zero on peer-dependency warnings but still prints the tree
        let parsed = match self.tool {
            NodeTool::Npm => parsing::parse_npm_list(&stdout),
            NodeTool::Pnpm => parsing::parse_pnpm_list(&stdout),
            NodeTool::Yarn => Some(parsing::parse_yarn_global_list(&stdout)),
            NodeTool::Bun => Some(parsing::parse_tree_list(&stdout)),
        };

        match parsed {
            Some(pkgs) if output.status.success() || !pkgs.is_empty() => Ok(pkgs),
            _ if output.status.success() => Ok(Vec::new()),
            _ => Err(BertError::PackageManagerError(process::failure_message(
                program, args, &output,
            ))),
        }
    }

    fn install(&self, spec: &PackageSpec) -> Result<()> {
        sanitize::validate_package_name(&spec.name)?;
        if let Some(version) = &spec.version {
            sanitize::validate_version(version)?;
        }
        self.require_available()?;
        self.run_with(self.tool.install_args(), &[spec.versioned_name()])
    }

    fn remove(&self, spec: &PackageSpec) -> Result<()> {
        sanitize::validate_package_name(&spec.name)?;
        self.require_available()?;
        self.run_with(self.tool.uninstall_args(), std::slice::from_ref(&spec.name))
    }

    fn update(&self, packages: &[String]) -> Result<()> {
        sanitize::validate_package_names(packages)?;
        self.require_available()?;
        self.run_with(self.tool.update_args(), packages)
    }

    fn search(&self, query: &str, _cask: bool) -> Result<Vec<PackageSearchResult>> {
        if which::which("npm").is_err() {
            return Err(BertError::BackendUnavailable {
                backend: "npm".to_string(),
                hint: "searching the npm registry needs the npm CLI".to_string(),
            });
        }

        let stdout = process::capture_checked("npm", &["search", "--json", query])?;
        parsing::parse_npm_search(&stdout)
    }

    fn package_info(&self, spec: &PackageSpec) -> Result<Option<PackageDetails>> {
        sanitize::validate_package_name(&spec.name)?;
        fetch_registry_details(&spec.name)
    }

    fn missing_runtime(&self) -> Option<PackageSpec> {
        // bun ships its own runtime
        if self.tool == NodeTool::Bun || which::which("node").is_ok() {
            return None;
        }
        Some(PackageSpec::new("node", Backend::System))
    }
}
