//! Homebrew package manager
//!
//! System backend: formulae, casks and taps.

mod bootstrap;
mod parsing;

use crate::core::types::{
    Backend, InstalledPackage, PackageDetails, PackageSearchResult, PackageSpec,
};
use crate::error::{BertError, Result};
use crate::packages::traits::PackageManager;
use crate::ui;
use crate::utils::platform::Platform;
use crate::utils::{process, sanitize};

pub use parsing::{BrewInfo, CaskInfo, FormulaInfo};

const BREW: &str = "brew";

pub struct BrewManager {
    platform: Platform,
    assume_yes: bool,
}

impl BrewManager {
    pub fn new(platform: Platform, assume_yes: bool) -> Self {
        Self {
            platform,
            assume_yes,
        }
    }

    /// Make sure Homebrew is on PATH, offering to install it when missing.
    pub fn ensure_available(&self) -> Result<()> {
        if self.is_available() {
            return Ok(());
        }
        bootstrap::install_homebrew(self.platform, self.assume_yes)?;
        if self.is_available() {
            Ok(())
        } else {
            Err(unavailable(self.platform))
        }
    }

    fn require_available(&self) -> Result<()> {
        if self.is_available() {
            Ok(())
        } else {
            Err(unavailable(self.platform))
        }
    }

    /// `brew info --json=v2` for one formula or cask, `None` when unknown.
    pub fn info(&self, name: &str, cask: bool) -> Result<Option<BrewInfo>> {
        let kind = if cask { "--cask" } else { "--formula" };
        let output = process::capture(BREW, &["info", "--json=v2", kind, name])?;
        if !output.status.success() {
            ui::verbose(&format!("brew info found nothing for {}", name));
            return Ok(None);
        }
        let info = parsing::parse_info(&String::from_utf8_lossy(&output.stdout))?;
        Ok(Some(info))
    }

    /// Pick the name handed to `brew install`, falling back to latest when
    /// the requested version has no versioned formula.
    fn resolve_install_name(&self, spec: &PackageSpec) -> Result<String> {
        let Some(version) = &spec.version else {
            return Ok(spec.name.clone());
        };

        if spec.cask {
            ui::warning(&format!(
                "Casks cannot be pinned; installing the latest {} instead of {}",
                spec.name, version
            ));
            return Ok(spec.name.clone());
        }

        let info = self.info(&spec.name, false)?;
        let Some(formula) = info.as_ref().and_then(|i| i.formulae.first()) else {
            return Err(BertError::PackageManagerError(format!(
                "Package {} not found in Homebrew",
                spec.name
            )));
        };

        match formula.versioned_name(version) {
            Some(name) => Ok(name),
            None => {
                ui::warning(&format!("Version {} of {} not found.", version, spec.name));
                if formula.versioned_formulae.is_empty() {
                    ui::indent(
                        &format!("Only the latest version ({}) is available.", formula.stable()),
                        1,
                    );
                } else {
                    ui::indent(
                        &format!(
                            "Available versions: {} (latest), {}",
                            formula.stable(),
                            formula.other_versions().join(", ")
                        ),
                        1,
                    );
                }
                ui::info("Installing the latest version instead");
                Ok(spec.name.clone())
            }
        }
    }
}

fn unavailable(platform: Platform) -> BertError {
    BertError::BackendUnavailable {
        backend: "Homebrew".to_string(),
        hint: format!(
            "install it from https://brew.sh, then run: {}",
            platform.brew_shellenv_hint()
        ),
    }
}

impl PackageManager for BrewManager {
    fn backend_type(&self) -> Backend {
        Backend::System
    }

    fn tool_name(&self) -> &str {
        "Homebrew"
    }

    fn is_available(&self) -> bool {
        which::which(self.platform.executable_name(BREW)).is_ok()
    }

    fn ensure_ready(&self) -> Result<()> {
        self.ensure_available()
    }

    fn list_installed(&self) -> Result<Vec<InstalledPackage>> {
        self.require_available()?;

        let formulae = process::capture_checked(BREW, &["list", "--formula", "--versions"])?;
        let casks = process::capture_checked(BREW, &["list", "--cask", "--versions"])?;

        let mut installed = parsing::parse_list_versions(&formulae, false);
        installed.extend(parsing::parse_list_versions(&casks, true));
        Ok(installed)
    }

    fn is_installed(&self, spec: &PackageSpec) -> Result<bool> {
        self.require_available()?;
        let short = spec.name.rsplit('/').next().unwrap_or(&spec.name);
        let kind = if spec.cask { "--cask" } else { "--formula" };
        let output = process::capture(BREW, &["list", "--versions", kind, short])?;
        Ok(output.status.success() && !output.stdout.iter().all(u8::is_ascii_whitespace))
    }

    fn install(&self, spec: &PackageSpec) -> Result<()> {
        sanitize::validate_package_name(&spec.name)?;
        if let Some(version) = &spec.version {
            sanitize::validate_version(version)?;
        }
        self.ensure_available()?;

        if let Some(tap) = spec.tap() {
            self.add_source(&tap)?;
        }

        let install_name = self.resolve_install_name(spec)?;
        let mut args = vec!["install"];
        if spec.cask {
            args.push("--cask");
        }
        args.push(&install_name);

        process::interactive_checked(BREW, &args)
    }

    fn remove(&self, spec: &PackageSpec) -> Result<()> {
        sanitize::validate_package_name(&spec.name)?;
        self.require_available()?;

        if !self.is_installed(spec)? {
            ui::warning(&format!("{} is not installed", spec.name));
            return Ok(());
        }

        let mut args = vec!["uninstall"];
        if spec.cask {
            args.push("--cask");
        }
        args.push(&spec.name);
        process::interactive_checked(BREW, &args)?;

        if let Err(e) = process::capture_checked(BREW, &["cleanup", &spec.name]) {
            ui::warning(&format!("brew cleanup failed: {}", e));
        }
        Ok(())
    }

    fn update(&self, packages: &[String]) -> Result<()> {
        sanitize::validate_package_names(packages)?;
        self.require_available()?;

        process::interactive_checked(BREW, &["update"])?;

        let mut args = vec!["upgrade"];
        args.extend(packages.iter().map(String::as_str));
        process::interactive_checked(BREW, &args)
    }

    fn search(&self, query: &str, cask: bool) -> Result<Vec<PackageSearchResult>> {
        self.require_available()?;

        let kind = if cask { "--cask" } else { "--formula" };
        let output = process::capture(BREW, &["search", kind, query])?;

        // brew search exits 1 when nothing matches
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.contains("No formulae or casks found") || stderr.trim().is_empty() {
                return Ok(Vec::new());
            }
            return Err(BertError::PackageManagerError(process::failure_message(
                BREW,
                &["search", kind, query],
                &output,
            )));
        }

        Ok(parsing::parse_search(
            &String::from_utf8_lossy(&output.stdout),
            cask,
        ))
    }

    fn package_info(&self, spec: &PackageSpec) -> Result<Option<PackageDetails>> {
        self.require_available()?;
        Ok(self
            .info(&spec.name, spec.cask)?
            .and_then(|info| info.details(spec.cask)))
    }

    fn provider_of(&self, command: &str) -> Result<Option<PackageSpec>> {
        self.require_available()?;
        let Some(info) = self.info(command, false)? else {
            return Ok(None);
        };
        Ok(info
            .formulae
            .first()
            .map(|formula| PackageSpec::new(formula.full_name.clone(), Backend::System)))
    }

    fn list_sources(&self) -> Result<Vec<String>> {
        self.require_available()?;
        let stdout = process::capture_checked(BREW, &["tap"])?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn add_source(&self, source: &str) -> Result<()> {
        sanitize::validate_tap(source)?;
        self.require_available()?;
        process::interactive_checked(BREW, &["tap", source])
    }
}
