use crate::core::types::{Backend, InstalledPackage, PackageSpec};
use crate::packages::node::NodeTool;
use crate::utils::platform::Platform;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A backup of everything installed through bert's backends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupFile {
    pub schema_version: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub generator: String,
    #[serde(default)]
    pub platform: Option<Platform>,
    #[serde(default)]
    pub hostname: Option<String>,
    /// Tool the language packages were listed with
    #[serde(default)]
    pub node_package_manager: Option<NodeTool>,
    #[serde(default)]
    pub taps: Vec<String>,
    #[serde(default)]
    pub packages: Vec<BackupPackage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupPackage {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    pub backend: Backend,
    #[serde(default)]
    pub cask: bool,
}

impl From<InstalledPackage> for BackupPackage {
    fn from(pkg: InstalledPackage) -> Self {
        Self {
            name: pkg.name,
            version: pkg.version,
            backend: pkg.backend,
            cask: pkg.cask,
        }
    }
}

impl BackupPackage {
    /// Spec handed to the backend on restore. Recorded versions are only
    /// requested when `pin_versions` is set.
    pub fn to_spec(&self, pin_versions: bool) -> PackageSpec {
        let version = if pin_versions {
            self.version.clone()
        } else {
            None
        };
        PackageSpec::new(self.name.clone(), self.backend)
            .with_version(version)
            .with_cask(self.cask)
    }

    fn sort_key(&self) -> (Backend, bool, &str) {
        (self.backend, self.cask, self.name.as_str())
    }
}

impl BackupFile {
    pub fn new(
        created_at: DateTime<Utc>,
        generator: String,
        platform: Platform,
        hostname: Option<String>,
    ) -> Self {
        Self {
            schema_version: super::CURRENT_SCHEMA_VERSION,
            created_at,
            generator,
            platform: Some(platform),
            hostname,
            node_package_manager: None,
            taps: Vec::new(),
            packages: Vec::new(),
        }
    }

    pub fn add_packages(&mut self, installed: impl IntoIterator<Item = InstalledPackage>) {
        self.packages
            .extend(installed.into_iter().map(BackupPackage::from));
    }

    /// Sort packages by (backend, cask, name) and drop duplicates, the same
    /// for taps. Blank versions become `None`.
    pub fn normalize(&mut self) {
        self.packages
            .retain(|pkg| !pkg.name.trim().is_empty());
        for pkg in &mut self.packages {
            if pkg.version.as_deref().is_some_and(|v| v.trim().is_empty()) {
                pkg.version = None;
            }
        }
        self.packages.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        self.packages.dedup_by(|a, b| a.sort_key() == b.sort_key());

        self.taps.retain(|tap| !tap.trim().is_empty());
        self.taps.sort();
        self.taps.dedup();
    }

    pub fn packages_for(&self, backend: Backend) -> impl Iterator<Item = &BackupPackage> {
        self.packages.iter().filter(move |pkg| pkg.backend == backend)
    }

    pub fn names_for(&self, backend: Backend) -> BTreeSet<&str> {
        self.packages_for(backend)
            .map(|pkg| pkg.name.as_str())
            .collect()
    }

    pub fn count(&self, backend: Backend, cask: bool) -> usize {
        self.packages_for(backend)
            .filter(|pkg| pkg.cask == cask)
            .count()
    }
}
