use crate::core::types::{
    Backend, InstalledPackage, PackageDetails, PackageSearchResult, PackageSpec,
};
use crate::error::{BertError, Result};

/// One external package manager bert delegates to.
pub trait PackageManager: Send + Sync {
    fn backend_type(&self) -> Backend;

    /// Human name of the wrapped tool ("Homebrew", "npm", ...)
    fn tool_name(&self) -> &str;

    fn is_available(&self) -> bool;

    /// Make the wrapped tool usable, bootstrapping it when the backend knows
    /// how. Default: require it on PATH.
    fn ensure_ready(&self) -> Result<()> {
        if self.is_available() {
            return Ok(());
        }
        Err(BertError::BackendUnavailable {
            backend: self.tool_name().to_string(),
            hint: "not found on PATH".to_string(),
        })
    }

    fn list_installed(&self) -> Result<Vec<InstalledPackage>>;

    fn install(&self, spec: &PackageSpec) -> Result<()>;

    fn remove(&self, spec: &PackageSpec) -> Result<()>;

    /// Refresh the index and upgrade the given packages, or everything when
    /// `packages` is empty.
    fn update(&self, packages: &[String]) -> Result<()>;

    fn search(&self, query: &str, cask: bool) -> Result<Vec<PackageSearchResult>>;

    /// Description, versions and links shown before an install. Default:
    /// nothing known.
    fn package_info(&self, _spec: &PackageSpec) -> Result<Option<PackageDetails>> {
        Ok(None)
    }

    fn is_installed(&self, spec: &PackageSpec) -> Result<bool> {
        Ok(self
            .list_installed()?
            .iter()
            .any(|pkg| pkg.name == spec.name))
    }

    /// Package that ships an executable named `command`, if the backend can
    /// tell. Default: the backend cannot resolve commands.
    fn provider_of(&self, _command: &str) -> Result<Option<PackageSpec>> {
        Ok(None)
    }

    /// Third-party package sources (Homebrew taps). Default: none.
    fn list_sources(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn add_source(&self, _source: &str) -> Result<()> {
        Ok(())
    }

    /// System package this backend needs before it can run, when missing
    /// (the Node runtime for the Node tools).
    fn missing_runtime(&self) -> Option<PackageSpec> {
        None
    }
}
