//! In-memory backends for command tests.

use crate::config::Settings;
use crate::core::types::{
    Backend, InstalledPackage, PackageDetails, PackageSearchResult, PackageSpec,
};
use crate::error::{BertError, Result};
use crate::packages::{BackendRegistry, PackageManager};
use crate::snapshot::io::FilesystemBackupStore;
use crate::traits::AppContext;
use crate::utils::paths::BertPaths;
use crate::utils::platform::Platform;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug)]
pub struct MockState {
    pub available: bool,
    pub installed: Vec<InstalledPackage>,
    pub install_calls: Vec<String>,
    pub removed: Vec<String>,
    pub updated: Vec<Vec<String>>,
    pub taps: Vec<String>,
    pub catalog: Vec<String>,
    pub failing: HashSet<String>,
    /// command -> providing package
    pub providers: HashMap<String, String>,
    pub ready_calls: usize,
    pub info_calls: Vec<String>,
    /// name -> details shown before install
    pub details: HashMap<String, PackageDetails>,
    /// Flag tripped right after the next successful install
    pub interrupt_after_install: Option<Arc<AtomicBool>>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            available: true,
            installed: Vec::new(),
            install_calls: Vec::new(),
            removed: Vec::new(),
            updated: Vec::new(),
            taps: Vec::new(),
            catalog: Vec::new(),
            failing: HashSet::new(),
            providers: HashMap::new(),
            ready_calls: 0,
            info_calls: Vec::new(),
            details: HashMap::new(),
            interrupt_after_install: None,
        }
    }
}

pub type Shared = Arc<Mutex<MockState>>;

pub struct MockManager {
    backend: Backend,
    state: Shared,
}

impl MockManager {
    fn state(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().expect("mock state poisoned")
    }
}

impl PackageManager for MockManager {
    fn backend_type(&self) -> Backend {
        self.backend
    }

    fn tool_name(&self) -> &str {
        match self.backend {
            Backend::System => "mock-brew",
            Backend::Language => "mock-npm",
        }
    }

    fn is_available(&self) -> bool {
        self.state().available
    }

    fn ensure_ready(&self) -> Result<()> {
        let mut state = self.state();
        state.ready_calls += 1;
        if state.available {
            return Ok(());
        }
        Err(BertError::BackendUnavailable {
            backend: self.tool_name().to_string(),
            hint: "mock".to_string(),
        })
    }

    fn package_info(&self, spec: &PackageSpec) -> Result<Option<PackageDetails>> {
        let mut state = self.state();
        state.info_calls.push(spec.name.clone());
        Ok(state.details.get(&spec.name).cloned())
    }

    fn list_installed(&self) -> Result<Vec<InstalledPackage>> {
        let state = self.state();
        if !state.available {
            return Err(BertError::BackendUnavailable {
                backend: self.tool_name().to_string(),
                hint: "mock".to_string(),
            });
        }
        Ok(state.installed.clone())
    }

    fn install(&self, spec: &PackageSpec) -> Result<()> {
        let mut state = self.state();
        state.install_calls.push(spec.versioned_name());
        if state.failing.contains(&spec.name) {
            return Err(BertError::PackageManagerError(format!(
                "mock failure installing {}",
                spec.name
            )));
        }
        state.installed.push(InstalledPackage {
            name: spec.name.clone(),
            version: spec.version.clone().or(Some("1.0.0".to_string())),
            backend: self.backend,
            cask: spec.cask,
        });
        if let Some(flag) = &state.interrupt_after_install {
            flag.store(true, Ordering::SeqCst);
        }
        Ok(())
    }

    fn remove(&self, spec: &PackageSpec) -> Result<()> {
        let mut state = self.state();
        state.removed.push(spec.name.clone());
        state.installed.retain(|pkg| pkg.name != spec.name);
        Ok(())
    }

    fn update(&self, packages: &[String]) -> Result<()> {
        self.state().updated.push(packages.to_vec());
        Ok(())
    }

    fn search(&self, query: &str, cask: bool) -> Result<Vec<PackageSearchResult>> {
        Ok(self
            .state()
            .catalog
            .iter()
            .filter(|name| name.contains(query))
            .map(|name| PackageSearchResult {
                name: name.clone(),
                version: None,
                description: Some(format!("{} from {}", name, self.tool_name())),
                backend: self.backend,
                cask,
            })
            .collect())
    }

    fn provider_of(&self, command: &str) -> Result<Option<PackageSpec>> {
        Ok(self
            .state()
            .providers
            .get(command)
            .map(|pkg| PackageSpec::new(pkg.clone(), self.backend)))
    }

    fn list_sources(&self) -> Result<Vec<String>> {
        Ok(self.state().taps.clone())
    }

    fn add_source(&self, source: &str) -> Result<()> {
        let mut state = self.state();
        if state.failing.contains(source) {
            return Err(BertError::PackageManagerError(format!(
                "mock failure tapping {}",
                source
            )));
        }
        state.taps.push(source.to_string());
        Ok(())
    }
}

pub struct MockEnv {
    pub ctx: AppContext,
    pub system: Shared,
    pub language: Shared,
}

pub fn installed(name: &str, backend: Backend) -> InstalledPackage {
    InstalledPackage {
        name: name.to_string(),
        version: Some("1.0.0".to_string()),
        backend,
        cask: false,
    }
}

pub fn mock_env(home: &Path) -> MockEnv {
    let system: Shared = Arc::default();
    let language: Shared = Arc::default();

    let mut registry = BackendRegistry::new();
    for (backend, state) in [(Backend::System, &system), (Backend::Language, &language)] {
        let state = Arc::clone(state);
        registry.register(backend, move |_options| {
            Ok(Box::new(MockManager {
                backend,
                state: Arc::clone(&state),
            }))
        });
    }

    let mut ctx = AppContext::new(
        BertPaths::at(home),
        Platform::Linux,
        Settings::default(),
        registry,
        Box::new(FilesystemBackupStore),
        true,
    );
    ctx.interrupted = Arc::new(AtomicBool::new(false));

    MockEnv {
        ctx,
        system,
        language,
    }
}
