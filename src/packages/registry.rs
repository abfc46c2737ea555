//! # Package Manager Registry
//!
//! Maps each [`Backend`] to a factory that builds its manager.
//!
//! ## Adding a New Backend
//!
//! 1. Create `src/packages/<backend>.rs` with a Manager struct
//! 2. Implement `PackageManager` for it
//! 3. Add a `Backend::<Name>` variant to `core/types.rs`
//! 4. Register it in `BackendRegistry::register_defaults()`
//!
//! Tests swap in their own factories through [`BackendRegistry::register`].

use crate::core::types::Backend;
use crate::error::{BertError, Result};
use crate::packages::PackageManager;
use crate::packages::brew::BrewManager;
use crate::packages::node::{NodeManager, NodeTool};
use crate::utils::platform::Platform;
use std::collections::HashMap;

/// What a factory gets to build a manager with.
#[derive(Debug, Clone, Copy)]
pub struct BackendOptions {
    pub platform: Platform,
    pub node_tool: NodeTool,
    pub assume_yes: bool,
}

/// Factory function for creating package manager instances
pub type BackendFactory =
    Box<dyn Fn(&BackendOptions) -> Result<Box<dyn PackageManager>> + Send + Sync>;

pub struct BackendRegistry {
    factories: HashMap<Backend, BackendFactory>,
}

impl BackendRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a backend with its factory function
    pub fn register<F>(&mut self, backend: Backend, factory: F)
    where
        F: Fn(&BackendOptions) -> Result<Box<dyn PackageManager>> + Send + Sync + 'static,
    {
        self.factories.insert(backend, Box::new(factory));
    }

    /// Create a package manager instance for the given backend
    pub fn create_manager(
        &self,
        backend: Backend,
        options: &BackendOptions,
    ) -> Result<Box<dyn PackageManager>> {
        let factory = self.factories.get(&backend).ok_or_else(|| {
            BertError::Other(format!("No factory registered for backend: {}", backend))
        })?;
        factory(options)
    }

    pub fn register_defaults(&mut self) {
        self.register(Backend::System, |options| {
            Ok(Box::new(BrewManager::new(options.platform, options.assume_yes)))
        });

        self.register(Backend::Language, |options| {
            Ok(Box::new(NodeManager::new(options.node_tool)))
        });
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register_defaults();
        registry
    }
}
