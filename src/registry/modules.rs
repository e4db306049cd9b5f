//! Module registry.
//!
//! # Responsibilities
//! - Hold every loaded module under a unique, case-insensitive name
//! - Resolve modules by name for any caller
//! - Remember registration order for teardown
//!
//! # Design Decisions
//! - Static topology: nothing is ever unregistered
//! - Resolution hands out shared handles; the registry stays the source of truth

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::registry::module::Module;

/// Registry-level failures. Both are fatal during startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("module `{0}` is already registered")]
    DuplicateModule(String),
    #[error("module `{0}` is not registered")]
    UnknownModule(String),
    #[error("module `{0}` does not support starting interfaces")]
    NotAnInterface(String),
}

#[derive(Debug, Default)]
struct RegistryInner {
    /// Registration order.
    modules: Vec<(String, Arc<Module>)>,
    /// Lowercased name → position in `modules`.
    index: HashMap<String, usize>,
}

#[derive(Debug, Default)]
pub struct ModuleRegistry {
    inner: RwLock<RegistryInner>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a module. Names are compared without regard to case.
    pub fn register(&self, name: &str, module: Module) -> Result<Arc<Module>, RegistryError> {
        let mut inner = self.inner.write();
        let key = name.to_lowercase();
        if inner.index.contains_key(&key) {
            return Err(RegistryError::DuplicateModule(name.to_string()));
        }

        let module = Arc::new(module);
        let position = inner.modules.len();
        inner.modules.push((name.to_string(), Arc::clone(&module)));
        inner.index.insert(key, position);

        tracing::debug!(module = %name, kind = %module.kind(), "Module registered");
        Ok(module)
    }

    pub fn resolve(&self, name: &str) -> Result<Arc<Module>, RegistryError> {
        let inner = self.inner.read();
        inner
            .index
            .get(&name.to_lowercase())
            .map(|&position| Arc::clone(&inner.modules[position].1))
            .ok_or_else(|| RegistryError::UnknownModule(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.read().index.contains_key(&name.to_lowercase())
    }

    /// Registered names as given at registration, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.inner.read().modules.iter().map(|(n, _)| n.clone()).collect()
    }

    /// Every module, in registration order.
    pub fn modules(&self) -> Vec<(String, Arc<Module>)> {
        self.inner.read().modules.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.read().modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().modules.is_empty()
    }
}
