//! Service inventory.
//!
//! Tracks which services the host knows about and how many routes they
//! expose. Monitoring callers read it through `list` and `stats`.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use serde::Serialize;

use crate::config::ServiceConfig;
use crate::config::OrderedMap;

/// Aggregate counts reported to monitoring callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStats {
    pub services_count: usize,
    pub services_route_count: usize,
}

#[derive(Debug, Default)]
pub struct ServiceInventory {
    services: RwLock<BTreeMap<String, Vec<String>>>,
}

impl ServiceInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &OrderedMap<ServiceConfig>) -> Self {
        let inventory = Self::new();
        for (name, service) in config.iter() {
            inventory.register(name, service.routes.clone());
        }
        inventory
    }

    /// Add or replace a service.
    pub fn register(&self, name: impl Into<String>, routes: Vec<String>) {
        let name = name.into();
        tracing::debug!(service = %name, routes = routes.len(), "Service registered");
        self.services.write().insert(name, routes);
    }

    /// Service names, sorted.
    pub fn list(&self) -> Vec<String> {
        self.services.read().keys().cloned().collect()
    }

    pub fn routes(&self, name: &str) -> Option<Vec<String>> {
        self.services.read().get(name).cloned()
    }

    pub fn stats(&self) -> ServiceStats {
        let services = self.services.read();
        ServiceStats {
            services_count: services.len(),
            services_route_count: services.values().map(Vec::len).sum(),
        }
    }
}
