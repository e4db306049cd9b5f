//! Process-scoped context handed to every module.

use std::sync::Arc;

use serde_json::Value;

use crate::interfaces::SubInterfaceStatus;
use crate::observability::LogSink;
use crate::registry::modules::ModuleRegistry;
use crate::state::{GlobalStore, ServiceInventory, ServiceStats};

/// Registry, shared state and log sink for one host.
///
/// Built once per host and shared as `Arc<HostContext>`. Tests build their
/// own isolated contexts.
#[derive(Debug)]
pub struct HostContext {
    name: String,
    registry: ModuleRegistry,
    globals: GlobalStore,
    services: ServiceInventory,
    log: Arc<dyn LogSink>,
}

impl HostContext {
    pub fn new(name: impl Into<String>, log: Arc<dyn LogSink>) -> Self {
        Self::with_services(name, log, ServiceInventory::new())
    }

    pub fn with_services(
        name: impl Into<String>,
        log: Arc<dyn LogSink>,
        services: ServiceInventory,
    ) -> Self {
        Self {
            name: name.into(),
            registry: ModuleRegistry::new(),
            globals: GlobalStore::new(),
            services,
            log,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    pub fn globals(&self) -> &GlobalStore {
        &self.globals
    }

    pub fn services(&self) -> &ServiceInventory {
        &self.services
    }

    pub fn log_sink(&self) -> Arc<dyn LogSink> {
        Arc::clone(&self.log)
    }

    pub fn log(&self, channel: &str, message: &str) {
        self.log.log(channel, message);
    }

    pub fn set_global(&self, key: impl Into<String>, value: impl Into<Value>) -> bool {
        self.globals.set(key, value)
    }

    pub fn get_global(&self, key: &str) -> Option<Value> {
        self.globals.get(key)
    }

    pub fn service_list(&self) -> Vec<String> {
        self.services.list()
    }

    pub fn service_stats(&self) -> ServiceStats {
        self.services.stats()
    }

    /// Status of every sub-interface of every interface module, in registration order.
    pub fn interface_statuses(&self) -> Vec<SubInterfaceStatus> {
        self.registry
            .modules()
            .iter()
            .filter_map(|(_, module)| module.as_interface())
            .flat_map(|module| module.statuses())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::{MemorySink, STARTUP};
    use serde_json::json;

    #[test]
    fn contexts_are_isolated() {
        let one = HostContext::new("one", Arc::new(MemorySink::new()));
        let two = HostContext::new("two", Arc::new(MemorySink::new()));

        assert!(one.set_global("shared", json!({ "n": 1 })));
        assert_eq!(one.get_global("shared"), Some(json!({ "n": 1 })));
        assert_eq!(two.get_global("shared"), None);
    }

    #[test]
    fn log_goes_to_the_owned_sink() {
        let sink = Arc::new(MemorySink::new());
        let context = HostContext::new("host", sink.clone());
        context.log(STARTUP, "hello");
        assert_eq!(sink.entries().len(), 1);
        assert!(context.interface_statuses().is_empty());
    }
}
