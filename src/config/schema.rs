//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the host.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::config::ordered::OrderedMap;

/// Opaque per-sub-interface settings, handed to the protocol unchanged.
pub type Fragment = toml::Table;

/// Sub-interface name to its settings, in declaration order.
pub type SubInterfaceTable = OrderedMap<Fragment>;

/// Root configuration for the host.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct HostConfig {
    /// Process-level settings.
    pub host: HostSection,

    /// Log filter settings.
    pub logging: LoggingConfig,

    /// Router instances and the interfaces they accept.
    pub router: RouterConfig,

    /// Interface modules, keyed by module name, then by sub-interface name.
    pub interfaces: OrderedMap<SubInterfaceTable>,

    /// Services known to the host.
    pub services: OrderedMap<ServiceConfig>,
}

/// Process-level settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HostSection {
    /// Name reported on the status endpoint and in logs.
    pub name: String,

    /// Upper bound for a single module's teardown hook, in seconds.
    pub teardown_timeout_secs: u64,
}

impl Default for HostSection {
    fn default() -> Self {
        Self {
            name: "blackrock".to_string(),
            teardown_timeout_secs: 10,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter directive.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// The `[router]` section.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Router instances in declaration order.
    pub instances: OrderedMap<RouterInstanceConfig>,
}

/// A single router instance.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterInstanceConfig {
    /// Accepted interface sub-names; `*` accepts every sub-interface.
    pub interfaces: Vec<String>,
}

/// A service and the routes it exposes.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    pub routes: Vec<String>,
}

impl HostConfig {
    /// Add a router instance. Used by embedders that build config in code.
    pub fn with_router<I, S>(mut self, name: &str, interfaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.router.instances.insert(
            name,
            RouterInstanceConfig {
                interfaces: interfaces.into_iter().map(Into::into).collect(),
            },
        );
        self
    }

    /// Add a sub-interface to an interface module, creating the module entry if needed.
    pub fn with_interface(mut self, module: &str, sub_interface: &str, fragment: Fragment) -> Self {
        let mut table = self.interfaces.get(module).cloned().unwrap_or_default();
        table.insert(sub_interface, fragment);
        self.interfaces.insert(module, table);
        self
    }

    /// Add a service with its routes.
    pub fn with_service<I, S>(mut self, name: &str, routes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.services.insert(
            name,
            ServiceConfig {
                routes: routes.into_iter().map(Into::into).collect(),
            },
        );
        self
    }
}
