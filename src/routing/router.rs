//! Router instances and the sub-interface match algorithm.
//!
//! # Responsibilities
//! - Build router instances from config, in declaration order
//! - Return every router that accepts a given sub-interface name
//! - Produce the full binding plan for a config without starting anything
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(routers × entries) linear scan; router counts are small
//! - An empty result is not an error here; the caller decides what it means

use serde::Serialize;

use crate::config::{HostConfig, RouterConfig};
use crate::routing::matcher::InterfaceMatcher;

/// A named router and the sub-interfaces it accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterInstance {
    name: String,
    accepts: Vec<InterfaceMatcher>,
}

impl RouterInstance {
    pub fn new<I, S>(name: impl Into<String>, interfaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let accepts = interfaces
            .into_iter()
            .filter(|entry| !entry.as_ref().trim().is_empty())
            .map(|entry| InterfaceMatcher::parse(entry.as_ref()))
            .collect();
        Self {
            name: name.into(),
            accepts,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn matchers(&self) -> &[InterfaceMatcher] {
        &self.accepts
    }

    /// Returns true if any accepted entry matches `interface`.
    pub fn accepts(&self, interface: &str) -> bool {
        self.accepts.iter().any(|m| m.matches(interface))
    }
}

/// All configured routers.
#[derive(Debug, Clone, Default)]
pub struct RouterSet {
    routers: Vec<RouterInstance>,
}

impl RouterSet {
    pub fn new(routers: Vec<RouterInstance>) -> Self {
        Self { routers }
    }

    /// Compile the `[router]` section.
    pub fn from_config(config: &RouterConfig) -> Self {
        let routers = config
            .instances
            .iter()
            .map(|(name, instance)| RouterInstance::new(name, &instance.interfaces))
            .collect();
        Self { routers }
    }

    /// Names of every router accepting `interface`, in declaration order.
    pub fn match_interface(&self, interface: &str) -> Vec<String> {
        self.routers
            .iter()
            .filter(|router| router.accepts(interface))
            .map(|router| router.name.clone())
            .collect()
    }

    pub fn routers(&self) -> &[RouterInstance] {
        &self.routers
    }

    pub fn len(&self) -> usize {
        self.routers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routers.is_empty()
    }

    /// Match every configured sub-interface without activating anything.
    pub fn plan(&self, config: &HostConfig) -> Vec<PlannedBinding> {
        config
            .interfaces
            .iter()
            .flat_map(|(module, subs)| {
                subs.keys().map(move |sub| PlannedBinding {
                    module: module.to_string(),
                    interface: sub.to_string(),
                    routers: self.match_interface(sub),
                })
            })
            .collect()
    }
}

/// One row of the binding plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedBinding {
    pub module: String,
    pub interface: String,
    pub routers: Vec<String>,
}
