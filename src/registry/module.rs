//! Module variants held by the registry.

use std::fmt;
use std::sync::Arc;

use crate::interfaces::InterfaceModule;
use crate::lifecycle::TeardownError;
use crate::routing::RouterSet;

/// What kind of module a registry entry is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleKind {
    Router,
    Interface,
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleKind::Router => f.write_str("router"),
            ModuleKind::Interface => f.write_str("interface"),
        }
    }
}

/// A loaded module. Capabilities are reached through the variant, not by probing.
#[derive(Debug, Clone)]
pub enum Module {
    /// The router set; has no teardown work.
    Router(Arc<RouterSet>),
    /// An interface module; supports `start_interface` and stops its transports on teardown.
    Interface(Arc<InterfaceModule>),
}

impl Module {
    pub fn kind(&self) -> ModuleKind {
        match self {
            Module::Router(_) => ModuleKind::Router,
            Module::Interface(_) => ModuleKind::Interface,
        }
    }

    pub fn as_interface(&self) -> Option<&Arc<InterfaceModule>> {
        match self {
            Module::Interface(module) => Some(module),
            _ => None,
        }
    }

    pub fn as_router_set(&self) -> Option<&Arc<RouterSet>> {
        match self {
            Module::Router(routers) => Some(routers),
            _ => None,
        }
    }

    /// Run this module's teardown hook.
    pub async fn teardown(&self) -> Result<(), Vec<TeardownError>> {
        match self {
            Module::Router(_) => Ok(()),
            Module::Interface(module) => module.teardown().await,
        }
    }
}
