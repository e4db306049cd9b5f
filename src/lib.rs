//! Blackrock modular application host.
//!
//! Loads interface modules (HTTP, HTTPS, NanoMSG, ...) and binds each of
//! their sub-interfaces to the routers that accept them, with a shared
//! module registry, global state and a ready/shutdown lifecycle.

pub mod config;
pub mod interfaces;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod registry;
pub mod routing;
pub mod state;

pub use config::HostConfig;
pub use lifecycle::{Host, HostError, LifecycleState, ShutdownReport};
pub use registry::{HostContext, Module, RegistryError};
