//! Module registry subsystem.
//!
//! # Data Flow
//! ```text
//! Host startup
//!     → context.rs (HostContext: registry + globals + services + log sink)
//!     → modules.rs register("router", Module::Router)
//!     → modules.rs register(<interface name>, Module::Interface) ...
//!
//! Any caller:
//!     resolve(name) → Arc<Module> → as_interface() → start_interface()
//! ```
//!
//! # Design Decisions
//! - The context is passed explicitly, never a global singleton
//! - Module capabilities are enum variants decided at compile time
//! - Names are case-insensitive for lookup and duplicate detection

pub mod context;
pub mod module;
pub mod modules;

pub use context::HostContext;
pub use module::{Module, ModuleKind};
pub use modules::{ModuleRegistry, RegistryError};

/// Registry name of the router set.
pub const ROUTER_MODULE: &str = "router";
