//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → HostConfig (validated, immutable)
//!     → read by the host at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no runtime reload
//! - All fields have defaults to allow minimal configs
//! - Router instances and sub-interfaces keep declaration order (ordered.rs)
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod ordered;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use ordered::OrderedMap;
pub use schema::{
    Fragment, HostConfig, HostSection, LoggingConfig, RouterConfig, RouterInstanceConfig,
    ServiceConfig, SubInterfaceTable,
};
pub use validation::{validate_config, ValidationError};
