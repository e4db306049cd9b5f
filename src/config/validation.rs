//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reject blank names that could never be matched
//! - Detect module names that collide once case is ignored
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: HostConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashMap;

use crate::config::schema::HostConfig;
use crate::registry::ROUTER_MODULE;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("router instance name must not be blank")]
    BlankRouterName,
    #[error("router `{router}` lists a blank interface name")]
    BlankInterfaceEntry { router: String },
    #[error("interface module name must not be blank")]
    BlankModuleName,
    #[error("interface module `{module}` declares a blank sub-interface name")]
    BlankSubInterface { module: String },
    #[error("module names `{first}` and `{second}` collide (names are case-insensitive)")]
    ModuleNameCollision { first: String, second: String },
    #[error("service `{service}` declares a blank route")]
    BlankRoute { service: String },
}

/// Check the configuration for semantic problems.
pub fn validate_config(config: &HostConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (name, instance) in config.router.instances.iter() {
        if name.trim().is_empty() {
            errors.push(ValidationError::BlankRouterName);
        }
        if instance.interfaces.iter().any(|entry| entry.trim().is_empty()) {
            errors.push(ValidationError::BlankInterfaceEntry {
                router: name.to_string(),
            });
        }
    }

    let mut seen: HashMap<String, String> = HashMap::new();
    seen.insert(ROUTER_MODULE.to_lowercase(), ROUTER_MODULE.to_string());
    for (module, subs) in config.interfaces.iter() {
        if module.trim().is_empty() {
            errors.push(ValidationError::BlankModuleName);
        }
        if let Some(first) = seen.insert(module.to_lowercase(), module.to_string()) {
            errors.push(ValidationError::ModuleNameCollision {
                first,
                second: module.to_string(),
            });
        }
        if subs.keys().any(|sub| sub.trim().is_empty()) {
            errors.push(ValidationError::BlankSubInterface {
                module: module.to_string(),
            });
        }
    }

    for (service, svc) in config.services.iter() {
        if svc.routes.iter().any(|route| route.trim().is_empty()) {
            errors.push(ValidationError::BlankRoute {
                service: service.to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
