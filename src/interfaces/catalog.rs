//! Protocol lookup by interface module name.

use std::collections::HashMap;
use std::sync::Arc;

use crate::interfaces::http::HttpProtocol;
use crate::interfaces::protocol::Protocol;
use crate::interfaces::unimplemented::UnimplementedProtocol;

/// Maps interface module names (case-insensitive) to protocols.
#[derive(Debug, Clone, Default)]
pub struct ProtocolCatalog {
    protocols: HashMap<String, Arc<dyn Protocol>>,
}

impl ProtocolCatalog {
    /// A catalog with nothing registered; every module resolves to unimplemented.
    pub fn empty() -> Self {
        Self::default()
    }

    /// HTTP and HTTPS, plus NanoMSG declared without a transport.
    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        catalog.register("HTTP", Arc::new(HttpProtocol::plain()));
        catalog.register("HTTPS", Arc::new(HttpProtocol::tls()));
        catalog.register("NanoMSG", Arc::new(UnimplementedProtocol::new("NanoMSG")));
        catalog
    }

    /// Register or replace the protocol for `module`.
    pub fn register(&mut self, module: &str, protocol: Arc<dyn Protocol>) {
        self.protocols.insert(module.to_lowercase(), protocol);
    }

    /// Protocol for `module`. Unknown modules get an unimplemented protocol.
    pub fn resolve(&self, module: &str) -> Arc<dyn Protocol> {
        match self.protocols.get(&module.to_lowercase()) {
            Some(protocol) => Arc::clone(protocol),
            None => {
                tracing::debug!(module = %module, "No protocol registered, treating as unimplemented");
                Arc::new(UnimplementedProtocol::new(module))
            }
        }
    }

    pub fn contains(&self, module: &str) -> bool {
        self.protocols.contains_key(&module.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_resolves_case_insensitively() {
        let catalog = ProtocolCatalog::builtin();
        assert_eq!(catalog.resolve("http").name(), "HTTP");
        assert_eq!(catalog.resolve("Https").name(), "HTTPS");
        assert_eq!(catalog.resolve("nanomsg").name(), "NanoMSG");
        assert!(catalog.contains("NANOMSG"));
    }

    #[test]
    fn unknown_module_falls_back_to_unimplemented() {
        let catalog = ProtocolCatalog::empty();
        assert!(!catalog.contains("Gopher"));
        assert_eq!(catalog.resolve("Gopher").name(), "Gopher");
    }
}
