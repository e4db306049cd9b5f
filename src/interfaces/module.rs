//! Interface modules.
//!
//! # Responsibilities
//! - Start every configured sub-interface (`InterfaceModule::start`)
//! - Match each sub-interface against the router set
//! - Drive the binding state machine from the activation outcome
//! - Stop active transports on teardown
//!
//! # Design Decisions
//! - Sub-interfaces start sequentially, in declaration order
//! - An unmapped sub-interface never reaches the protocol
//! - One failing sub-interface never affects its siblings

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::config::SubInterfaceTable;
use crate::interfaces::binding::{SubInterfaceBinding, SubInterfaceState, SubInterfaceStatus};
use crate::interfaces::protocol::{ActivationError, ActivationRequest, ActiveTransport, Protocol};
use crate::lifecycle::TeardownError;
use crate::observability::{LogSink, STARTUP};
use crate::registry::HostContext;
use crate::routing::RouterSet;

/// A named protocol family with its sub-interfaces.
#[derive(Debug)]
pub struct InterfaceModule {
    name: String,
    protocol: Arc<dyn Protocol>,
    settings: SubInterfaceTable,
    routers: Arc<RouterSet>,
    host: Weak<HostContext>,
    log: Arc<dyn LogSink>,
    bindings: Mutex<Vec<Arc<SubInterfaceBinding>>>,
    transports: Mutex<Vec<(String, Box<dyn ActiveTransport>)>>,
    closed: AtomicBool,
}

impl InterfaceModule {
    /// Create the module without starting anything.
    pub fn new(
        name: impl Into<String>,
        protocol: Arc<dyn Protocol>,
        settings: SubInterfaceTable,
        routers: Arc<RouterSet>,
        host: &Arc<HostContext>,
    ) -> Self {
        Self {
            name: name.into(),
            protocol,
            settings,
            routers,
            host: Arc::downgrade(host),
            log: host.log_sink(),
            bindings: Mutex::new(Vec::new()),
            transports: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// Create the module and start every configured sub-interface.
    pub async fn start(
        name: impl Into<String>,
        protocol: Arc<dyn Protocol>,
        settings: SubInterfaceTable,
        routers: Arc<RouterSet>,
        host: &Arc<HostContext>,
    ) -> Self {
        let module = Self::new(name, protocol, settings, routers, host);
        module.start_all().await;
        module
    }

    /// Start every sub-interface listed in this module's settings.
    pub async fn start_all(&self) {
        let names: Vec<String> = self.settings.keys().map(str::to_string).collect();
        for name in names {
            self.start_interface(&name).await;
        }
    }

    /// Start one sub-interface and return the state it settled in.
    ///
    /// Starting a name twice does not restart it; the existing state is returned.
    /// A name without a config entry is reported Failed and never activated.
    pub async fn start_interface(&self, interface: &str) -> SubInterfaceState {
        if self.closed.load(Ordering::SeqCst) {
            tracing::warn!(module = %self.name, interface = %interface, "Start requested after teardown");
            return SubInterfaceState::Failed {
                reason: format!("module {} has been shut down", self.name),
            };
        }

        let Some(settings) = self.settings.get(interface).cloned() else {
            self.log.log(
                STARTUP,
                &format!(
                    "{} interface '{}' cannot start: it is not configured",
                    self.name, interface
                ),
            );
            return SubInterfaceState::Failed {
                reason: format!("sub-interface {} is not configured", interface),
            };
        };

        let binding = {
            let mut bindings = self.bindings.lock();
            if let Some(existing) = bindings.iter().find(|b| b.interface() == interface) {
                tracing::debug!(module = %self.name, interface = %interface, "Sub-interface already started");
                return existing.state();
            }
            let binding = Arc::new(SubInterfaceBinding::new(
                self.name.clone(),
                interface,
                self.routers.match_interface(interface),
            ));
            bindings.push(Arc::clone(&binding));
            binding
        };

        if binding.is_unmapped() {
            self.log.log(
                STARTUP,
                &format!(
                    "{} interface '{}' cannot start: it is not mapped to any router",
                    self.name, interface
                ),
            );
            self.settle(&binding, SubInterfaceState::Skipped);
            return binding.state();
        }

        let request = ActivationRequest {
            module: self.name.clone(),
            interface: interface.to_string(),
            routers: binding.routers().to_vec(),
            settings,
            host: self.host.clone(),
        };

        match self.protocol.activate(request).await {
            Ok(transport) => {
                let endpoint = transport.local_addr();
                // Teardown flips `closed` under the same lock before draining.
                let orphan = {
                    let mut transports = self.transports.lock();
                    if self.closed.load(Ordering::SeqCst) {
                        self.settle(
                            &binding,
                            SubInterfaceState::Failed {
                                reason: format!(
                                    "module {} was shut down during activation",
                                    self.name
                                ),
                            },
                        );
                        Some(transport)
                    } else if self.settle(&binding, SubInterfaceState::Active { endpoint }) {
                        transports.push((interface.to_string(), transport));
                        None
                    } else {
                        Some(transport)
                    }
                };

                match orphan {
                    None => self.log.log(
                        STARTUP,
                        &format!(
                            "{} interface '{}' started for routers [{}]",
                            self.name,
                            interface,
                            binding.routers().join(", ")
                        ),
                    ),
                    Some(transport) => {
                        self.log.log(
                            STARTUP,
                            &format!(
                                "{} interface '{}' cannot stay active; stopping it",
                                self.name, interface
                            ),
                        );
                        if let Err(e) = transport.stop().await {
                            self.log.log(
                                STARTUP,
                                &format!(
                                    "{} interface '{}' failed to stop: {}",
                                    self.name, interface, e
                                ),
                            );
                        }
                    }
                }
            }
            Err(ActivationError::Unimplemented { protocol }) => {
                self.log.log(
                    STARTUP,
                    &format!(
                        "{} interface '{}' cannot start: protocol {} is not implemented",
                        self.name, interface, protocol
                    ),
                );
                self.settle(&binding, SubInterfaceState::Unimplemented);
            }
            Err(ActivationError::Transport(e)) => {
                self.log.log(
                    STARTUP,
                    &format!("{} interface '{}' failed to start: {}", self.name, interface, e),
                );
                self.settle(
                    &binding,
                    SubInterfaceState::Failed {
                        reason: e.to_string(),
                    },
                );
            }
        }

        binding.state()
    }

    fn settle(&self, binding: &SubInterfaceBinding, next: SubInterfaceState) -> bool {
        match binding.transition(next) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(module = %self.name, error = %e, "Ignoring late state change");
                false
            }
        }
    }

    /// Stop every active transport, most recently started first.
    pub async fn teardown(&self) -> Result<(), Vec<TeardownError>> {
        let transports = {
            let mut transports = self.transports.lock();
            self.closed.store(true, Ordering::SeqCst);
            std::mem::take(&mut *transports)
        };

        let mut errors = Vec::new();
        for (interface, transport) in transports.into_iter().rev() {
            if let Err(source) = transport.stop().await {
                errors.push(TeardownError::Transport {
                    module: self.name.clone(),
                    interface,
                    source,
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn protocol(&self) -> &Arc<dyn Protocol> {
        &self.protocol
    }

    /// Sub-interface names from config, in declaration order.
    pub fn configured_interfaces(&self) -> Vec<String> {
        self.settings.keys().map(str::to_string).collect()
    }

    pub fn binding(&self, interface: &str) -> Option<Arc<SubInterfaceBinding>> {
        self.bindings
            .lock()
            .iter()
            .find(|b| b.interface() == interface)
            .cloned()
    }

    pub fn state(&self, interface: &str) -> Option<SubInterfaceState> {
        self.binding(interface).map(|b| b.state())
    }

    /// Listening address of an Active sub-interface.
    pub fn endpoint(&self, interface: &str) -> Option<SocketAddr> {
        match self.state(interface)? {
            SubInterfaceState::Active { endpoint } => endpoint,
            _ => None,
        }
    }

    pub fn statuses(&self) -> Vec<SubInterfaceStatus> {
        self.bindings.lock().iter().map(|b| b.status()).collect()
    }

    pub fn active_count(&self) -> usize {
        self.transports.lock().len()
    }
}
