//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the host context (registry, global state, services, log sink)
//! - Register the router set, then every interface module, in config order
//! - Flip the host to Ready once every module is initialized
//! - Tear modules down in reverse order on shutdown
//!
//! # Design Decisions
//! - Fail fast: registry errors are fatal and returned to the caller
//! - Sub-interface failures are module-local and never stop startup
//! - Modules initialize in order, not concurrently

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::{watch, Mutex as AsyncMutex};

use crate::config::{ConfigError, HostConfig};
use crate::interfaces::{
    InterfaceModule, Protocol, ProtocolCatalog, SubInterfaceState, SubInterfaceStatus,
};
use crate::lifecycle::readiness::Readiness;
use crate::lifecycle::shutdown::{teardown_modules, ShutdownReport};
use crate::lifecycle::state::{LifecycleCell, LifecycleState};
use crate::observability::{LogSink, TracingSink};
use crate::registry::{HostContext, Module, RegistryError, ROUTER_MODULE};
use crate::routing::{PlannedBinding, RouterSet};
use crate::state::{ServiceInventory, ServiceStats};

/// Errors that stop the host from starting.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("host has already been started")]
    AlreadyStarted,
    #[error("host is {0} and cannot start")]
    NotStartable(LifecycleState),
}

/// Configures a [`Host`] before it is built.
#[derive(Debug)]
pub struct HostBuilder {
    config: HostConfig,
    catalog: ProtocolCatalog,
    log: Arc<dyn LogSink>,
}

impl HostBuilder {
    /// Use `protocol` for the interface module named `module`.
    pub fn protocol(mut self, module: &str, protocol: Arc<dyn Protocol>) -> Self {
        self.catalog.register(module, protocol);
        self
    }

    /// Replace the whole protocol catalog.
    pub fn catalog(mut self, catalog: ProtocolCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn log_sink(mut self, log: Arc<dyn LogSink>) -> Self {
        self.log = log;
        self
    }

    pub fn build(self) -> Host {
        let services = ServiceInventory::from_config(&self.config.services);
        let context = Arc::new(HostContext::with_services(
            self.config.host.name.clone(),
            self.log,
            services,
        ));
        let (stopped, _) = watch::channel(false);

        Host {
            config: self.config,
            catalog: self.catalog,
            context,
            lifecycle: LifecycleCell::new(),
            readiness: Readiness::new(),
            starting: AtomicBool::new(false),
            startup_gate: AsyncMutex::new(()),
            stopped,
        }
    }
}

/// The module host: owns the context and drives the lifecycle.
#[derive(Debug)]
pub struct Host {
    config: HostConfig,
    catalog: ProtocolCatalog,
    context: Arc<HostContext>,
    lifecycle: LifecycleCell,
    readiness: Readiness,
    starting: AtomicBool,
    /// Held for the whole of `start`; shutdown takes it before tearing down.
    startup_gate: AsyncMutex<()>,
    stopped: watch::Sender<bool>,
}

impl Host {
    pub fn builder(config: HostConfig) -> HostBuilder {
        HostBuilder {
            config,
            catalog: ProtocolCatalog::builtin(),
            log: Arc::new(TracingSink),
        }
    }

    /// A host with the built-in protocols, logging through `tracing`.
    pub fn new(config: HostConfig) -> Self {
        Self::builder(config).build()
    }

    /// Initialize every module and become Ready.
    pub async fn start(&self) -> Result<(), HostError> {
        if self.starting.swap(true, Ordering::SeqCst) {
            return Err(HostError::AlreadyStarted);
        }
        let _gate = self.startup_gate.lock().await;
        let state = self.lifecycle.get();
        if state != LifecycleState::Initializing {
            return Err(HostError::NotStartable(state));
        }

        tracing::info!(
            host = %self.context.name(),
            routers = self.config.router.instances.len(),
            interface_modules = self.config.interfaces.len(),
            "Host starting"
        );

        let registry = self.context.registry();
        registry.register(
            ROUTER_MODULE,
            Module::Router(Arc::new(RouterSet::from_config(&self.config.router))),
        )?;
        let routers = registry
            .resolve(ROUTER_MODULE)?
            .as_router_set()
            .cloned()
            .ok_or_else(|| RegistryError::UnknownModule(ROUTER_MODULE.to_string()))?;

        for (name, sub_interfaces) in self.config.interfaces.iter() {
            // Registered before any activation so shutdown's teardown covers it.
            let module = Arc::new(InterfaceModule::new(
                name,
                self.catalog.resolve(name),
                sub_interfaces.clone(),
                Arc::clone(&routers),
                &self.context,
            ));
            registry.register(name, Module::Interface(Arc::clone(&module)))?;

            for interface in module.configured_interfaces() {
                let state = self.lifecycle.get();
                if state != LifecycleState::Initializing {
                    tracing::warn!(module = %name, interface = %interface, state = %state, "Shutdown requested during startup");
                    return Err(HostError::NotStartable(state));
                }
                module.start_interface(&interface).await;
            }
        }

        if self
            .lifecycle
            .advance(LifecycleState::Initializing, LifecycleState::Ready)
        {
            tracing::info!(modules = registry.len(), "Host ready");
            self.readiness.mark_ready();
            Ok(())
        } else {
            Err(HostError::NotStartable(self.lifecycle.get()))
        }
    }

    /// Run `callback` once the host is Ready, or right away if it already is.
    pub fn ready<F>(&self, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.readiness.ready(callback);
    }

    /// Resolve once the host is Ready.
    pub async fn wait_ready(&self) {
        self.readiness.wait().await;
    }

    pub fn is_ready(&self) -> bool {
        self.readiness.is_ready()
    }

    pub fn state(&self) -> LifecycleState {
        self.lifecycle.get()
    }

    /// Tear every module down in reverse initialization order.
    ///
    /// A call racing `start` waits for it to return, so modules it was still
    /// activating are torn down too. A second call returns a no-op report; one
    /// racing an in-progress shutdown waits for it to finish first.
    pub async fn shutdown(&self) -> ShutdownReport {
        match self.lifecycle.advance_to(LifecycleState::ShuttingDown) {
            Ok(previous) => {
                tracing::info!(from = %previous, "Host shutting down");
                // Wait for an in-flight start to hand over every module it registered.
                let _gate = self.startup_gate.lock().await;
                let timeout = Duration::from_secs(self.config.host.teardown_timeout_secs);
                let log = self.context.log_sink();
                let report =
                    teardown_modules(self.context.registry().modules(), timeout, log.as_ref())
                        .await;

                self.lifecycle
                    .advance(LifecycleState::ShuttingDown, LifecycleState::Stopped);
                self.stopped.send_replace(true);
                tracing::info!(
                    modules = report.torn_down.len(),
                    errors = report.errors.len(),
                    "Host stopped"
                );
                report
            }
            Err(current) => {
                tracing::debug!(state = %current, "Shutdown already requested");
                let mut stopped = self.stopped.subscribe();
                let _ = stopped.wait_for(|done| *done).await;
                ShutdownReport {
                    already_stopped: true,
                    ..ShutdownReport::default()
                }
            }
        }
    }

    /// Start one sub-interface of the named interface module.
    pub async fn start_interface(
        &self,
        module: &str,
        interface: &str,
    ) -> Result<SubInterfaceState, RegistryError> {
        let resolved = self.context.registry().resolve(module)?;
        let interfaces = resolved
            .as_interface()
            .ok_or_else(|| RegistryError::NotAnInterface(module.to_string()))?;
        Ok(interfaces.start_interface(interface).await)
    }

    pub fn interface(&self, module: &str) -> Result<Arc<InterfaceModule>, RegistryError> {
        let resolved = self.context.registry().resolve(module)?;
        resolved
            .as_interface()
            .cloned()
            .ok_or_else(|| RegistryError::NotAnInterface(module.to_string()))
    }

    pub fn interface_statuses(&self) -> Vec<SubInterfaceStatus> {
        self.context.interface_statuses()
    }

    /// Router matches for every configured sub-interface, computed from config.
    pub fn binding_table(&self) -> Vec<PlannedBinding> {
        RouterSet::from_config(&self.config.router).plan(&self.config)
    }

    pub fn service_list(&self) -> Vec<String> {
        self.context.service_list()
    }

    pub fn service_stats(&self) -> ServiceStats {
        self.context.service_stats()
    }

    pub fn set_global(&self, key: impl Into<String>, value: impl Into<Value>) -> bool {
        self.context.set_global(key, value)
    }

    pub fn get_global(&self, key: &str) -> Option<Value> {
        self.context.get_global(key)
    }

    pub fn context(&self) -> &Arc<HostContext> {
        &self.context
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }
}
