//! Shared utilities for integration tests.

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use blackrock::config::Fragment;
use blackrock::interfaces::{
    ActivationError, ActivationRequest, ActiveTransport, Protocol, TransportError,
};

/// Order in which scripted transports were stopped, as "module/interface".
pub type StopLog = Arc<Mutex<Vec<String>>>;

/// Holds activations until the test lets them through.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct Gate {
    /// Signalled each time an activation reaches the gate.
    pub entered: Notify,
    /// One permit lets one waiting activation continue.
    pub release: Notify,
}

/// A protocol whose outcomes are decided by the test.
#[derive(Debug, Clone)]
pub struct ScriptedProtocol {
    name: String,
    refuse: HashSet<String>,
    fail_stop: bool,
    stop_delay: Option<Duration>,
    stops: StopLog,
    activations: Arc<Mutex<Vec<ActivationRequest>>>,
    gate: Option<Arc<Gate>>,
}

#[allow(dead_code)]
impl ScriptedProtocol {
    pub fn new(name: &str, stops: StopLog) -> Self {
        Self {
            name: name.to_string(),
            refuse: HashSet::new(),
            fail_stop: false,
            stop_delay: None,
            stops,
            activations: Arc::default(),
            gate: None,
        }
    }

    /// Every activation waits at `gate` before it completes.
    pub fn gated(mut self, gate: Arc<Gate>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Activation of `interface` fails with a transport error.
    pub fn refusing(mut self, interface: &str) -> Self {
        self.refuse.insert(interface.to_string());
        self
    }

    /// Every transport fails when stopped.
    pub fn failing_stop(mut self) -> Self {
        self.fail_stop = true;
        self
    }

    /// Every transport takes this long to stop.
    pub fn slow_stop(mut self, delay: Duration) -> Self {
        self.stop_delay = Some(delay);
        self
    }

    pub fn activations(&self) -> Vec<ActivationRequest> {
        self.activations.lock().clone()
    }
}

#[async_trait]
impl Protocol for ScriptedProtocol {
    fn name(&self) -> &str {
        &self.name
    }

    async fn activate(
        &self,
        request: ActivationRequest,
    ) -> Result<Box<dyn ActiveTransport>, ActivationError> {
        self.activations.lock().push(request.clone());
        if let Some(gate) = &self.gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        if self.refuse.contains(&request.interface) {
            return Err(TransportError::Other(format!("{} refused", request.interface)).into());
        }
        Ok(Box::new(ScriptedTransport {
            label: format!("{}/{}", request.module, request.interface),
            fail_stop: self.fail_stop,
            stop_delay: self.stop_delay,
            stops: self.stops.clone(),
        }))
    }
}

#[derive(Debug)]
struct ScriptedTransport {
    label: String,
    fail_stop: bool,
    stop_delay: Option<Duration>,
    stops: StopLog,
}

#[async_trait]
impl ActiveTransport for ScriptedTransport {
    fn local_addr(&self) -> Option<SocketAddr> {
        None
    }

    async fn stop(self: Box<Self>) -> Result<(), TransportError> {
        if let Some(delay) = self.stop_delay {
            tokio::time::sleep(delay).await;
        }
        self.stops.lock().push(self.label.clone());
        if self.fail_stop {
            Err(TransportError::Other(format!("{} would not stop", self.label)))
        } else {
            Ok(())
        }
    }
}

/// An empty settings fragment.
#[allow(dead_code)]
pub fn fragment() -> Fragment {
    Fragment::new()
}

/// Settings for an HTTP sub-interface on an ephemeral local port.
#[allow(dead_code)]
pub fn local_http() -> Fragment {
    let mut settings = Fragment::new();
    settings.insert("bind_address".into(), "127.0.0.1:0".into());
    settings
}
