//! Sub-interface binding state machine.
//!
//! # States
//! - Pending: matched against the router set, outcome not yet known
//! - Skipped: no router accepts the sub-interface (configuration omission)
//! - Unimplemented: the protocol has no activation behavior
//! - Active: transport is up
//! - Failed: transport activation returned an error
//!
//! # State Transitions
//! ```text
//! Pending → Skipped | Unimplemented | Active | Failed
//! ```
//! Every state but Pending is terminal. The transition is taken under a
//! lock, so concurrent completion reports cannot both win.

use std::fmt;
use std::net::SocketAddr;

use parking_lot::Mutex;
use serde::Serialize;

/// Lifecycle state of one sub-interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SubInterfaceState {
    Pending,
    Skipped,
    Unimplemented,
    Active { endpoint: Option<SocketAddr> },
    Failed { reason: String },
}

impl SubInterfaceState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SubInterfaceState::Pending)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, SubInterfaceState::Active { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            SubInterfaceState::Pending => "pending",
            SubInterfaceState::Skipped => "skipped",
            SubInterfaceState::Unimplemented => "unimplemented",
            SubInterfaceState::Active { .. } => "active",
            SubInterfaceState::Failed { .. } => "failed",
        }
    }
}

impl fmt::Display for SubInterfaceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubInterfaceState::Active { endpoint: Some(addr) } => write!(f, "active on {addr}"),
            SubInterfaceState::Failed { reason } => write!(f, "failed: {reason}"),
            other => f.write_str(other.label()),
        }
    }
}

/// Rejected state change.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("sub-interface `{interface}` already settled as {current}")]
    AlreadySettled {
        interface: String,
        current: SubInterfaceState,
    },
    #[error("sub-interface `{interface}` cannot move back to pending")]
    NotTerminal { interface: String },
}

/// The match result for one sub-interface plus its current state.
#[derive(Debug)]
pub struct SubInterfaceBinding {
    module: String,
    interface: String,
    routers: Vec<String>,
    state: Mutex<SubInterfaceState>,
}

impl SubInterfaceBinding {
    pub fn new(module: impl Into<String>, interface: impl Into<String>, routers: Vec<String>) -> Self {
        Self {
            module: module.into(),
            interface: interface.into(),
            routers,
            state: Mutex::new(SubInterfaceState::Pending),
        }
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn interface(&self) -> &str {
        &self.interface
    }

    /// Routers that accepted this sub-interface, in declaration order.
    pub fn routers(&self) -> &[String] {
        &self.routers
    }

    pub fn is_unmapped(&self) -> bool {
        self.routers.is_empty()
    }

    pub fn state(&self) -> SubInterfaceState {
        self.state.lock().clone()
    }

    /// Move from Pending to a terminal state. Fails if already settled.
    pub fn transition(&self, next: SubInterfaceState) -> Result<(), TransitionError> {
        if !next.is_terminal() {
            return Err(TransitionError::NotTerminal {
                interface: self.interface.clone(),
            });
        }

        let mut state = self.state.lock();
        if state.is_terminal() {
            return Err(TransitionError::AlreadySettled {
                interface: self.interface.clone(),
                current: state.clone(),
            });
        }

        tracing::debug!(
            module = %self.module,
            interface = %self.interface,
            state = next.label(),
            "Sub-interface settled"
        );
        *state = next;
        Ok(())
    }

    pub fn status(&self) -> SubInterfaceStatus {
        SubInterfaceStatus {
            module: self.module.clone(),
            interface: self.interface.clone(),
            routers: self.routers.clone(),
            state: self.state(),
        }
    }
}

/// Snapshot of a binding for operational tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubInterfaceStatus {
    pub module: String,
    pub interface: String,
    pub routers: Vec<String>,
    #[serde(flatten)]
    pub state: SubInterfaceState,
}
