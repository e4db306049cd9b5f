//! Protocol activation contract.
//!
//! A protocol turns one matched sub-interface into a running transport.
//! The interface module owns the state machine; the protocol only reports
//! what happened.

use std::net::SocketAddr;
use std::sync::Weak;

use async_trait::async_trait;

use crate::config::Fragment;
use crate::registry::HostContext;

/// Failure inside a protocol's transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
    #[error("TLS setup failed: {0}")]
    Tls(String),
    #[error("transport task failed: {0}")]
    Task(String),
    #[error("{0}")]
    Other(String),
}

/// Outcome of an activation attempt that did not produce a transport.
#[derive(Debug, thiserror::Error)]
pub enum ActivationError {
    /// The protocol declares the capability but has no behavior behind it.
    #[error("protocol `{protocol}` has no activation behavior")]
    Unimplemented { protocol: String },
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Everything a protocol gets to know about the sub-interface it activates.
#[derive(Debug, Clone)]
pub struct ActivationRequest {
    pub module: String,
    pub interface: String,
    pub routers: Vec<String>,
    pub settings: Fragment,
    /// Back-reference to the host; never keeps it alive.
    pub host: Weak<HostContext>,
}

/// A protocol family such as HTTP.
#[async_trait]
pub trait Protocol: Send + Sync + std::fmt::Debug {
    /// Protocol name used in logs.
    fn name(&self) -> &str;

    /// Bring one sub-interface up.
    async fn activate(
        &self,
        request: ActivationRequest,
    ) -> Result<Box<dyn ActiveTransport>, ActivationError>;
}

/// A running sub-interface transport.
#[async_trait]
pub trait ActiveTransport: Send + Sync + std::fmt::Debug {
    /// Address the transport listens on, if it has one.
    fn local_addr(&self) -> Option<SocketAddr>;

    /// Stop the transport and wait for it to finish.
    async fn stop(self: Box<Self>) -> Result<(), TransportError>;
}
