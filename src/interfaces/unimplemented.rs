//! Protocols that are declared but have no transport behind them.
//!
//! NanoMSG is configured this way out of the box, and so is any interface
//! module whose name has no registered protocol.

use async_trait::async_trait;

use crate::interfaces::protocol::{ActivationError, ActivationRequest, ActiveTransport, Protocol};

#[derive(Debug, Clone)]
pub struct UnimplementedProtocol {
    name: String,
}

impl UnimplementedProtocol {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl Protocol for UnimplementedProtocol {
    fn name(&self) -> &str {
        &self.name
    }

    async fn activate(
        &self,
        _request: ActivationRequest,
    ) -> Result<Box<dyn ActiveTransport>, ActivationError> {
        Err(ActivationError::Unimplemented {
            protocol: self.name.clone(),
        })
    }
}
