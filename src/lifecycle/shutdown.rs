//! Shutdown coordination for the host.

use std::sync::Arc;
use std::time::Duration;

use crate::interfaces::TransportError;
use crate::observability::{LogSink, SHUTDOWN};
use crate::registry::Module;

/// A module teardown hook that did not finish cleanly.
#[derive(Debug, thiserror::Error)]
pub enum TeardownError {
    #[error("module `{module}` failed to stop sub-interface `{interface}`: {source}")]
    Transport {
        module: String,
        interface: String,
        #[source]
        source: TransportError,
    },
    #[error("module `{module}` did not finish teardown within {timeout:?}")]
    TimedOut { module: String, timeout: Duration },
}

impl TeardownError {
    pub fn module(&self) -> &str {
        match self {
            TeardownError::Transport { module, .. } | TeardownError::TimedOut { module, .. } => {
                module
            }
        }
    }
}

/// What a call to `shutdown` did.
#[derive(Debug, Default)]
pub struct ShutdownReport {
    /// Modules whose teardown hook ran, in the order it ran.
    pub torn_down: Vec<String>,
    /// Hook failures, collected rather than aborting the sequence.
    pub errors: Vec<TeardownError>,
    /// True when the host was already shut down (or shutting down) by an earlier call.
    pub already_stopped: bool,
}

impl ShutdownReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Run teardown hooks in reverse registration order.
///
/// Every hook is awaited (or timed out) before the next starts; failures are
/// recorded and the sequence continues.
pub async fn teardown_modules(
    modules: Vec<(String, Arc<Module>)>,
    timeout: Duration,
    log: &dyn LogSink,
) -> ShutdownReport {
    let mut report = ShutdownReport::default();

    for (name, module) in modules.into_iter().rev() {
        match tokio::time::timeout(timeout, module.teardown()).await {
            Ok(Ok(())) => {
                log.log(SHUTDOWN, &format!("{} stopped", name));
            }
            Ok(Err(errors)) => {
                for error in &errors {
                    log.log(SHUTDOWN, &error.to_string());
                }
                report.errors.extend(errors);
            }
            Err(_) => {
                let error = TeardownError::TimedOut {
                    module: name.clone(),
                    timeout,
                };
                log.log(SHUTDOWN, &error.to_string());
                report.errors.push(error);
            }
        }
        report.torn_down.push(name);
    }

    report
}
