//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber for the binary
//! - Define the `LogSink` boundary every module logs through
//! - Provide an in-memory sink for embedders and tests
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Log level configurable via config and environment (`RUST_LOG` wins)
//! - A sink never fails and never blocks the caller for long

use parking_lot::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Channel for sub-interface startup outcomes.
pub const STARTUP: &str = "startup";

/// Channel for teardown outcomes.
pub const SHUTDOWN: &str = "shutdown";

/// Destination for (channel, message) log lines.
pub trait LogSink: Send + Sync + std::fmt::Debug {
    fn log(&self, channel: &str, message: &str);
}

/// Forwards every line to `tracing` at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, channel: &str, message: &str) {
        tracing::info!(channel = %channel, "{}", message);
    }
}

/// A recorded log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub channel: String,
    pub message: String,
}

/// Keeps every line in memory and also forwards it to `tracing`.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    /// Lines on `channel` whose message contains `needle`.
    pub fn matching(&self, channel: &str, needle: &str) -> Vec<LogEntry> {
        self.entries
            .lock()
            .iter()
            .filter(|e| e.channel == channel && e.message.contains(needle))
            .cloned()
            .collect()
    }
}

impl LogSink for MemorySink {
    fn log(&self, channel: &str, message: &str) {
        tracing::debug!(channel = %channel, "{}", message);
        self.entries.lock().push(LogEntry {
            channel: channel.to_string(),
            message: message.to_string(),
        });
    }
}

/// Install the global tracing subscriber.
///
/// A bare level such as `info` is scoped to this crate; anything containing
/// `=` or `,` is used as a full filter directive.
pub fn init_logging(config: &LoggingConfig) {
    let fallback = if config.level.contains('=') || config.level.contains(',') {
        config.level.clone()
    } else {
        format!("blackrock={},tower_http={}", config.level, config.level)
    };

    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
