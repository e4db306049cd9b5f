//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Modules produce (channel, message) lines:
//!     → LogSink owned by the host context
//!     → TracingSink (default) → tracing subscriber → stdout
//!     → MemorySink (tests, embedders) → in-memory list
//! ```
//!
//! # Design Decisions
//! - Structured logging through `tracing` everywhere else in the crate
//! - The sink boundary keeps modules testable without a global subscriber

pub mod logging;

pub use logging::{init_logging, LogEntry, LogSink, MemorySink, TracingSink, SHUTDOWN, STARTUP};
