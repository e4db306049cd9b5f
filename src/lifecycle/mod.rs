//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Build context → Register router set → Start interface modules → Ready
//!
//! Readiness (readiness.rs):
//!     ready(callback) before Ready → queued, run once at the transition
//!     ready(callback) after Ready  → run immediately
//!
//! Shutdown (shutdown.rs):
//!     Ready/Initializing → ShuttingDown → teardown hooks (reverse order) → Stopped
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → binary calls shutdown()
//! ```
//!
//! # Design Decisions
//! - Ordered startup: context first, then routers, then interfaces
//! - Lifecycle state is monotonic (state.rs)
//! - Teardown failures are collected, never abort the sequence
//! - Each teardown hook has a timeout

pub mod readiness;
pub mod shutdown;
pub mod signals;
pub mod startup;
pub mod state;

pub use readiness::Readiness;
pub use shutdown::{teardown_modules, ShutdownReport, TeardownError};
pub use startup::{Host, HostBuilder, HostError};
pub use state::{LifecycleCell, LifecycleState};
