//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Sub-interface name (e.g. "HTTP", "NanoMSG-default")
//!     → router.rs (scan routers in declaration order)
//!     → matcher.rs (evaluate each accepted-interface rule)
//!     → Return: names of every accepting router (possibly none)
//!
//! Router Compilation (at startup):
//!     router.instances.<name>.interfaces
//!     → Parse entries into Wildcard | Exact rules
//!     → Freeze as immutable RouterSet
//! ```
//!
//! # Design Decisions
//! - Routers compiled at startup, immutable at runtime
//! - Result is a set, not a single winner
//! - Deterministic: same input always yields the same ordered result

pub mod matcher;
pub mod router;

pub use matcher::{InterfaceMatcher, WILDCARD};
pub use router::{PlannedBinding, RouterInstance, RouterSet};
