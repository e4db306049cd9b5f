//! Interface modules and their protocols.
//!
//! # Data Flow
//! ```text
//! [interfaces.<Module>.<sub>] fragments
//!     → module.rs (for each sub-interface, in order)
//!         → RouterSet::match_interface
//!         → empty?  → Skipped (startup log)
//!         → protocol.rs activate
//!             → Ok             → Active
//!             → Unimplemented  → Unimplemented (startup log)
//!             → Transport err  → Failed (startup log)
//!     → binding.rs (Pending → terminal, exactly once)
//! ```
//!
//! # Design Decisions
//! - Protocols are trait objects chosen by module name (catalog.rs)
//! - HTTP/HTTPS are real transports; NanoMSG is declared but unimplemented

pub mod binding;
pub mod catalog;
pub mod http;
pub mod module;
pub mod protocol;
pub mod unimplemented;

pub use binding::{SubInterfaceBinding, SubInterfaceState, SubInterfaceStatus, TransitionError};
pub use catalog::ProtocolCatalog;
pub use http::{HttpProtocol, HttpSettings, STATUS_PATH};
pub use module::InterfaceModule;
pub use protocol::{ActivationError, ActivationRequest, ActiveTransport, Protocol, TransportError};
pub use unimplemented::UnimplementedProtocol;
