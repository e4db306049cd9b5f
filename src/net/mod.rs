//! Network support shared by protocol implementations.
//!
//! # Data Flow
//! ```text
//! [interfaces.HTTPS.<name>] cert_path / key_path
//!     → tls.rs (existence + PEM checks, rustls context)
//!     → HTTPS transport
//! ```

pub mod tls;
