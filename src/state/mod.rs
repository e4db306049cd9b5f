//! Shared state exposed to every module.
//!
//! # Data Flow
//! ```text
//! any module ──set/get──▶ globals.rs (concurrent key/value map)
//! config [services] ─────▶ services.rs (inventory) ──▶ list / stats
//! ```

pub mod globals;
pub mod services;

pub use globals::GlobalStore;
pub use services::{ServiceInventory, ServiceStats};
