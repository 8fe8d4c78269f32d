//! Core state module
//!
//! Provides cooperative cancellation tokens and the per-destination
//! operation registry that enforces at most one live copy per device.

mod cancel;
mod registry;

pub use cancel::*;
pub use registry::*;
