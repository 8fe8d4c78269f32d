//! Transfer engine module
//!
//! Provides the copy execution strategies and the per-attempt
//! flash result reported back to the orchestrator.

mod engine;

pub use engine::*;
