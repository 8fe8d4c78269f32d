//! Directory watching and flash orchestration module
//!
//! Provides the trigger event model, the watch–match–transfer
//! orchestrator, and the handle that keeps the directory subscription
//! alive.

mod events;
mod orchestrator;

pub use events::*;
pub use orchestrator::*;
