//! # hexflash - Automatic Firmware Flasher
//!
//! hexflash watches a directory for newly created firmware images and
//! copies each one onto every attached removable volume whose label
//! matches a configured target, into the device's fixed firmware slot.
//!
//! ## Features
//!
//! - **Watch-driven**: reacts to filesystem create events, no polling loop
//! - **Label matching**: flashes every mounted volume with the target label
//! - **Supersession**: a newer image cancels the in-flight copy to the
//!   same device and takes over the slot
//! - **Two copy strategies**: non-blocking async I/O, or blocking I/O on
//!   a worker thread, selected once at startup
//! - **Per-device isolation**: one device's failure never affects the
//!   others matched by the same trigger
//!
//! ## Quick Start
//!
//! ```no_run
//! use hexflash::config::FlashConfig;
//! use hexflash::transfer::strategy_for;
//! use hexflash::volume::SystemVolumes;
//! use hexflash::watch::Orchestrator;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> hexflash::Result<()> {
//! let config = FlashConfig::default();
//! let strategy = strategy_for(config.strategy, config.buffer_size);
//! let (orchestrator, mut results) =
//!     Orchestrator::new(config, Arc::new(SystemVolumes::new()), strategy);
//!
//! let handle = orchestrator.start()?;
//! while let Some(result) = results.recv().await {
//!     println!("{} -> {:?}", result.destination.display(), result.outcome);
//! }
//! handle.stop();
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod error;
pub mod transfer;
pub mod volume;
pub mod watch;

// Re-export commonly used types
pub use crate::config::{CliArgs, FlashConfig, StrategyKind};
pub use crate::core::{CancelToken, OperationRegistry};
pub use crate::error::{HexflashError, Result};
pub use crate::transfer::{FlashOutcome, FlashResult, TransferStrategy};
pub use crate::volume::{SystemVolumes, Volume, VolumeProvider};
pub use crate::watch::{Orchestrator, TriggerEvent, TriggerKind, WatcherHandle};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    //! Convenient re-exports for common usage
    //!
    //! ```no_run
    //! use hexflash::prelude::*;
    //! ```

    pub use crate::config::{CliArgs, FlashConfig, StrategyKind};
    pub use crate::core::{CancelToken, OperationRegistry};
    pub use crate::error::{HexflashError, IoResultExt, Result};
    pub use crate::transfer::{
        strategy_for, AsyncTransfer, BlockingTransfer, FlashOutcome, FlashResult,
        TransferStrategy,
    };
    pub use crate::volume::{SystemVolumes, Volume, VolumeProvider};
    pub use crate::watch::{Orchestrator, TriggerEvent, TriggerKind, WatcherHandle};
}
