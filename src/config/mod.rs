//! Configuration module for hexflash
//!
//! Provides configuration management including CLI arguments
//! and the resolved runtime settings.

mod settings;

pub use settings::*;
