//! Removable volume discovery module
//!
//! Provides mounted-volume enumeration and label matching for
//! locating target devices.

mod matcher;

pub use matcher::*;
