//! Configuration settings for hexflash
//!
//! Defines all configuration options, CLI arguments, and defaults
//! for the watch-and-flash daemon.

use crate::error::{HexflashError, Result};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Name of the firmware slot at the root of a target volume. The
/// device reuses the same slot on every flash, regardless of the
/// source file's name.
pub const FIRMWARE_FILE_NAME: &str = "firmware.hex";

/// hexflash - automatic firmware flasher for removable devices
#[derive(Parser, Debug, Clone)]
#[command(name = "hexflash")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Watches a directory for firmware images and flashes attached devices")]
#[command(long_about = r#"
hexflash watches a directory for newly created firmware images and copies
each one onto every attached removable volume whose label matches the
target, into the device's firmware slot.

A later image always wins: if a copy to a device is still running when a
new image appears, the old copy is cancelled and the new one takes over.

Examples:
  hexflash                              # Watch ~/Downloads for *.hex, flash MICROBIT volumes
  hexflash -w /tmp/images -l MYDEVICE   # Custom directory and volume label
  hexflash --strategy blocking          # Force the thread-fallback copy strategy
"#)]
pub struct CliArgs {
    /// Directory to watch for new firmware images (default: Downloads)
    #[arg(short = 'w', long, value_name = "DIR")]
    pub watch_dir: Option<PathBuf>,

    /// Volume label identifying target devices
    #[arg(short = 'l', long, default_value = "MICROBIT", value_name = "LABEL")]
    pub label: String,

    /// File suffix that triggers a flash
    #[arg(short = 's', long, default_value = ".hex", value_name = "SUFFIX")]
    pub suffix: String,

    /// Copy execution strategy
    #[arg(long, value_enum, default_value = "auto", value_name = "STRATEGY")]
    pub strategy: StrategyKind,

    /// Buffer size for copy operations (e.g., 64K, 1M)
    #[arg(short = 'b', long, default_value = "64K", value_name = "SIZE")]
    pub buffer_size: String,

    /// Only log warnings and errors
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Copy execution strategy
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Pick the best available strategy at startup
    Auto,
    /// Non-blocking copy on the async runtime
    Async,
    /// Blocking copy on a dedicated worker thread
    Blocking,
}

/// Resolved runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlashConfig {
    /// Directory watched for trigger files
    pub watch_dir: PathBuf,
    /// Volume label identifying target devices
    pub target_label: String,
    /// Suffix a file must carry to trigger a flash (leading dot included)
    pub trigger_suffix: String,
    /// File name of the firmware slot at the volume root
    pub firmware_name: String,
    /// Copy execution strategy
    pub strategy: StrategyKind,
    /// Buffer size for copy operations in bytes
    pub buffer_size: usize,
}

impl Default for FlashConfig {
    fn default() -> Self {
        Self {
            watch_dir: default_watch_dir().unwrap_or_else(|| PathBuf::from(".")),
            target_label: "MICROBIT".to_string(),
            trigger_suffix: ".hex".to_string(),
            firmware_name: FIRMWARE_FILE_NAME.to_string(),
            strategy: StrategyKind::Auto,
            buffer_size: 64 * 1024,
        }
    }
}

impl FlashConfig {
    /// Build a configuration from parsed CLI arguments
    pub fn from_cli(args: &CliArgs) -> Result<Self> {
        let watch_dir = match &args.watch_dir {
            Some(dir) => dir.clone(),
            None => default_watch_dir().ok_or_else(|| {
                HexflashError::config(
                    "cannot determine the Downloads directory; pass --watch-dir",
                )
            })?,
        };

        let trigger_suffix = normalize_suffix(&args.suffix)?;

        let buffer_size = parse_size(&args.buffer_size)
            .ok_or_else(|| {
                HexflashError::config(format!("invalid buffer size: {}", args.buffer_size))
            })?
            .max(4 * 1024) as usize;

        Ok(Self {
            watch_dir,
            target_label: args.label.clone(),
            trigger_suffix,
            firmware_name: FIRMWARE_FILE_NAME.to_string(),
            strategy: args.strategy,
            buffer_size,
        })
    }
}

/// Default directory to watch: the user's Downloads directory
pub fn default_watch_dir() -> Option<PathBuf> {
    dirs::download_dir()
}

/// Ensure the trigger suffix is non-empty and carries a leading dot
fn normalize_suffix(suffix: &str) -> Result<String> {
    let trimmed = suffix.trim();
    if trimmed.is_empty() || trimmed == "." {
        return Err(HexflashError::config("trigger suffix must not be empty"));
    }
    if trimmed.starts_with('.') {
        Ok(trimmed.to_string())
    } else {
        Ok(format!(".{trimmed}"))
    }
}

/// Parse a human-readable size string (e.g., "64K", "1M", "1.5G")
pub fn parse_size(input: &str) -> Option<u64> {
    let input = input.trim().to_uppercase();

    let (number, multiplier) = if let Some(stripped) = input
        .strip_suffix("KB")
        .or_else(|| input.strip_suffix('K'))
    {
        (stripped, 1024u64)
    } else if let Some(stripped) = input
        .strip_suffix("MB")
        .or_else(|| input.strip_suffix('M'))
    {
        (stripped, 1024 * 1024)
    } else if let Some(stripped) = input
        .strip_suffix("GB")
        .or_else(|| input.strip_suffix('G'))
    {
        (stripped, 1024 * 1024 * 1024)
    } else {
        (input.as_str(), 1)
    };

    let value: f64 = number.trim().parse().ok()?;
    if value < 0.0 {
        return None;
    }

    Some((value * multiplier as f64) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("1024").unwrap(), 1024);
        assert_eq!(parse_size("1K").unwrap(), 1024);
        assert_eq!(parse_size("64KB").unwrap(), 64 * 1024);
        assert_eq!(parse_size("1M").unwrap(), 1024 * 1024);
        assert_eq!(parse_size("1.5G").unwrap(), (1.5 * 1024.0 * 1024.0 * 1024.0) as u64);
        assert!(parse_size("garbage").is_none());
        assert!(parse_size("-1K").is_none());
    }

    #[test]
    fn test_normalize_suffix() {
        assert_eq!(normalize_suffix(".hex").unwrap(), ".hex");
        assert_eq!(normalize_suffix("hex").unwrap(), ".hex");
        assert_eq!(normalize_suffix("  .bin ").unwrap(), ".bin");
        assert!(normalize_suffix("").is_err());
        assert!(normalize_suffix(".").is_err());
    }

    #[test]
    fn test_from_cli_defaults() {
        let args = CliArgs::parse_from(["hexflash", "--watch-dir", "/tmp/watch"]);
        let config = FlashConfig::from_cli(&args).unwrap();

        assert_eq!(config.watch_dir, PathBuf::from("/tmp/watch"));
        assert_eq!(config.target_label, "MICROBIT");
        assert_eq!(config.trigger_suffix, ".hex");
        assert_eq!(config.firmware_name, FIRMWARE_FILE_NAME);
        assert_eq!(config.strategy, StrategyKind::Auto);
        assert_eq!(config.buffer_size, 64 * 1024);
    }

    #[test]
    fn test_from_cli_overrides() {
        let args = CliArgs::parse_from([
            "hexflash",
            "--watch-dir",
            "/tmp/images",
            "--label",
            "MYBOARD",
            "--suffix",
            "uf2",
            "--strategy",
            "blocking",
            "--buffer-size",
            "1M",
        ]);
        let config = FlashConfig::from_cli(&args).unwrap();

        assert_eq!(config.target_label, "MYBOARD");
        assert_eq!(config.trigger_suffix, ".uf2");
        assert_eq!(config.strategy, StrategyKind::Blocking);
        assert_eq!(config.buffer_size, 1024 * 1024);
    }

    #[test]
    fn test_buffer_size_floor() {
        let args = CliArgs::parse_from(["hexflash", "-w", "/tmp", "-b", "16"]);
        let config = FlashConfig::from_cli(&args).unwrap();
        // Tiny buffers are clamped to a sane minimum.
        assert_eq!(config.buffer_size, 4 * 1024);
    }
}
