//! hexflash CLI - automatic firmware flasher
//!
//! Watches a directory for new firmware images and copies each one onto
//! every attached device volume matching the target label. Runs until
//! interrupted.

use clap::Parser;
use hexflash::config::{CliArgs, FlashConfig};
use hexflash::error::Result;
use hexflash::transfer::strategy_for;
use hexflash::volume::SystemVolumes;
use hexflash::watch::Orchestrator;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Initialize logging; the status lines are the daemon's whole UI,
    // so default to info rather than the subscriber's error-only default.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level(&args))),
        )
        .with_target(false)
        .init();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn log_level(args: &CliArgs) -> &'static str {
    if args.quiet {
        "warn"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[tokio::main]
async fn run(args: CliArgs) -> Result<()> {
    let config = FlashConfig::from_cli(&args)?;

    let strategy = strategy_for(config.strategy, config.buffer_size);
    let (orchestrator, mut results) =
        Orchestrator::new(config, Arc::new(SystemVolumes::new()), strategy);

    let handle = orchestrator.start()?;

    // Drain results until interrupted. Outcome logging happens at the
    // source; draining just keeps the channel from backing up.
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            maybe = results.recv() => {
                if maybe.is_none() {
                    break;
                }
            }
        }
    }

    // In-flight copies are abandoned; the next flash overwrites the slot.
    handle.stop();
    Ok(())
}
