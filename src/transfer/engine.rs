//! Copy execution strategies
//!
//! Two interchangeable strategies perform the actual byte copy: a
//! non-blocking one on the async runtime and a thread-fallback one for
//! platforms or filesystems where async file I/O buys nothing. Both
//! honor the same contract: overwrite the destination, poll the
//! cancellation token between chunks, and fold the outcome into a
//! `FlashResult` so the orchestrator stays strategy-agnostic.

use crate::config::StrategyKind;
use crate::core::CancelToken;
use crate::error::{HexflashError, IoResultExt, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// How a single flash attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashOutcome {
    /// The full image reached the destination
    Success,
    /// An I/O error interrupted the copy
    Failed,
    /// A newer operation superseded this copy before it finished
    Cancelled,
}

/// Result of one flash attempt to one destination
#[derive(Debug, Clone)]
pub struct FlashResult {
    /// File name of the source image
    pub source_name: String,
    /// Destination path on the device
    pub destination: PathBuf,
    /// How the attempt ended
    pub outcome: FlashOutcome,
    /// Bytes written; meaningful only when the outcome is `Success`
    pub bytes_copied: u64,
    /// Failure detail, present when the outcome is `Failed`
    pub error: Option<String>,
}

impl FlashResult {
    /// Check if the attempt completed successfully
    pub fn is_success(&self) -> bool {
        self.outcome == FlashOutcome::Success
    }
}

fn source_name_of(source: &Path) -> String {
    source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.display().to_string())
}

/// A copy execution strategy.
///
/// Implementors provide `copy_bytes`; the provided `copy` wrapper maps
/// its result onto the shared `FlashResult` semantics so every strategy
/// reports success, failure, and cancellation identically.
#[async_trait]
pub trait TransferStrategy: Send + Sync {
    /// Copy the raw bytes, returning the count written.
    ///
    /// Returns `HexflashError::Cancelled` when the token fired before
    /// the copy finished; bytes already written are left in place.
    async fn copy_bytes(&self, source: &Path, dest: &Path, token: &CancelToken) -> Result<u64>;

    /// Strategy name, for logs
    fn name(&self) -> &'static str;

    /// Run one flash attempt and report it as a `FlashResult`
    async fn copy(&self, source: &Path, dest: &Path, token: &CancelToken) -> FlashResult {
        let mut result = FlashResult {
            source_name: source_name_of(source),
            destination: dest.to_path_buf(),
            outcome: FlashOutcome::Failed,
            bytes_copied: 0,
            error: None,
        };

        match self.copy_bytes(source, dest, token).await {
            Ok(bytes) => {
                result.outcome = FlashOutcome::Success;
                result.bytes_copied = bytes;
            }
            Err(HexflashError::Cancelled) => {
                result.outcome = FlashOutcome::Cancelled;
            }
            Err(err) => {
                result.error = Some(err.to_string());
            }
        }

        result
    }
}

/// Non-blocking strategy: chunked copy through tokio's file I/O.
#[derive(Debug, Clone)]
pub struct AsyncTransfer {
    buffer_size: usize,
}

impl AsyncTransfer {
    /// Create an async strategy with the given chunk size
    pub fn new(buffer_size: usize) -> Self {
        Self { buffer_size }
    }
}

#[async_trait]
impl TransferStrategy for AsyncTransfer {
    fn name(&self) -> &'static str {
        "async"
    }

    async fn copy_bytes(&self, source: &Path, dest: &Path, token: &CancelToken) -> Result<u64> {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        if token.is_cancelled() {
            return Err(HexflashError::Cancelled);
        }

        let mut reader = tokio::fs::File::open(source).await.with_path(source)?;
        // Create truncates: the firmware slot is overwritten on every flash.
        let mut writer = tokio::fs::File::create(dest).await.with_path(dest)?;

        let mut buffer = vec![0u8; self.buffer_size];
        let mut bytes_copied = 0u64;

        loop {
            let bytes_read = reader.read(&mut buffer).await.with_path(source)?;
            if bytes_read == 0 {
                break;
            }
            if token.is_cancelled() {
                return Err(HexflashError::Cancelled);
            }
            writer.write_all(&buffer[..bytes_read]).await.with_path(dest)?;
            bytes_copied += bytes_read as u64;
        }

        writer.flush().await.with_path(dest)?;
        Ok(bytes_copied)
    }
}

/// Thread-fallback strategy: blocking std I/O on a dedicated worker.
///
/// The caller's task is not blocked; the copy runs via
/// `spawn_blocking` and surfaces its result through the same path as
/// the async strategy.
#[derive(Debug, Clone)]
pub struct BlockingTransfer {
    buffer_size: usize,
}

impl BlockingTransfer {
    /// Create a blocking strategy with the given chunk size
    pub fn new(buffer_size: usize) -> Self {
        Self { buffer_size }
    }
}

#[async_trait]
impl TransferStrategy for BlockingTransfer {
    fn name(&self) -> &'static str {
        "blocking"
    }

    async fn copy_bytes(&self, source: &Path, dest: &Path, token: &CancelToken) -> Result<u64> {
        let source = source.to_path_buf();
        let dest = dest.to_path_buf();
        let token = token.clone();
        let buffer_size = self.buffer_size;

        tokio::task::spawn_blocking(move || copy_blocking(&source, &dest, &token, buffer_size))
            .await
            .map_err(|e| HexflashError::TaskJoin(e.to_string()))?
    }
}

/// Blocking chunked copy, polled for cancellation between chunks
fn copy_blocking(
    source: &Path,
    dest: &Path,
    token: &CancelToken,
    buffer_size: usize,
) -> Result<u64> {
    use std::io::{BufReader, BufWriter, Read, Write};

    if token.is_cancelled() {
        return Err(HexflashError::Cancelled);
    }

    let src_file = std::fs::File::open(source).with_path(source)?;
    let dst_file = std::fs::File::create(dest).with_path(dest)?;

    let mut reader = BufReader::with_capacity(buffer_size, src_file);
    let mut writer = BufWriter::with_capacity(buffer_size, dst_file);

    let mut buffer = vec![0u8; buffer_size];
    let mut bytes_copied = 0u64;

    loop {
        let bytes_read = reader.read(&mut buffer).with_path(source)?;
        if bytes_read == 0 {
            break;
        }
        if token.is_cancelled() {
            return Err(HexflashError::Cancelled);
        }
        writer.write_all(&buffer[..bytes_read]).with_path(dest)?;
        bytes_copied += bytes_read as u64;
    }

    writer.flush().with_path(dest)?;
    Ok(bytes_copied)
}

/// Resolve the configured strategy once, at startup.
///
/// `Auto` picks the async strategy; the thread fallback stays available
/// behind an explicit flag for setups where async file I/O is a wash.
pub fn strategy_for(kind: StrategyKind, buffer_size: usize) -> Arc<dyn TransferStrategy> {
    match kind {
        StrategyKind::Auto | StrategyKind::Async => Arc::new(AsyncTransfer::new(buffer_size)),
        StrategyKind::Blocking => Arc::new(BlockingTransfer::new(buffer_size)),
    }
}
