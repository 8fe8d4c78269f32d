//! Per-destination operation registry
//!
//! Tracks the cancellation token of the active copy for each destination
//! root and guarantees at most one live copy per destination: starting a
//! new operation for a key cancels whatever was in flight there.

use crate::core::CancelToken;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;

/// Registry of in-flight copy operations, keyed by destination root.
///
/// `begin` and `clear_if_owned` are the only two operations and are
/// mutually exclusive across all keys. The lock is internal and never
/// held across an await point, so two nearly simultaneous triggers for
/// the same destination cannot both believe they own the slot.
#[derive(Debug, Default)]
pub struct OperationRegistry {
    active: Mutex<HashMap<PathBuf, CancelToken>>,
}

impl OperationRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new copy to `dest`, superseding any copy already in
    /// flight for the same destination.
    ///
    /// The previous token, if any, is signalled before the fresh token
    /// is returned, so the old copy observes cancellation no later than
    /// the new copy's first chunk.
    pub fn begin(&self, dest: &Path) -> CancelToken {
        let mut active = self.active.lock().unwrap();
        let token = CancelToken::new();
        if let Some(previous) = active.insert(dest.to_path_buf(), token.clone()) {
            info!("Cancelling current operation for {}", dest.display());
            previous.cancel();
        }
        token
    }

    /// Clear the entry for `dest`, but only if `token` still owns it.
    ///
    /// A completion racing a newer `begin` must not remove the newer
    /// operation's token, so removal is keyed on token identity. When a
    /// different token holds the slot this is a no-op.
    pub fn clear_if_owned(&self, dest: &Path, token: &CancelToken) {
        let mut active = self.active.lock().unwrap();
        if active.get(dest).is_some_and(|current| current.same(token)) {
            active.remove(dest);
        }
    }

    /// Number of copies currently in flight
    pub fn len(&self) -> usize {
        self.active.lock().unwrap().len()
    }

    /// Whether no copy is currently in flight
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a copy to `dest` is currently in flight
    pub fn contains(&self, dest: &Path) -> bool {
        self.active.lock().unwrap().contains_key(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_installs_one_entry() {
        let registry = OperationRegistry::new();
        let token = registry.begin(Path::new("/mnt/mb"));

        assert!(!token.is_cancelled());
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(Path::new("/mnt/mb")));
    }

    #[test]
    fn test_begin_supersedes_previous_token() {
        let registry = OperationRegistry::new();
        let first = registry.begin(Path::new("/mnt/mb"));
        let second = registry.begin(Path::new("/mnt/mb"));

        // The first copy is cancelled, the slot holds exactly one entry.
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_clear_if_owned_removes_own_entry() {
        let registry = OperationRegistry::new();
        let token = registry.begin(Path::new("/mnt/mb"));

        registry.clear_if_owned(Path::new("/mnt/mb"), &token);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_clear_if_owned_ignores_stale_token() {
        let registry = OperationRegistry::new();
        let stale = registry.begin(Path::new("/mnt/mb"));
        let current = registry.begin(Path::new("/mnt/mb"));

        // The superseded operation completes late; its clear must not
        // evict the newer operation's token.
        registry.clear_if_owned(Path::new("/mnt/mb"), &stale);
        assert_eq!(registry.len(), 1);

        registry.clear_if_owned(Path::new("/mnt/mb"), &current);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_destinations_are_independent() {
        let registry = OperationRegistry::new();
        let a = registry.begin(Path::new("/mnt/a"));
        let b = registry.begin(Path::new("/mnt/b"));

        assert!(!a.is_cancelled());
        assert!(!b.is_cancelled());
        assert_eq!(registry.len(), 2);
    }
}
