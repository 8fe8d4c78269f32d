//! Cooperative cancellation for in-flight copies

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation flag for one in-flight copy.
///
/// The orchestrator owns the token and may signal it; the transfer
/// strategy polls it between chunks and stops writing once it observes
/// the signal. Clones share the same underlying flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    signalled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a fresh, unsignalled token
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of the operation holding this token
    pub fn cancel(&self) {
        self.signalled.store(true, Ordering::SeqCst);
    }

    /// Check whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.signalled.load(Ordering::SeqCst)
    }

    /// Whether two handles refer to the same underlying token.
    ///
    /// Identity, not value: two distinct unsignalled tokens are not the
    /// same. The registry uses this to tell an operation's own token
    /// apart from the token of a newer operation that replaced it.
    pub fn same(&self, other: &CancelToken) -> bool {
        Arc::ptr_eq(&self.signalled, &other.signalled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_is_visible_across_clones() {
        let token = CancelToken::new();
        let observer = token.clone();

        assert!(!observer.is_cancelled());
        token.cancel();
        assert!(observer.is_cancelled());
    }

    #[test]
    fn test_same_is_identity_not_value() {
        let a = CancelToken::new();
        let b = CancelToken::new();

        assert!(a.same(&a.clone()));
        assert!(!a.same(&b));
    }
}
