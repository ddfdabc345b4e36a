//! Cancellation token shared between the Ctrl+C handler and the warm-up wait.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cancellation token for interrupting the post-install warm-up.
///
/// Clones share state: cancelling any clone is observed by all of them.
/// While a wait holds a [`ListenGuard`], [`is_listening`](Self::is_listening)
/// reports `true`; an interrupt handler uses that to decide between
/// cancelling the wait and ending the process.
///
/// # Example
///
/// ```
/// use ssb_core::cancel::CancellationToken;
///
/// let token = CancellationToken::new();
/// let handler_token = token.clone();
///
/// {
///     let _guard = token.listen();
///     assert!(handler_token.is_listening());
///     handler_token.cancel();
/// }
/// assert!(token.is_cancelled());
/// assert!(!handler_token.is_listening());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    listening: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a new, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Check if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Mark the token as watched until the guard is dropped.
    pub fn listen(&self) -> ListenGuard {
        self.listening.store(true, Ordering::SeqCst);
        ListenGuard {
            listening: Arc::clone(&self.listening),
        }
    }

    /// Whether a wait is currently observing this token.
    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }
}

/// Keeps a [`CancellationToken`] in the listening state.
#[derive(Debug)]
#[must_use = "the token stops listening when the guard is dropped"]
pub struct ListenGuard {
    listening: Arc<AtomicBool>,
}

impl Drop for ListenGuard {
    fn drop(&mut self) {
        self.listening.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_shares_state() {
        let token = CancellationToken::new();
        let clone = token.clone();

        assert!(!token.is_cancelled());
        clone.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_cancel_across_threads() {
        let token = CancellationToken::new();
        let remote = token.clone();

        std::thread::spawn(move || remote.cancel()).join().unwrap();

        assert!(token.is_cancelled());
    }

    #[test]
    fn test_listening_ends_with_guard() {
        let token = CancellationToken::new();
        let handler = token.clone();
        assert!(!handler.is_listening());

        let guard = token.listen();
        assert!(handler.is_listening());

        drop(guard);
        assert!(!handler.is_listening());
        assert!(!token.is_cancelled());
    }
}
