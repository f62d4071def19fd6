use std::time::Duration;
use tokio::sync::watch;

/// One-shot completion gate
///
/// Transitions exactly once from pending to signaled; redundant signals are
/// no-ops. Built on a watch channel so a signal that arrives before the waiter
/// subscribes is never lost.
#[derive(Debug)]
pub struct CompletionSignal {
    tx: watch::Sender<bool>,
}

impl CompletionSignal {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// Mark the run as finished. Idempotent, callable from any task.
    pub fn signal(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_signaled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Wait until signaled or the timeout elapses. Returns `true` if the
    /// signal fired before the deadline.
    pub async fn wait(&self, timeout: Duration) -> bool {
        let mut rx = self.tx.subscribe();
        // Bind before extracting: the Ok value borrows rx
        let result = tokio::time::timeout(timeout, rx.wait_for(|signaled| *signaled)).await;
        result.is_ok()
    }
}

impl Default for CompletionSignal {
    fn default() -> Self {
        Self::new()
    }
}
