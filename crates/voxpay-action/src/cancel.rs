//! Cooperative cancellation for in-flight commands.

use std::sync::Arc;
use tokio::sync::watch;

/// Clonable cancellation flag shared between the caller and the pipeline.
///
/// Cancelling is sticky: once set, every clone reports cancelled and every
/// pending `cancelled()` future resolves.
#[derive(Debug, Clone)]
pub struct CancelToken {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once `cancel` has been called on any clone.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_new_token_not_cancelled() {
        assert!(!CancelToken::new().is_cancelled());
    }

    #[test]
    fn test_cancel_visible_to_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
        assert!(clone.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_resolves_after_cancel() {
        let token = CancelToken::new();
        let waiter = token.clone();
        let handle = tokio::spawn(async move { waiter.cancelled().await });

        tokio::time::sleep(Duration::from_millis(5)).await;
        token.cancel();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("cancelled() did not resolve")
            .unwrap();
    }

    #[tokio::test]
    async fn test_cancelled_resolves_immediately_when_already_cancelled() {
        let token = CancelToken::new();
        token.cancel();
        tokio::time::timeout(Duration::from_millis(100), token.cancelled())
            .await
            .expect("already-cancelled token should resolve at once");
    }
}
