//! Receipt watcher: polls for a receipt and classifies the terminal outcome.
//!
//! The loop suspends on a tokio sleep between polls and races every
//! suspension point against the command's cancel token.

pub mod state_machine;

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::TxHash;
use voxpay_core::config::WatcherConfig;

use crate::cancel::CancelToken;
use crate::error::WatchError;
use crate::types::{FailureReason, TransactionOutcome};
use crate::wallet::WalletProvider;

pub use state_machine::{validate_transition, WatchState};

/// Tracks one hash through the watch state machine.
#[derive(Debug)]
struct Watch {
    hash: TxHash,
    state: WatchState,
}

impl Watch {
    fn new(hash: TxHash) -> Self {
        Self {
            hash,
            state: WatchState::Submitted,
        }
    }

    fn finish(&mut self, outcome: TransactionOutcome) -> Result<TransactionOutcome, WatchError> {
        let to = WatchState::of(&outcome);
        validate_transition(self.state, to)?;
        self.state = to;
        Ok(outcome)
    }
}

/// Polls a wallet provider until a submitted transaction reaches a terminal state.
#[derive(Debug, Clone)]
pub struct ReceiptWatcher {
    config: WatcherConfig,
}

impl ReceiptWatcher {
    pub fn new(config: WatcherConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WatcherConfig {
        &self.config
    }

    /// Delay before the next poll after `consecutive_errors` failed polls in a row.
    fn backoff(&self, consecutive_errors: u32) -> Duration {
        let exp = consecutive_errors.saturating_sub(1).min(16);
        Duration::from_millis(self.config.retry_backoff_ms.saturating_mul(1u64 << exp))
    }

    /// Watch `hash` until it is confirmed, reverted, or the watch fails.
    ///
    /// Always returns a terminal outcome.
    pub async fn watch(
        &self,
        provider: Arc<dyn WalletProvider>,
        hash: TxHash,
        cancel: CancelToken,
    ) -> TransactionOutcome {
        let mut watch = Watch::new(hash);
        let outcome = self.poll_until_terminal(provider.as_ref(), hash, &cancel).await;

        match watch.finish(outcome.clone()) {
            Ok(outcome) => {
                tracing::info!(hash = %hash, outcome = %outcome, "Watch finished");
                outcome
            }
            Err(e) => {
                tracing::error!(hash = %watch.hash, error = %e, "Watch ended in an invalid state");
                TransactionOutcome::Failed(FailureReason::WatcherAborted(e.to_string()))
            }
        }
    }

    async fn poll_until_terminal(
        &self,
        provider: &dyn WalletProvider,
        hash: TxHash,
        cancel: &CancelToken,
    ) -> TransactionOutcome {
        let interval = Duration::from_millis(self.config.poll_interval_ms);
        let mut delay = interval;
        let mut attempts: u32 = 0;
        let mut consecutive_errors: u32 = 0;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!(hash = %hash, attempts, "Watch cancelled");
                    return TransactionOutcome::Failed(FailureReason::Cancelled);
                }
                _ = tokio::time::sleep(delay) => {}
            }

            if self.config.max_attempts > 0 && attempts >= self.config.max_attempts {
                tracing::warn!(hash = %hash, attempts, "No receipt within the poll budget");
                return TransactionOutcome::Failed(FailureReason::Timeout { attempts });
            }
            attempts += 1;

            let polled = tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!(hash = %hash, attempts, "Watch cancelled");
                    return TransactionOutcome::Failed(FailureReason::Cancelled);
                }
                polled = provider.transaction_receipt(hash) => polled,
            };

            match polled {
                Ok(Some(receipt)) if receipt.success => {
                    return TransactionOutcome::Confirmed(hash);
                }
                Ok(Some(_)) => {
                    return TransactionOutcome::Reverted(hash);
                }
                Ok(None) => {
                    tracing::debug!(hash = %hash, attempts, "Receipt not yet available");
                    consecutive_errors = 0;
                    delay = interval;
                }
                Err(e) if e.is_transient() && consecutive_errors < self.config.poll_retries => {
                    consecutive_errors += 1;
                    delay = self.backoff(consecutive_errors);
                    tracing::warn!(
                        hash = %hash,
                        error = %e,
                        retry = consecutive_errors,
                        backoff_ms = delay.as_millis() as u64,
                        "Receipt poll failed, retrying"
                    );
                }
                Err(e) => {
                    tracing::error!(hash = %hash, error = %e, "Receipt poll failed");
                    return TransactionOutcome::Failed(FailureReason::Polling(e.to_string()));
                }
            }
        }
    }
}
