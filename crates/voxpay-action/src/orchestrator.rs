//! Transaction orchestrator.
//!
//! Routes a parsed command to a balance query or a value transfer. Transfers
//! return as soon as the wallet hands back a hash; the receipt watcher runs
//! behind them on its own task.

use alloy_primitives::TxHash;
use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;

use crate::cancel::CancelToken;
use crate::error::PipelineError;
use crate::types::{
    BalanceReading, Command, CommandAction, FailureReason, TransactionOutcome,
    TransactionRequest,
};
use crate::units::{parse_address, UnitConverter};
use crate::wallet::Session;
use crate::watcher::ReceiptWatcher;

/// What executing a command produced.
#[derive(Debug)]
pub enum Execution {
    Balance(BalanceReading),
    Submitted(PendingTransaction),
}

/// A broadcast transaction whose receipt is being watched.
#[derive(Debug)]
pub struct PendingTransaction {
    hash: TxHash,
    request: TransactionRequest,
    submitted_at: DateTime<Utc>,
    watcher: JoinHandle<TransactionOutcome>,
}

impl PendingTransaction {
    pub fn hash(&self) -> TxHash {
        self.hash
    }

    pub fn request(&self) -> &TransactionRequest {
        &self.request
    }

    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    /// The outcome as of submission: always `Pending(hash)`.
    pub fn pending(&self) -> TransactionOutcome {
        TransactionOutcome::Pending(self.hash)
    }

    /// Wait for the watcher to reach a terminal outcome.
    pub async fn outcome(self) -> TransactionOutcome {
        match self.watcher.await {
            Ok(outcome) => {
                let elapsed = Utc::now() - self.submitted_at;
                tracing::debug!(
                    hash = %self.hash,
                    elapsed_ms = elapsed.num_milliseconds(),
                    "Receipt watch completed"
                );
                outcome
            }
            Err(e) => {
                tracing::error!(hash = %self.hash, error = %e, "Receipt watcher task died");
                TransactionOutcome::Failed(FailureReason::WatcherAborted(e.to_string()))
            }
        }
    }
}

/// Executes commands against an established wallet session.
pub struct TransactionOrchestrator {
    units: UnitConverter,
    watcher: ReceiptWatcher,
}

impl TransactionOrchestrator {
    pub fn new(units: UnitConverter, watcher: ReceiptWatcher) -> Self {
        Self { units, watcher }
    }

    pub fn units(&self) -> &UnitConverter {
        &self.units
    }

    /// Execute `command` on `session`.
    ///
    /// `Invalid` commands and malformed recipients fail before any provider call.
    /// A cancelled token stops a balance query at any point and a transfer up
    /// to the moment it is handed to the wallet; after that only the receipt
    /// watch can be cancelled.
    pub async fn execute(
        &self,
        command: &Command,
        session: &Session,
        cancel: CancelToken,
    ) -> Result<Execution, PipelineError> {
        match command.action {
            CommandAction::CheckBalance => self.check_balance(command, session, &cancel).await,
            CommandAction::Transfer => self.transfer(command, session, cancel).await,
            CommandAction::Invalid => {
                tracing::debug!("Refusing to execute unrecognized command");
                Err(PipelineError::UnrecognizedCommand)
            }
        }
    }

    async fn check_balance(
        &self,
        command: &Command,
        session: &Session,
        cancel: &CancelToken,
    ) -> Result<Execution, PipelineError> {
        let address = match command.recipient.as_deref() {
            Some(raw) => parse_address(raw)?,
            None => session.account(),
        };

        let raw = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(PipelineError::Cancelled),
            balance = session.provider().balance(address) => {
                balance.map_err(|e| PipelineError::BalanceQuery(e.to_string()))?
            }
        };

        let reading = BalanceReading {
            address,
            amount: self.units.to_display(raw),
            raw,
            symbol: self.units.symbol().to_string(),
        };
        tracing::info!(address = %address, balance = %reading, "Balance read");
        Ok(Execution::Balance(reading))
    }

    async fn transfer(
        &self,
        command: &Command,
        session: &Session,
        cancel: CancelToken,
    ) -> Result<Execution, PipelineError> {
        let (Some(amount), Some(recipient)) = (command.amount.as_deref(), command.recipient.as_deref())
        else {
            return Err(PipelineError::UnrecognizedCommand);
        };

        let to = parse_address(recipient)?;
        let value = self.units.to_smallest(amount)?;
        let request = TransactionRequest {
            from: session.account(),
            to,
            value,
        };

        // Last point at which nothing has left the process.
        if cancel.is_cancelled() {
            tracing::info!(to = %request.to, "Transfer cancelled before submission");
            return Err(PipelineError::Cancelled);
        }

        let hash = session
            .provider()
            .send_transaction(&request)
            .await
            .map_err(|e| PipelineError::Submission(e.to_string()))?;
        tracing::info!(
            hash = %hash,
            from = %request.from,
            to = %request.to,
            value = %request.value,
            "Transaction submitted"
        );

        let watcher = self.watcher.clone();
        let provider = session.provider().clone();
        let handle = tokio::spawn(async move { watcher.watch(provider, hash, cancel).await });

        Ok(Execution::Submitted(PendingTransaction {
            hash,
            request,
            submitted_at: Utc::now(),
            watcher: handle,
        }))
    }
}
