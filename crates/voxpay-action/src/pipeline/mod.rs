//! Command pipeline: one utterance in, one reported outcome out.
//!
//! Wires the confirmation gate, intent parser, session manager, orchestrator
//! and receipt watcher together, writing progress to the status sink at each
//! stage. Every failure is caught here and rendered for the user.

pub mod state;

use std::sync::Arc;

use alloy_primitives::TxHash;
use tracing::Instrument;
use uuid::Uuid;

use crate::cancel::CancelToken;
use crate::confirmation::ConfirmationGate;
use crate::error::PipelineError;
use crate::intent::IntentParser;
use crate::orchestrator::{Execution, TransactionOrchestrator};
use crate::status::StatusSink;
use crate::types::{BalanceReading, CommandAction, FailureReason, TransactionOutcome};
use crate::wallet::SessionManager;

pub use state::{PipelineStage, StageGuard, StageTracker};

/// How a single utterance ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineReport {
    /// The user declined the confirmation prompt, or the command was
    /// cancelled before a transaction was submitted.
    Cancelled,
    Balance(BalanceReading),
    Transaction {
        hash: TxHash,
        outcome: TransactionOutcome,
    },
    Failed(PipelineError),
}

/// Runs utterances through the full command-to-transaction flow.
pub struct CommandPipeline {
    parser: IntentParser,
    gate: ConfirmationGate,
    sessions: SessionManager,
    orchestrator: TransactionOrchestrator,
    status: Arc<dyn StatusSink>,
    stages: StageTracker,
}

impl CommandPipeline {
    pub fn new(
        parser: IntentParser,
        gate: ConfirmationGate,
        sessions: SessionManager,
        orchestrator: TransactionOrchestrator,
        status: Arc<dyn StatusSink>,
    ) -> Self {
        Self {
            parser,
            gate,
            sessions,
            orchestrator,
            status,
            stages: StageTracker::new(),
        }
    }

    /// Stage of the command currently in flight, `Idle` if none.
    pub fn stage(&self) -> PipelineStage {
        self.stages.current()
    }

    /// Handle one utterance end to end.
    ///
    /// Returns only once the command has reached a terminal report; for
    /// transfers that means after the receipt watcher finishes. A second call
    /// made while one is in flight is rejected with `Busy`.
    ///
    /// `cancel` is honoured at every wait: during confirmation, while
    /// connecting, up to submission, and while watching for the receipt.
    pub async fn handle(&self, utterance: &str, cancel: CancelToken) -> PipelineReport {
        let span = tracing::info_span!("command", id = %Uuid::new_v4());
        self.run(utterance, cancel).instrument(span).await
    }

    async fn run(&self, utterance: &str, cancel: CancelToken) -> PipelineReport {
        tracing::info!(utterance = %utterance, "Handling utterance");

        let (guard, command) = if self.gate.confirms_everything() {
            let guard = match self.stages.begin(PipelineStage::Confirming) {
                Ok(guard) => guard,
                Err(e) => return self.fail(e),
            };
            if !self.confirm(utterance, &cancel).await {
                return self.cancelled();
            }
            (guard, self.parser.parse(utterance))
        } else {
            let command = self.parser.parse(utterance);
            if self.gate.requires_confirmation(command.action) {
                let guard = match self.stages.begin(PipelineStage::Confirming) {
                    Ok(guard) => guard,
                    Err(e) => return self.fail(e),
                };
                if !self.confirm(utterance, &cancel).await {
                    return self.cancelled();
                }
                (guard, command)
            } else {
                match self.stages.begin(PipelineStage::Connecting) {
                    Ok(guard) => (guard, command),
                    Err(e) => return self.fail(e),
                }
            }
        };

        self.status.set_status("Processing...");

        if command.action == CommandAction::Invalid {
            return self.fail(PipelineError::UnrecognizedCommand);
        }

        if guard.current() != PipelineStage::Connecting {
            self.advance(&guard, PipelineStage::Connecting);
        }
        let connected = tokio::select! {
            biased;
            _ = cancel.cancelled() => return self.cancelled(),
            connected = self.sessions.connect() => connected,
        };
        let session = match connected {
            Ok(session) => session,
            Err(e) => return self.fail(e),
        };

        self.advance(&guard, PipelineStage::Executing);
        if command.action == CommandAction::Transfer {
            self.status.set_status("Initiating transfer...");
        }

        let execution = match self
            .orchestrator
            .execute(&command, &session, cancel)
            .await
        {
            Ok(execution) => execution,
            Err(PipelineError::Cancelled) => return self.cancelled(),
            Err(e) => return self.fail(e),
        };

        match execution {
            Execution::Balance(reading) => {
                self.status.set_status(&format!("Balance: {}", reading));
                PipelineReport::Balance(reading)
            }
            Execution::Submitted(pending) => {
                let hash = pending.hash();
                self.status
                    .set_status(&format!("Transaction sent! Hash: {}", hash));
                self.advance(&guard, PipelineStage::Watching);

                let outcome = pending.outcome().await;
                self.status.set_status(&Self::outcome_status(&outcome));
                PipelineReport::Transaction { hash, outcome }
            }
        }
    }

    async fn confirm(&self, utterance: &str, cancel: &CancelToken) -> bool {
        self.status
            .set_status(&ConfirmationGate::prompt_for(utterance));
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!("Cancelled while waiting for confirmation");
                false
            }
            approved = self.gate.confirm(utterance) => approved,
        }
    }

    fn advance(&self, guard: &StageGuard, target: PipelineStage) {
        if let Err(e) = guard.advance(target) {
            tracing::error!(error = %e, "Pipeline stage out of order");
        }
    }

    fn cancelled(&self) -> PipelineReport {
        tracing::info!("Command cancelled before submission");
        self.status.set_status(&PipelineError::Cancelled.to_string());
        PipelineReport::Cancelled
    }

    fn fail(&self, err: PipelineError) -> PipelineReport {
        tracing::warn!(error = %err, "Command failed");
        self.status.set_status(&err.to_string());
        PipelineReport::Failed(err)
    }

    fn outcome_status(outcome: &TransactionOutcome) -> String {
        match outcome {
            TransactionOutcome::Confirmed(_) => "Transaction confirmed!".to_string(),
            TransactionOutcome::Reverted(_) => "Transaction reverted.".to_string(),
            TransactionOutcome::Pending(hash) => format!("Transaction pending: {}", hash),
            TransactionOutcome::Failed(FailureReason::Cancelled) => {
                "Stopped waiting for the transaction receipt.".to_string()
            }
            TransactionOutcome::Failed(reason) => {
                PipelineError::Polling(reason.to_string()).to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_status_text() {
        let h = TxHash::repeat_byte(0x01);
        assert_eq!(
            CommandPipeline::outcome_status(&TransactionOutcome::Confirmed(h)),
            "Transaction confirmed!"
        );
        assert_eq!(
            CommandPipeline::outcome_status(&TransactionOutcome::Reverted(h)),
            "Transaction reverted."
        );
        assert_eq!(
            CommandPipeline::outcome_status(&TransactionOutcome::Failed(
                FailureReason::Timeout { attempts: 600 }
            )),
            "Error while waiting for transaction receipt: no receipt after 600 polls"
        );
        assert_eq!(
            CommandPipeline::outcome_status(&TransactionOutcome::Failed(FailureReason::Cancelled)),
            "Stopped waiting for the transaction receipt."
        );
    }
}
