//! Error types for the command pipeline.
//!
//! The `Display` text of every `PipelineError` is what ends up on the status
//! sink, so the messages are written for the person who spoke the command.

use crate::pipeline::PipelineStage;
use crate::watcher::WatchState;

/// Errors raised by a wallet provider implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// The request never got a well-formed answer (network, timeout, EOF).
    #[error("transport failure: {0}")]
    Transport(String),
    /// The wallet or node answered and refused the request.
    #[error("{0}")]
    Rejected(String),
    /// The provider returned something the pipeline cannot interpret.
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

impl ProviderError {
    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, ProviderError::Transport(_))
    }
}

/// Every failure a single command can end in.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error("No wallet provider available: {0}")]
    ProviderUnavailable(String),
    #[error("Please switch to the {network} network (expected network id {expected}, connected to {actual})")]
    NetworkMismatch {
        network: String,
        expected: u64,
        actual: u64,
    },
    #[error("The wallet did not authorize any account")]
    NoAuthorizedAccount,
    #[error("Invalid address format: {0}")]
    InvalidAddress(String),
    #[error("Invalid amount: {0}")]
    AmountConversion(String),
    #[error("Invalid command.")]
    UnrecognizedCommand,
    #[error("Failed to check balance: {0}")]
    BalanceQuery(String),
    #[error("Failed to submit transaction: {0}")]
    Submission(String),
    #[error("Error while waiting for transaction receipt: {0}")]
    Polling(String),
    #[error("Another command is still in progress")]
    Busy,
    /// Cancelled before anything was submitted.
    #[error("Command cancelled.")]
    Cancelled,
}

/// Errors from the receipt watcher's state machine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WatchError {
    #[error("Invalid watch transition: {0} -> {1}")]
    InvalidTransition(WatchState, WatchState),
}

/// Errors from the pipeline's stage tracker.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StageError {
    #[error("Invalid pipeline transition: {0} -> {1}")]
    InvalidTransition(PipelineStage, PipelineStage),
}
