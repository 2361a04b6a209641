//! Command pipeline for voxpay.
//!
//! Turns recognised utterances into balance queries and value transfers,
//! executes them through a wallet provider, and watches submitted
//! transactions to a terminal outcome.

pub mod cancel;
pub mod confirmation;
pub mod error;
pub mod intent;
pub mod orchestrator;
pub mod pipeline;
pub mod status;
pub mod types;
pub mod units;
pub mod wallet;
pub mod watcher;

pub use cancel::CancelToken;
pub use confirmation::{ConfirmationGate, Confirmer, StaticConfirmer};
pub use error::{PipelineError, ProviderError, StageError, WatchError};
pub use intent::IntentParser;
pub use orchestrator::{Execution, PendingTransaction, TransactionOrchestrator};
pub use pipeline::{CommandPipeline, PipelineReport, PipelineStage};
pub use status::{MemoryStatusSink, StatusSink};
pub use types::{
    BalanceReading, Command, CommandAction, FailureReason, Receipt, TransactionOutcome,
    TransactionRequest,
};
pub use units::{parse_address, UnitConverter};
pub use wallet::{MockWalletProvider, PollStep, Session, SessionManager, WalletProvider};
pub use watcher::{ReceiptWatcher, WatchState};
