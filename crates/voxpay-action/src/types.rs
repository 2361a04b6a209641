//! Core types and value objects for the command pipeline.
//!
//! Defines commands, transaction requests, receipts, and the terminal
//! outcomes produced by the receipt watcher.

use alloy_primitives::{Address, TxHash, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Enums
// =============================================================================

/// What a parsed utterance asks the pipeline to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandAction {
    CheckBalance,
    Transfer,
    Invalid,
}

impl fmt::Display for CommandAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandAction::CheckBalance => write!(f, "check_balance"),
            CommandAction::Transfer => write!(f, "transfer"),
            CommandAction::Invalid => write!(f, "invalid"),
        }
    }
}

impl std::str::FromStr for CommandAction {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "check_balance" => Ok(CommandAction::CheckBalance),
            "transfer" => Ok(CommandAction::Transfer),
            "invalid" => Ok(CommandAction::Invalid),
            _ => Err(format!("Unknown command action: {}", s)),
        }
    }
}

impl CommandAction {
    /// Whether the action can change chain state.
    pub fn is_mutating(&self) -> bool {
        matches!(self, CommandAction::Transfer)
    }
}

/// Why a watched transaction never reached a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The provider failed while polling and the retry budget ran out.
    Polling(String),
    /// No receipt arrived within the configured number of polls.
    Timeout { attempts: u32 },
    /// The caller cancelled the watch.
    Cancelled,
    /// The watcher task itself died (panicked or was aborted).
    WatcherAborted(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Polling(msg) => write!(f, "{}", msg),
            FailureReason::Timeout { attempts } => {
                write!(f, "no receipt after {} polls", attempts)
            }
            FailureReason::Cancelled => write!(f, "cancelled"),
            FailureReason::WatcherAborted(msg) => write!(f, "watcher aborted: {}", msg),
        }
    }
}

/// Classification of a submitted transaction.
///
/// `Pending` is the only non-terminal variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionOutcome {
    Pending(TxHash),
    Confirmed(TxHash),
    Reverted(TxHash),
    Failed(FailureReason),
}

impl TransactionOutcome {
    /// Whether no further transition can happen from this outcome.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TransactionOutcome::Pending(_))
    }

    /// The transaction hash, when the outcome carries one.
    pub fn hash(&self) -> Option<TxHash> {
        match self {
            TransactionOutcome::Pending(h)
            | TransactionOutcome::Confirmed(h)
            | TransactionOutcome::Reverted(h) => Some(*h),
            TransactionOutcome::Failed(_) => None,
        }
    }
}

impl fmt::Display for TransactionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionOutcome::Pending(h) => write!(f, "pending ({})", h),
            TransactionOutcome::Confirmed(h) => write!(f, "confirmed ({})", h),
            TransactionOutcome::Reverted(h) => write!(f, "reverted ({})", h),
            TransactionOutcome::Failed(reason) => write!(f, "failed ({})", reason),
        }
    }
}

// =============================================================================
// Domain Structs
// =============================================================================

/// A structured intent derived from one utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    /// Amount in display units, as spoken.
    pub amount: Option<String>,
    /// Hash-shaped token naming the counterparty. Not yet validated.
    pub recipient: Option<String>,
    pub action: CommandAction,
}

impl Command {
    pub fn check_balance(recipient: Option<String>) -> Self {
        Self {
            amount: None,
            recipient,
            action: CommandAction::CheckBalance,
        }
    }

    pub fn transfer(amount: impl Into<String>, recipient: impl Into<String>) -> Self {
        Self {
            amount: Some(amount.into()),
            recipient: Some(recipient.into()),
            action: CommandAction::Transfer,
        }
    }

    pub fn invalid() -> Self {
        Self {
            amount: None,
            recipient: None,
            action: CommandAction::Invalid,
        }
    }
}

/// The from/to/value payload submitted to the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub from: Address,
    pub to: Address,
    /// Value in the chain's smallest unit.
    pub value: U256,
}

/// Network-provided confirmation record for a mined transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub transaction_hash: TxHash,
    pub success: bool,
    pub block_number: Option<u64>,
}

/// Result of a read-only balance query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceReading {
    pub address: Address,
    /// Balance in display units, trailing zeros trimmed.
    pub amount: String,
    /// Balance in the smallest unit.
    pub raw: U256,
    pub symbol: String,
}

impl fmt::Display for BalanceReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.symbol)
    }
}

// =============================================================================
// Tests
// =============================================================================
