//! Receipt watch state machine with validated transitions.
//!
//! Submitted -> Confirmed/Reverted/Failed. Terminal states have no exits.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::WatchError;
use crate::types::TransactionOutcome;

/// Lifecycle of a watched transaction hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchState {
    Submitted,
    Confirmed,
    Reverted,
    Failed,
}

impl fmt::Display for WatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WatchState::Submitted => write!(f, "submitted"),
            WatchState::Confirmed => write!(f, "confirmed"),
            WatchState::Reverted => write!(f, "reverted"),
            WatchState::Failed => write!(f, "failed"),
        }
    }
}

impl WatchState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, WatchState::Submitted)
    }

    /// The state a transaction outcome corresponds to.
    pub fn of(outcome: &TransactionOutcome) -> Self {
        match outcome {
            TransactionOutcome::Pending(_) => WatchState::Submitted,
            TransactionOutcome::Confirmed(_) => WatchState::Confirmed,
            TransactionOutcome::Reverted(_) => WatchState::Reverted,
            TransactionOutcome::Failed(_) => WatchState::Failed,
        }
    }
}

/// Validate that a watch state transition is allowed.
///
/// Valid transitions:
/// - Submitted -> Confirmed
/// - Submitted -> Reverted
/// - Submitted -> Failed
pub fn validate_transition(from: WatchState, to: WatchState) -> Result<(), WatchError> {
    let valid = matches!(
        (from, to),
        (WatchState::Submitted, WatchState::Confirmed)
            | (WatchState::Submitted, WatchState::Reverted)
            | (WatchState::Submitted, WatchState::Failed)
    );

    if valid {
        Ok(())
    } else {
        Err(WatchError::InvalidTransition(from, to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FailureReason;
    use alloy_primitives::TxHash;

    const ALL: [WatchState; 4] = [
        WatchState::Submitted,
        WatchState::Confirmed,
        WatchState::Reverted,
        WatchState::Failed,
    ];

    #[test]
    fn test_submitted_to_terminal_states() {
        assert!(validate_transition(WatchState::Submitted, WatchState::Confirmed).is_ok());
        assert!(validate_transition(WatchState::Submitted, WatchState::Reverted).is_ok());
        assert!(validate_transition(WatchState::Submitted, WatchState::Failed).is_ok());
    }

    #[test]
    fn test_submitted_to_submitted_invalid() {
        assert!(validate_transition(WatchState::Submitted, WatchState::Submitted).is_err());
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        for from in ALL.iter().filter(|s| s.is_terminal()) {
            for to in &ALL {
                assert!(
                    validate_transition(*from, *to).is_err(),
                    "{} -> {} should be rejected",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn test_all_valid_transitions_count() {
        let mut valid_count = 0;
        for from in &ALL {
            for to in &ALL {
                if validate_transition(*from, *to).is_ok() {
                    valid_count += 1;
                }
            }
        }
        assert_eq!(valid_count, 3);
    }

    #[test]
    fn test_invalid_transition_error_message() {
        let err = validate_transition(WatchState::Reverted, WatchState::Confirmed).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("reverted"));
        assert!(msg.contains("confirmed"));
    }

    #[test]
    fn test_state_of_outcome() {
        let h = TxHash::repeat_byte(0x42);
        assert_eq!(WatchState::of(&TransactionOutcome::Pending(h)), WatchState::Submitted);
        assert_eq!(WatchState::of(&TransactionOutcome::Confirmed(h)), WatchState::Confirmed);
        assert_eq!(WatchState::of(&TransactionOutcome::Reverted(h)), WatchState::Reverted);
        assert_eq!(
            WatchState::of(&TransactionOutcome::Failed(FailureReason::Cancelled)),
            WatchState::Failed
        );
    }
}
