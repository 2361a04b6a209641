//! Pipeline stage tracker with thread-safe transitions.
//!
//! Enforces the stage order of a single command:
//! - Idle -> Confirming (gate runs first)
//! - Idle -> Connecting (read-only query that skips the gate)
//! - Confirming -> Connecting
//! - Connecting -> Executing
//! - Executing -> Watching
//! - Confirming/Connecting/Executing/Watching -> Idle (command finished)
//!
//! Leaving `Idle` is the admission check: only one command is in flight.

use std::fmt;
use std::sync::{Arc, Mutex};

use crate::error::{PipelineError, StageError};

/// Where the in-flight command currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    Idle,
    Confirming,
    Connecting,
    Executing,
    Watching,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineStage::Idle => write!(f, "idle"),
            PipelineStage::Confirming => write!(f, "confirming"),
            PipelineStage::Connecting => write!(f, "connecting"),
            PipelineStage::Executing => write!(f, "executing"),
            PipelineStage::Watching => write!(f, "watching"),
        }
    }
}

impl PipelineStage {
    /// Returns whether a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: &PipelineStage) -> bool {
        matches!(
            (self, target),
            (PipelineStage::Idle, PipelineStage::Confirming)
                | (PipelineStage::Idle, PipelineStage::Connecting)
                | (PipelineStage::Confirming, PipelineStage::Connecting)
                | (PipelineStage::Connecting, PipelineStage::Executing)
                | (PipelineStage::Executing, PipelineStage::Watching)
                // Finish transitions
                | (PipelineStage::Confirming, PipelineStage::Idle)
                | (PipelineStage::Connecting, PipelineStage::Idle)
                | (PipelineStage::Executing, PipelineStage::Idle)
                | (PipelineStage::Watching, PipelineStage::Idle)
        )
    }
}

/// Shared stage tracker.
#[derive(Debug, Clone)]
pub struct StageTracker {
    stage: Arc<Mutex<PipelineStage>>,
}

impl Default for StageTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl StageTracker {
    pub fn new() -> Self {
        Self {
            stage: Arc::new(Mutex::new(PipelineStage::Idle)),
        }
    }

    pub fn current(&self) -> PipelineStage {
        *self.stage.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Admit a new command by leaving `Idle` for `first`.
    ///
    /// Fails with `Busy` when another command is in flight. The returned guard
    /// puts the tracker back to `Idle` when dropped.
    pub fn begin(&self, first: PipelineStage) -> Result<StageGuard, PipelineError> {
        let mut stage = self.stage.lock().unwrap_or_else(|e| e.into_inner());
        if *stage != PipelineStage::Idle {
            tracing::warn!(stage = %*stage, "Rejecting command while another is in flight");
            return Err(PipelineError::Busy);
        }
        if !stage.can_transition_to(&first) {
            tracing::error!(to = %first, "Command cannot start in this stage");
            return Err(PipelineError::Busy);
        }
        tracing::debug!("Pipeline stage: {} -> {}", *stage, first);
        *stage = first;
        Ok(StageGuard {
            tracker: self.clone(),
        })
    }

    fn transition(&self, target: PipelineStage) -> Result<(), StageError> {
        let mut stage = self.stage.lock().unwrap_or_else(|e| e.into_inner());
        if stage.can_transition_to(&target) {
            tracing::debug!("Pipeline stage: {} -> {}", *stage, target);
            *stage = target;
            Ok(())
        } else {
            Err(StageError::InvalidTransition(*stage, target))
        }
    }
}

/// Holds the pipeline out of `Idle` for the lifetime of one command.
#[derive(Debug)]
pub struct StageGuard {
    tracker: StageTracker,
}

impl StageGuard {
    /// Move the in-flight command to `target`.
    pub fn advance(&self, target: PipelineStage) -> Result<(), StageError> {
        self.tracker.transition(target)
    }

    pub fn current(&self) -> PipelineStage {
        self.tracker.current()
    }
}

impl Drop for StageGuard {
    fn drop(&mut self) {
        let mut stage = self.tracker.stage.lock().unwrap_or_else(|e| e.into_inner());
        tracing::debug!("Pipeline stage: {} -> idle", *stage);
        *stage = PipelineStage::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_display() {
        assert_eq!(PipelineStage::Idle.to_string(), "idle");
        assert_eq!(PipelineStage::Confirming.to_string(), "confirming");
        assert_eq!(PipelineStage::Watching.to_string(), "watching");
    }

    #[test]
    fn test_valid_transitions() {
        assert!(PipelineStage::Idle.can_transition_to(&PipelineStage::Confirming));
        assert!(PipelineStage::Idle.can_transition_to(&PipelineStage::Connecting));
        assert!(PipelineStage::Confirming.can_transition_to(&PipelineStage::Connecting));
        assert!(PipelineStage::Connecting.can_transition_to(&PipelineStage::Executing));
        assert!(PipelineStage::Executing.can_transition_to(&PipelineStage::Watching));
        assert!(PipelineStage::Watching.can_transition_to(&PipelineStage::Idle));
    }

    #[test]
    fn test_invalid_transitions() {
        assert!(!PipelineStage::Idle.can_transition_to(&PipelineStage::Executing));
        assert!(!PipelineStage::Idle.can_transition_to(&PipelineStage::Watching));
        assert!(!PipelineStage::Idle.can_transition_to(&PipelineStage::Idle));
        assert!(!PipelineStage::Watching.can_transition_to(&PipelineStage::Executing));
        assert!(!PipelineStage::Executing.can_transition_to(&PipelineStage::Confirming));
    }

    #[test]
    fn test_guard_happy_path_and_reset() {
        let tracker = StageTracker::new();
        {
            let guard = tracker.begin(PipelineStage::Confirming).unwrap();
            guard.advance(PipelineStage::Connecting).unwrap();
            guard.advance(PipelineStage::Executing).unwrap();
            guard.advance(PipelineStage::Watching).unwrap();
            assert_eq!(tracker.current(), PipelineStage::Watching);
        }
        assert_eq!(tracker.current(), PipelineStage::Idle);
    }

    #[test]
    fn test_second_begin_is_busy() {
        let tracker = StageTracker::new();
        let _guard = tracker.begin(PipelineStage::Confirming).unwrap();
        assert_eq!(
            tracker.begin(PipelineStage::Confirming).unwrap_err(),
            PipelineError::Busy
        );
    }

    #[test]
    fn test_begin_rejects_mid_pipeline_stage() {
        let tracker = StageTracker::new();
        assert!(tracker.begin(PipelineStage::Watching).is_err());
        assert_eq!(tracker.current(), PipelineStage::Idle);
    }

    #[test]
    fn test_invalid_advance_keeps_stage() {
        let tracker = StageTracker::new();
        let guard = tracker.begin(PipelineStage::Connecting).unwrap();
        let err = guard.advance(PipelineStage::Watching).unwrap_err();
        assert_eq!(
            err,
            StageError::InvalidTransition(PipelineStage::Connecting, PipelineStage::Watching)
        );
        assert_eq!(guard.current(), PipelineStage::Connecting);
    }
}
