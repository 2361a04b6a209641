//! Status sink: the single presentation slot every stage writes to.
//!
//! Writes are last-write-wins. The pipeline runs one command at a time, so
//! sinks only need interior mutability, not ordering guarantees.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// A single-slot surface for human-readable progress text.
pub trait StatusSink: Send + Sync {
    fn set_status(&self, text: &str);
}

/// In-memory sink that keeps the latest status and the full write history.
///
/// Useful for tests and for surfaces that poll the current status.
#[derive(Debug, Default)]
pub struct MemoryStatusSink {
    history: Mutex<Vec<String>>,
}

impl MemoryStatusSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, Vec<String>> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The most recent status, if any was written.
    pub fn latest(&self) -> Option<String> {
        self.entries().last().cloned()
    }

    /// Every status written so far, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.entries().clone()
    }
}

impl StatusSink for MemoryStatusSink {
    fn set_status(&self, text: &str) {
        self.entries().push(text.to_string());
    }
}
