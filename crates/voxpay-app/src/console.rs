//! Terminal surfaces: stdin line source, yes/no confirmer, stdout status sink.

use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use voxpay_action::{Confirmer, StatusSink};

/// Shared reader over stdin.
///
/// Utterances and confirmation answers come from the same stream, one line
/// each, so both consumers go through this reader.
pub struct ConsoleInput {
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl Default for ConsoleInput {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleInput {
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }

    /// Next line of input, or `None` at EOF or on a read error.
    pub async fn next_line(&self) -> Option<String> {
        match self.lines.lock().await.next_line().await {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read from stdin");
                None
            }
        }
    }
}

/// Confirmer that asks on the terminal.
pub struct ConsoleConfirmer {
    input: Arc<ConsoleInput>,
}

impl ConsoleConfirmer {
    pub fn new(input: Arc<ConsoleInput>) -> Self {
        Self { input }
    }
}

#[async_trait]
impl Confirmer for ConsoleConfirmer {
    async fn confirm(&self, _prompt: &str) -> bool {
        // The prompt itself reaches the terminal through the status sink.
        print!("Confirm? [y/N] ");
        let _ = std::io::stdout().flush();
        match self.input.next_line().await {
            Some(answer) => is_affirmative(&answer),
            None => false,
        }
    }
}

/// Only `y` and `yes` count as a yes.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Status sink that prints each status on its own line.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleStatusSink;

impl StatusSink for ConsoleStatusSink {
    fn set_status(&self, text: &str) {
        println!("{}", text);
        tracing::debug!(status = %text, "Status updated");
    }
}
