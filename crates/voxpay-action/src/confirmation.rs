//! User confirmation before a command is acted on.
//!
//! The gate echoes the recognised utterance back and only lets the pipeline
//! continue on an explicit yes, so a misrecognised command never reaches the
//! wallet.

use std::sync::Arc;

use async_trait::async_trait;
use voxpay_core::config::ConfirmationConfig;

use crate::types::CommandAction;

/// A yes/no prompt surface.
#[async_trait]
pub trait Confirmer: Send + Sync {
    /// Show `prompt` and wait for the user's answer.
    async fn confirm(&self, prompt: &str) -> bool;
}

/// Confirmer that answers every prompt the same way without asking.
///
/// `StaticConfirmer(true)` backs the `--yes` flag for scripted use.
#[derive(Debug, Clone, Copy)]
pub struct StaticConfirmer(pub bool);

#[async_trait]
impl Confirmer for StaticConfirmer {
    async fn confirm(&self, prompt: &str) -> bool {
        tracing::debug!(prompt = %prompt, answer = self.0, "Auto-answered confirmation");
        self.0
    }
}

/// Gate that asks the user to confirm an utterance.
pub struct ConfirmationGate {
    confirmer: Arc<dyn Confirmer>,
    config: ConfirmationConfig,
}

impl ConfirmationGate {
    pub fn new(confirmer: Arc<dyn Confirmer>, config: ConfirmationConfig) -> Self {
        Self { confirmer, config }
    }

    /// Text shown to the user for an utterance.
    pub fn prompt_for(utterance: &str) -> String {
        format!("Did you say: {}?", utterance)
    }

    /// Whether the gate must run before parsing, for every utterance.
    pub fn confirms_everything(&self) -> bool {
        self.config.confirm_read_only
    }

    /// Whether a parsed action still needs confirmation.
    ///
    /// Only read-only balance queries can skip the gate, and only when
    /// `confirm_read_only` is off.
    pub fn requires_confirmation(&self, action: CommandAction) -> bool {
        self.config.confirm_read_only || action != CommandAction::CheckBalance
    }

    /// Ask the user to confirm `utterance`. Returns `true` only on an explicit yes.
    pub async fn confirm(&self, utterance: &str) -> bool {
        let prompt = Self::prompt_for(utterance);
        let approved = self.confirmer.confirm(&prompt).await;
        tracing::info!(approved, "Confirmation answered");
        approved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct RecordingConfirmer {
        answer: bool,
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Confirmer for RecordingConfirmer {
        async fn confirm(&self, prompt: &str) -> bool {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.answer
        }
    }

    fn gate(answer: bool, confirm_read_only: bool) -> (ConfirmationGate, Arc<RecordingConfirmer>) {
        let confirmer = Arc::new(RecordingConfirmer {
            answer,
            prompts: Mutex::new(Vec::new()),
        });
        let gate = ConfirmationGate::new(
            confirmer.clone(),
            ConfirmationConfig { confirm_read_only },
        );
        (gate, confirmer)
    }

    #[test]
    fn test_prompt_echoes_utterance() {
        assert_eq!(
            ConfirmationGate::prompt_for("check balance"),
            "Did you say: check balance?"
        );
    }

    #[tokio::test]
    async fn test_confirm_yes() {
        let (gate, confirmer) = gate(true, true);
        assert!(gate.confirm("send 2 to 0xabc").await);
        assert_eq!(
            confirmer.prompts.lock().unwrap().as_slice(),
            ["Did you say: send 2 to 0xabc?"]
        );
    }

    #[tokio::test]
    async fn test_confirm_no() {
        let (gate, _) = gate(false, true);
        assert!(!gate.confirm("send 2 to 0xabc").await);
    }

    #[test]
    fn test_baseline_policy_confirms_everything() {
        let (gate, _) = gate(true, true);
        assert!(gate.confirms_everything());
        assert!(gate.requires_confirmation(CommandAction::CheckBalance));
        assert!(gate.requires_confirmation(CommandAction::Transfer));
        assert!(gate.requires_confirmation(CommandAction::Invalid));
    }

    #[test]
    fn test_read_only_skip_policy() {
        let (gate, _) = gate(true, false);
        assert!(!gate.confirms_everything());
        assert!(!gate.requires_confirmation(CommandAction::CheckBalance));
        assert!(gate.requires_confirmation(CommandAction::Transfer));
        assert!(gate.requires_confirmation(CommandAction::Invalid));
    }

    #[tokio::test]
    async fn test_static_confirmer() {
        assert!(StaticConfirmer(true).confirm("anything").await);
        assert!(!StaticConfirmer(false).confirm("anything").await);
    }
}
