//! Intent parsing from recognised utterances.
//!
//! Turns a raw utterance into a [`Command`]. Parsing never fails: anything
//! that is neither a balance query nor an amount/recipient pair becomes
//! [`CommandAction::Invalid`](crate::types::CommandAction::Invalid).

pub mod number_words;
pub mod patterns;

use crate::types::Command;
use patterns::PatternSet;

/// Lexical command parser.
#[derive(Default)]
pub struct IntentParser {
    patterns: PatternSet,
}

impl IntentParser {
    pub fn new() -> Self {
        Self {
            patterns: PatternSet::new(),
        }
    }

    /// Parse one utterance into a command.
    ///
    /// The "check balance" phrase takes precedence over any amount; a
    /// recipient found alongside it selects whose balance is read.
    pub fn parse(&self, utterance: &str) -> Command {
        let amount = self.patterns.find_amount(utterance).map(|m| m.text);
        let recipient = self.patterns.find_recipient(utterance).map(|m| m.text);

        let command = if self.patterns.has_balance_phrase(utterance) {
            Command::check_balance(recipient)
        } else {
            match (amount, recipient) {
                (Some(amount), Some(recipient)) => Command::transfer(amount, recipient),
                _ => Command::invalid(),
            }
        };

        tracing::debug!(
            action = %command.action,
            amount = ?command.amount,
            recipient = ?command.recipient,
            "Parsed utterance"
        );
        command
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CommandAction;

    const ADDR: &str = "0x1111111111111111111111111111111111111111";

    fn parse(text: &str) -> Command {
        IntentParser::new().parse(text)
    }

    #[test]
    fn test_transfer_with_digits() {
        let cmd = parse(&format!("send 2 to {}", ADDR));
        assert_eq!(cmd.action, CommandAction::Transfer);
        assert_eq!(cmd.amount.as_deref(), Some("2"));
        assert_eq!(cmd.recipient.as_deref(), Some(ADDR));
    }

    #[test]
    fn test_transfer_word_order_does_not_matter() {
        let cmd = parse(&format!("to {} send 0.75", ADDR));
        assert_eq!(cmd.action, CommandAction::Transfer);
        assert_eq!(cmd.amount.as_deref(), Some("0.75"));
        assert_eq!(cmd.recipient.as_deref(), Some(ADDR));
    }

    #[test]
    fn test_transfer_with_spoken_amount() {
        let cmd = parse(&format!("Send three to {}", ADDR));
        assert_eq!(cmd.action, CommandAction::Transfer);
        assert_eq!(cmd.amount.as_deref(), Some("3"));
    }

    #[test]
    fn test_transfer_amount_is_never_shortened() {
        let cases = [
            ("2,000", "2,000"),
            ("one hundred", "100"),
            ("two thousand", "2000"),
            ("two point five", "2.5"),
            ("2 thousand", "2 thousand"),
        ];
        for (spoken, expected) in cases {
            let cmd = parse(&format!("send {} to {}", spoken, ADDR));
            assert_eq!(cmd.action, CommandAction::Transfer, "utterance {}", spoken);
            assert_eq!(cmd.amount.as_deref(), Some(expected), "utterance {}", spoken);
        }
    }

    #[test]
    fn test_transfer_with_malformed_recipient_still_parses() {
        // Address validation belongs to the orchestrator.
        let cmd = parse("send 2 to 0xABC");
        assert_eq!(cmd.action, CommandAction::Transfer);
        assert_eq!(cmd.recipient.as_deref(), Some("0xABC"));
    }

    #[test]
    fn test_check_balance_without_address() {
        let cmd = parse("check balance");
        assert_eq!(cmd.action, CommandAction::CheckBalance);
        assert!(cmd.recipient.is_none());
        assert!(cmd.amount.is_none());
    }

    #[test]
    fn test_check_balance_with_address() {
        let cmd = parse(&format!("check balance of {}", ADDR));
        assert_eq!(cmd.action, CommandAction::CheckBalance);
        assert_eq!(cmd.recipient.as_deref(), Some(ADDR));
    }

    #[test]
    fn test_check_balance_wins_over_amount() {
        let cmd = parse(&format!("check balance then send 5 to {}", ADDR));
        assert_eq!(cmd.action, CommandAction::CheckBalance);
        assert!(cmd.amount.is_none());
    }

    #[test]
    fn test_unrelated_utterance_is_invalid() {
        let cmd = parse("what time is it");
        assert_eq!(cmd, Command::invalid());
    }

    #[test]
    fn test_amount_without_recipient_is_invalid() {
        assert_eq!(parse("send 2 to bob").action, CommandAction::Invalid);
    }

    #[test]
    fn test_recipient_without_amount_is_invalid() {
        assert_eq!(parse(&format!("send to {}", ADDR)).action, CommandAction::Invalid);
    }

    #[test]
    fn test_empty_utterance_is_invalid() {
        assert_eq!(parse("").action, CommandAction::Invalid);
        assert_eq!(parse("   ").action, CommandAction::Invalid);
    }

    #[test]
    fn test_transfer_property_over_many_amounts() {
        for amount in ["1", "2", "10", "0.1", "123.456", "99999"] {
            let cmd = parse(&format!("please send {} to {} now", amount, ADDR));
            assert_eq!(cmd.action, CommandAction::Transfer, "amount {}", amount);
            assert_eq!(cmd.amount.as_deref(), Some(amount));
            assert_eq!(cmd.recipient.as_deref(), Some(ADDR));
        }
    }
}
