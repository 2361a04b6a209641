//! Regex token patterns for command parsing.
//!
//! Matching is lexical and best-effort: the first token of each kind wins,
//! and nothing here checks units, lengths, or checksums.

use regex::Regex;

use super::number_words;

/// Every word that can appear in a spoken number, longest first so that
/// "seventeen" is not read as "seven".
fn spoken_words() -> Vec<&'static str> {
    let mut words: Vec<&'static str> = number_words::SMALL
        .iter()
        .chain(number_words::TENS.iter())
        .chain(number_words::SCALES.iter())
        .copied()
        .collect();
    words.sort_by_key(|w| std::cmp::Reverse(w.len()));
    words
}

/// A token found in an utterance, with its byte offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMatch {
    pub start: usize,
    pub text: String,
}

/// All command token patterns, compiled once and reused.
pub struct PatternSet {
    balance_phrase: Regex,
    amount: Regex,
    spoken_amount: Regex,
    recipient: Regex,
}

impl Default for PatternSet {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternSet {
    /// Create a new PatternSet with all compiled patterns.
    pub fn new() -> Self {
        Self {
            balance_phrase: Regex::new(r"(?i)\bcheck\s+balance\b")
                .expect("Invalid balance phrase regex"),
            // Leading sign, digit groups and a trailing scale word are all kept
            // so that "-3", "2,000" and "2 thousand" fail conversion instead of
            // being read as a shorter number.
            amount: Regex::new(&format!(
                r"(?i)(?:^|[^\w.\-])(-?\d*\.?\d+(?:[,.]\d+)*(?:[\s\-]+(?:{scales}))?)\b",
                scales = number_words::SCALES.join("|"),
            ))
            .expect("Invalid amount regex"),
            spoken_amount: Regex::new(&format!(
                r"(?i)\b(?:point[\s\-]+)?(?:{word})\b(?:[\s\-]+(?:(?:and|point)[\s\-]+)?(?:{word})\b)*",
                word = spoken_words().join("|"),
            ))
            .expect("Invalid spoken amount regex"),
            recipient: Regex::new(r"\b0[xX][0-9a-fA-F]+\b").expect("Invalid recipient regex"),
        }
    }

    /// Whether the utterance contains the "check balance" phrase.
    pub fn has_balance_phrase(&self, text: &str) -> bool {
        self.balance_phrase.is_match(text)
    }

    /// First numeric token, written either as digits or as spoken words.
    ///
    /// The whole numeric span is returned, never a prefix of it. Spoken
    /// numbers are normalised to digits ("twenty five" -> "25") when they
    /// form a valid number and returned verbatim otherwise.
    pub fn find_amount(&self, text: &str) -> Option<TokenMatch> {
        let digits = self.amount.captures(text).and_then(|caps| caps.get(1)).map(|m| {
            let raw = m.as_str();
            let text = if let Some(rest) = raw.strip_prefix("-.") {
                format!("-0.{}", rest)
            } else if raw.starts_with('.') {
                format!("0{}", raw)
            } else {
                raw.to_string()
            };
            TokenMatch {
                start: m.start(),
                text,
            }
        });

        let spoken = self.spoken_amount.find(text).map(|m| TokenMatch {
            start: m.start(),
            // A phrase that is not a well-formed number is passed on whole.
            text: number_words::spoken_to_decimal(m.as_str())
                .unwrap_or_else(|| m.as_str().to_string()),
        });

        match (digits, spoken) {
            (Some(d), Some(s)) => Some(if s.start < d.start { s } else { d }),
            (d, s) => d.or(s),
        }
    }

    /// First hash-shaped token (`0x` followed by hex digits).
    pub fn find_recipient(&self, text: &str) -> Option<TokenMatch> {
        self.recipient.find(text).map(|m| TokenMatch {
            start: m.start(),
            text: m.as_str().to_string(),
        })
    }
}
