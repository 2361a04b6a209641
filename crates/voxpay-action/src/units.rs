//! Address validation and display/smallest unit conversion.

use alloy_primitives::utils::{format_units, parse_units, ParseUnits};
use alloy_primitives::{Address, U256};

use crate::error::PipelineError;

/// Converts between a chain's display unit and its smallest unit.
#[derive(Debug, Clone)]
pub struct UnitConverter {
    decimals: u8,
    symbol: String,
}

impl UnitConverter {
    pub fn new(decimals: u8, symbol: impl Into<String>) -> Self {
        Self {
            decimals,
            symbol: symbol.into(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Convert a display amount ("1.5") to the smallest unit.
    ///
    /// Fails on empty, non-numeric, negative, or over-precise input.
    pub fn to_smallest(&self, amount: &str) -> Result<U256, PipelineError> {
        let amount = amount.trim();
        if amount.is_empty() {
            return Err(PipelineError::AmountConversion("amount is empty".into()));
        }
        if amount.starts_with('-') {
            return Err(PipelineError::AmountConversion(format!(
                "amount must not be negative: {}",
                amount
            )));
        }
        if let Some((_, fraction)) = amount.split_once('.') {
            if fraction.len() > usize::from(self.decimals) {
                return Err(PipelineError::AmountConversion(format!(
                    "{} has more than {} decimal places",
                    amount, self.decimals
                )));
            }
        }
        match parse_units(amount, self.decimals) {
            Ok(ParseUnits::U256(value)) => Ok(value),
            Ok(ParseUnits::I256(_)) => Err(PipelineError::AmountConversion(format!(
                "amount must not be negative: {}",
                amount
            ))),
            Err(e) => Err(PipelineError::AmountConversion(format!("{}: {}", amount, e))),
        }
    }

    /// Render a smallest-unit value in display units with trailing zeros trimmed.
    pub fn to_display(&self, value: U256) -> String {
        match format_units(value, self.decimals) {
            Ok(formatted) => trim_fraction(&formatted),
            Err(_) => value.to_string(),
        }
    }
}

fn trim_fraction(formatted: &str) -> String {
    if !formatted.contains('.') {
        return formatted.to_string();
    }
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Validate a recipient string as a chain address.
///
/// Requires `0x` plus 40 hex digits. All-lowercase and all-uppercase forms are
/// accepted as-is; mixed case must carry a valid EIP-55 checksum.
pub fn parse_address(raw: &str) -> Result<Address, PipelineError> {
    let invalid = || PipelineError::InvalidAddress(raw.to_string());

    let hex = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .ok_or_else(invalid)?;
    if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let has_lower = hex.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        let candidate = format!("0x{}", hex);
        return Address::parse_checksummed(&candidate, None).map_err(|_| invalid());
    }

    hex.parse::<Address>().map_err(|_| invalid())
}
