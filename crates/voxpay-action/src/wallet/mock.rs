//! Scriptable in-memory wallet provider.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use alloy_primitives::{Address, TxHash, U256};
use async_trait::async_trait;

use super::WalletProvider;
use crate::error::ProviderError;
use crate::types::{Receipt, TransactionRequest};

/// One scripted answer to a receipt poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStep {
    /// Not yet mined.
    Pending,
    /// Mined with the given success flag.
    Mined(bool),
    /// The poll itself failed.
    Error(ProviderError),
}

#[derive(Default)]
struct MockState {
    calls: Vec<String>,
    sent: Vec<TransactionRequest>,
    polls: VecDeque<PollStep>,
    last_poll: Option<PollStep>,
    poll_count: u32,
}

/// Wallet provider backed by fixed answers, for tests and dry runs.
///
/// Receipt polls consume the scripted steps in order; once the script is
/// exhausted the last step repeats (or `Pending` if nothing was scripted).
pub struct MockWalletProvider {
    network_id: u64,
    accounts: Vec<Address>,
    balances: HashMap<Address, U256>,
    network_error: Option<ProviderError>,
    balance_error: Option<ProviderError>,
    send_error: Option<ProviderError>,
    state: Mutex<MockState>,
}

impl MockWalletProvider {
    pub fn new(network_id: u64, accounts: Vec<Address>) -> Self {
        Self {
            network_id,
            accounts,
            balances: HashMap::new(),
            network_error: None,
            balance_error: None,
            send_error: None,
            state: Mutex::new(MockState::default()),
        }
    }

    pub fn with_balance(mut self, address: Address, amount: U256) -> Self {
        self.balances.insert(address, amount);
        self
    }

    pub fn with_polls(self, steps: impl IntoIterator<Item = PollStep>) -> Self {
        self.state().polls.extend(steps);
        self
    }

    pub fn with_network_error(mut self, err: ProviderError) -> Self {
        self.network_error = Some(err);
        self
    }

    pub fn with_balance_error(mut self, err: ProviderError) -> Self {
        self.balance_error = Some(err);
        self
    }

    pub fn with_send_error(mut self, err: ProviderError) -> Self {
        self.send_error = Some(err);
        self
    }

    /// Names of the provider methods called so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    /// Transactions accepted by `send_transaction`.
    pub fn sent(&self) -> Vec<TransactionRequest> {
        self.state().sent.clone()
    }

    /// Number of receipt polls answered.
    pub fn poll_count(&self) -> u32 {
        self.state().poll_count
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, call: &str) {
        self.state().calls.push(call.to_string());
    }
}

/// Deterministic hash for the n-th submitted transaction.
pub fn mock_tx_hash(n: usize) -> TxHash {
    TxHash::with_last_byte(n as u8)
}

#[async_trait]
impl WalletProvider for MockWalletProvider {
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        self.record("request_accounts");
        Ok(self.accounts.clone())
    }

    async fn network_id(&self) -> Result<u64, ProviderError> {
        self.record("network_id");
        match &self.network_error {
            Some(err) => Err(err.clone()),
            None => Ok(self.network_id),
        }
    }

    async fn balance(&self, address: Address) -> Result<U256, ProviderError> {
        self.record("balance");
        if let Some(err) = &self.balance_error {
            return Err(err.clone());
        }
        Ok(self.balances.get(&address).copied().unwrap_or(U256::ZERO))
    }

    async fn send_transaction(
        &self,
        request: &TransactionRequest,
    ) -> Result<TxHash, ProviderError> {
        self.record("send_transaction");
        if let Some(err) = &self.send_error {
            return Err(err.clone());
        }
        let mut state = self.state();
        state.sent.push(*request);
        Ok(mock_tx_hash(state.sent.len()))
    }

    async fn transaction_receipt(&self, hash: TxHash) -> Result<Option<Receipt>, ProviderError> {
        let mut state = self.state();
        state.calls.push("transaction_receipt".to_string());
        state.poll_count += 1;

        let step = match state.polls.pop_front() {
            Some(step) => {
                state.last_poll = Some(step.clone());
                step
            }
            None => state.last_poll.clone().unwrap_or(PollStep::Pending),
        };

        match step {
            PollStep::Pending => Ok(None),
            PollStep::Mined(success) => Ok(Some(Receipt {
                transaction_hash: hash,
                success,
                block_number: Some(u64::from(state.poll_count)),
            })),
            PollStep::Error(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> TransactionRequest {
        TransactionRequest {
            from: Address::repeat_byte(0xaa),
            to: Address::repeat_byte(0xbb),
            value: U256::from(1u64),
        }
    }

    #[tokio::test]
    async fn test_send_records_request_and_numbers_hashes() {
        let mock = MockWalletProvider::new(1287, vec![]);
        let first = mock.send_transaction(&request()).await.unwrap();
        let second = mock.send_transaction(&request()).await.unwrap();

        assert_eq!(first, mock_tx_hash(1));
        assert_eq!(second, mock_tx_hash(2));
        assert_eq!(mock.sent().len(), 2);
    }

    #[tokio::test]
    async fn test_polls_follow_script_then_repeat_last() {
        let mock = MockWalletProvider::new(1287, vec![])
            .with_polls([PollStep::Pending, PollStep::Mined(true)]);
        let hash = mock_tx_hash(1);

        assert_eq!(mock.transaction_receipt(hash).await.unwrap(), None);
        let receipt = mock.transaction_receipt(hash).await.unwrap().unwrap();
        assert!(receipt.success);
        assert_eq!(receipt.transaction_hash, hash);
        assert!(mock.transaction_receipt(hash).await.unwrap().is_some());
        assert_eq!(mock.poll_count(), 3);
    }

    #[tokio::test]
    async fn test_unscripted_polls_stay_pending() {
        let mock = MockWalletProvider::new(1287, vec![]);
        assert_eq!(mock.transaction_receipt(mock_tx_hash(1)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_unknown_balance_is_zero() {
        let mock = MockWalletProvider::new(1287, vec![]);
        assert_eq!(mock.balance(Address::ZERO).await.unwrap(), U256::ZERO);
    }
}
