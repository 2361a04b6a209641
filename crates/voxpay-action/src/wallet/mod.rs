//! Wallet provider boundary and per-command sessions.
//!
//! Defines the `WalletProvider` async trait the pipeline talks to, and the
//! session manager that verifies the network before any account is used.

pub mod mock;

use std::fmt;
use std::sync::Arc;

use alloy_primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use voxpay_core::config::NetworkConfig;

use crate::error::{PipelineError, ProviderError};
use crate::types::{Receipt, TransactionRequest};

pub use mock::{mock_tx_hash, MockWalletProvider, PollStep};

/// A chain-capable wallet: signs, broadcasts, and answers chain queries.
///
/// Implementations must be safe to share across tasks; the receipt watcher
/// polls from its own task while the pipeline holds the session.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Ask the wallet to authorize accounts. May prompt the user in the wallet's own UI.
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError>;

    /// Network id the wallet is connected to.
    async fn network_id(&self) -> Result<u64, ProviderError>;

    /// Balance of `address` in the smallest unit.
    async fn balance(&self, address: Address) -> Result<U256, ProviderError>;

    /// Sign and broadcast a value transfer. Returns once the hash is known.
    async fn send_transaction(&self, request: &TransactionRequest)
        -> Result<TxHash, ProviderError>;

    /// Receipt for `hash`, or `None` while the transaction is not yet mined.
    async fn transaction_receipt(&self, hash: TxHash) -> Result<Option<Receipt>, ProviderError>;
}

/// An authorized connection to one account on one verified network.
#[derive(Clone)]
pub struct Session {
    provider: Arc<dyn WalletProvider>,
    account: Address,
    network_id: u64,
}

impl Session {
    pub fn provider(&self) -> &Arc<dyn WalletProvider> {
        &self.provider
    }

    pub fn account(&self) -> Address {
        self.account
    }

    pub fn network_id(&self) -> u64 {
        self.network_id
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("account", &self.account)
            .field("network_id", &self.network_id)
            .finish_non_exhaustive()
    }
}

/// Establishes sessions against the single expected network.
pub struct SessionManager {
    provider: Option<Arc<dyn WalletProvider>>,
    network: NetworkConfig,
}

impl SessionManager {
    /// `provider` is `None` when no wallet could be detected at startup.
    pub fn new(provider: Option<Arc<dyn WalletProvider>>, network: NetworkConfig) -> Self {
        Self { provider, network }
    }

    pub fn expected_network_id(&self) -> u64 {
        self.network.network_id
    }

    /// Connect to the wallet and bind a session to its first authorized account.
    ///
    /// The network is checked before accounts are requested, so the user is
    /// never prompted by a wallet sitting on the wrong network.
    pub async fn connect(&self) -> Result<Session, PipelineError> {
        let provider = self.provider.clone().ok_or_else(|| {
            PipelineError::ProviderUnavailable(
                "install or configure a wallet provider and try again".to_string(),
            )
        })?;

        let actual = provider
            .network_id()
            .await
            .map_err(|e| PipelineError::ProviderUnavailable(e.to_string()))?;
        if actual != self.network.network_id {
            tracing::warn!(
                expected = self.network.network_id,
                actual,
                "Wallet connected to unexpected network"
            );
            return Err(PipelineError::NetworkMismatch {
                network: self.network.name.clone(),
                expected: self.network.network_id,
                actual,
            });
        }

        let accounts = provider
            .request_accounts()
            .await
            .map_err(|e| PipelineError::ProviderUnavailable(e.to_string()))?;
        let account = accounts
            .first()
            .copied()
            .ok_or(PipelineError::NoAuthorizedAccount)?;

        tracing::info!(account = %account, network_id = actual, "Wallet session established");
        Ok(Session {
            provider,
            account,
            network_id: actual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network() -> NetworkConfig {
        NetworkConfig::default()
    }

    fn account() -> Address {
        Address::repeat_byte(0xaa)
    }

    #[tokio::test]
    async fn test_connect_success() {
        let provider = Arc::new(MockWalletProvider::new(1287, vec![account()]));
        let manager = SessionManager::new(Some(provider.clone()), network());

        let session = manager.connect().await.unwrap();
        assert_eq!(session.account(), account());
        assert_eq!(session.network_id(), 1287);
    }

    #[tokio::test]
    async fn test_connect_binds_first_account() {
        let second = Address::repeat_byte(0xbb);
        let provider = Arc::new(MockWalletProvider::new(1287, vec![account(), second]));
        let manager = SessionManager::new(Some(provider), network());
        assert_eq!(manager.connect().await.unwrap().account(), account());
    }

    #[tokio::test]
    async fn test_connect_without_provider() {
        let manager = SessionManager::new(None, network());
        let err = manager.connect().await.unwrap_err();
        assert!(matches!(err, PipelineError::ProviderUnavailable(_)));
    }

    #[tokio::test]
    async fn test_connect_wrong_network_skips_account_request() {
        let provider = Arc::new(MockWalletProvider::new(1, vec![account()]));
        let manager = SessionManager::new(Some(provider.clone()), network());

        let err = manager.connect().await.unwrap_err();
        assert_eq!(
            err,
            PipelineError::NetworkMismatch {
                network: "Moonbase Alpha".to_string(),
                expected: 1287,
                actual: 1,
            }
        );
        assert_eq!(provider.calls(), vec!["network_id"]);
    }

    #[tokio::test]
    async fn test_connect_no_accounts() {
        let provider = Arc::new(MockWalletProvider::new(1287, vec![]));
        let manager = SessionManager::new(Some(provider), network());
        assert_eq!(
            manager.connect().await.unwrap_err(),
            PipelineError::NoAuthorizedAccount
        );
    }

    #[tokio::test]
    async fn test_connect_transport_failure_is_provider_unavailable() {
        let provider = Arc::new(
            MockWalletProvider::new(1287, vec![account()])
                .with_network_error(ProviderError::Transport("connection refused".into())),
        );
        let manager = SessionManager::new(Some(provider), network());
        let err = manager.connect().await.unwrap_err();
        assert!(matches!(err, PipelineError::ProviderUnavailable(msg) if msg.contains("connection refused")));
    }

    #[test]
    fn test_session_debug_hides_provider() {
        let session = Session {
            provider: Arc::new(MockWalletProvider::new(1287, vec![])),
            account: account(),
            network_id: 1287,
        };
        let dbg = format!("{:?}", session);
        assert!(dbg.contains("network_id: 1287"));
        assert!(!dbg.contains("MockWalletProvider"));
    }
}
