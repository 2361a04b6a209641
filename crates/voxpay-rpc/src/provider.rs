use std::time::Duration;

use alloy_primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use ethers::providers::{Http, Middleware, Provider};
use ethers::types::TransactionRequest as EthersTransactionRequest;
use voxpay_action::{ProviderError, Receipt, TransactionRequest, WalletProvider};
use voxpay_core::{Result, VoxpayError};

use crate::convert::{classify, from_ethers_u256, from_h160, from_h256, to_ethers_u256, to_h160, to_h256};

/// Wallet provider backed by an HTTP JSON-RPC node.
#[derive(Debug, Clone)]
pub struct EthersWalletProvider {
    provider: Provider<Http>,
    rpc_url: String,
}

impl EthersWalletProvider {
    /// Build a provider for `rpc_url`. No request is made until first use.
    pub fn new(rpc_url: &str) -> Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| VoxpayError::Provider(format!("invalid RPC url {}: {}", rpc_url, e)))?
            .interval(Duration::from_millis(1000));
        tracing::info!(rpc_url = %rpc_url, "JSON-RPC wallet provider configured");
        Ok(Self {
            provider,
            rpc_url: rpc_url.to_string(),
        })
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }
}

#[async_trait]
impl WalletProvider for EthersWalletProvider {
    async fn request_accounts(&self) -> std::result::Result<Vec<Address>, ProviderError> {
        let accounts = self.provider.get_accounts().await.map_err(classify)?;
        tracing::debug!(count = accounts.len(), "Accounts returned by node");
        Ok(accounts.into_iter().map(from_h160).collect())
    }

    async fn network_id(&self) -> std::result::Result<u64, ProviderError> {
        let version = self.provider.get_net_version().await.map_err(classify)?;
        parse_net_version(&version)
    }

    async fn balance(&self, address: Address) -> std::result::Result<U256, ProviderError> {
        let balance = self
            .provider
            .get_balance(to_h160(address), None)
            .await
            .map_err(classify)?;
        Ok(from_ethers_u256(balance))
    }

    async fn send_transaction(
        &self,
        request: &TransactionRequest,
    ) -> std::result::Result<TxHash, ProviderError> {
        let tx = EthersTransactionRequest::new()
            .from(to_h160(request.from))
            .to(to_h160(request.to))
            .value(to_ethers_u256(request.value));

        let pending = self
            .provider
            .send_transaction(tx, None)
            .await
            .map_err(classify)?;
        Ok(from_h256(pending.tx_hash()))
    }

    async fn transaction_receipt(
        &self,
        hash: TxHash,
    ) -> std::result::Result<Option<Receipt>, ProviderError> {
        let receipt = self
            .provider
            .get_transaction_receipt(to_h256(hash))
            .await
            .map_err(classify)?;

        Ok(receipt.map(|r| Receipt {
            transaction_hash: from_h256(r.transaction_hash),
            // Pre-Byzantium receipts carry no status field; a mined receipt
            // without one is taken as success.
            success: r.status.map_or(true, |s| s.as_u64() == 1),
            block_number: r.block_number.map(|n| n.as_u64()),
        }))
    }
}

/// Parse a `net_version` answer. Nodes answer in decimal; a few answer in hex.
fn parse_net_version(raw: &str) -> std::result::Result<u64, ProviderError> {
    let raw = raw.trim();
    let parsed = match raw.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => raw.parse::<u64>(),
    };
    parsed.map_err(|_| ProviderError::Malformed(format!("net_version returned {:?}", raw)))
}
