//! Conversions between `ethers` wire types and the pipeline's `alloy` types.

use alloy_primitives::{Address, TxHash, U256};
use ethers::providers::{ProviderError as EthersError, RpcError};
use ethers::types::{H160, H256, U256 as EthersU256};
use voxpay_action::ProviderError;

pub fn to_h160(address: Address) -> H160 {
    H160::from_slice(address.as_slice())
}

pub fn from_h160(address: H160) -> Address {
    Address::from_slice(address.as_bytes())
}

pub fn to_h256(hash: TxHash) -> H256 {
    H256::from_slice(hash.as_slice())
}

pub fn from_h256(hash: H256) -> TxHash {
    TxHash::from_slice(hash.as_bytes())
}

pub fn to_ethers_u256(value: U256) -> EthersU256 {
    EthersU256::from_big_endian(&value.to_be_bytes::<32>())
}

pub fn from_ethers_u256(value: EthersU256) -> U256 {
    let mut bytes = [0u8; 32];
    value.to_big_endian(&mut bytes);
    U256::from_be_bytes(bytes)
}

/// Classify an `ethers` provider error.
///
/// A JSON-RPC error response means the node understood and refused the
/// request. A response that failed to deserialize is malformed. Everything
/// else never got an answer and is treated as transient.
pub fn classify(err: EthersError) -> ProviderError {
    if let Some(response) = err.as_error_response() {
        return ProviderError::Rejected(response.message.clone());
    }
    if err.as_serde_error().is_some() {
        return ProviderError::Malformed(err.to_string());
    }
    ProviderError::Transport(err.to_string())
}
