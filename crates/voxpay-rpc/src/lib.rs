//! JSON-RPC wallet provider for voxpay.
//!
//! Implements the `WalletProvider` boundary over an Ethereum-compatible
//! JSON-RPC endpoint using `ethers`. Signing is left to the node: transfers go
//! out as `eth_sendTransaction` for an account the node has unlocked.

pub mod convert;
pub mod provider;

pub use provider::EthersWalletProvider;
