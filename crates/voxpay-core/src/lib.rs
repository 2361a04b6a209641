//! Shared configuration and error types for voxpay.

pub mod config;
pub mod error;

pub use config::{ConfirmationConfig, GeneralConfig, NetworkConfig, VoxpayConfig, WatcherConfig};
pub use error::{Result, VoxpayError};
