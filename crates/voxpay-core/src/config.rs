use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, VoxpayError};

/// Top-level configuration for the voxpay application.
///
/// Loaded from `~/.voxpay/config.toml` by default. The network section is a
/// deployment constant: the pipeline refuses to talk to any other network id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoxpayConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub confirmation: ConfirmationConfig,
    #[serde(default)]
    pub watcher: WatcherConfig,
}

impl VoxpayConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: VoxpayConfig = toml::from_str(&content)?;
        config.validate()?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| VoxpayError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.network.rpc_url.trim().is_empty() {
            return Err(VoxpayError::Config("network.rpc_url must not be empty".into()));
        }
        if self.network.decimals > 77 {
            // 10^78 overflows a 256-bit word.
            return Err(VoxpayError::Config(format!(
                "network.decimals must be at most 77, got {}",
                self.network.decimals
            )));
        }
        if self.watcher.poll_interval_ms == 0 {
            return Err(VoxpayError::Config(
                "watcher.poll_interval_ms must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// The single network this deployment is allowed to transact on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Human-readable network name, used in mismatch messages.
    pub name: String,
    /// JSON-RPC endpoint of the wallet node.
    pub rpc_url: String,
    /// Expected network id as reported by `net_version`.
    pub network_id: u64,
    /// Display symbol of the native currency.
    pub currency_symbol: String,
    /// Number of decimals between the display unit and the smallest unit.
    pub decimals: u8,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            name: "Moonbase Alpha".to_string(),
            rpc_url: "https://rpc.testnet.moonbeam.network".to_string(),
            network_id: 1287,
            currency_symbol: "DEV".to_string(),
            decimals: 18,
        }
    }
}

/// Confirmation gate policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfirmationConfig {
    /// Ask for confirmation on read-only balance queries too.
    pub confirm_read_only: bool,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            confirm_read_only: true,
        }
    }
}

/// Receipt polling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatcherConfig {
    /// Delay between receipt polls.
    pub poll_interval_ms: u64,
    /// Maximum number of polls before giving up. `0` polls forever.
    pub max_attempts: u32,
    /// Consecutive poll errors tolerated before the watch fails. `0` fails on the first error.
    pub poll_retries: u32,
    /// Initial backoff after a poll error; doubled on each consecutive error.
    pub retry_backoff_ms: u64,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            max_attempts: 600,
            poll_retries: 3,
            retry_backoff_ms: 500,
        }
    }
}
