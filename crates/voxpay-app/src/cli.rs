//! CLI argument definitions for the voxpay binary.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

/// voxpay: speak a payment, confirm it, and watch it land on chain.
#[derive(Parser, Debug)]
#[command(name = "voxpay", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// JSON-RPC endpoint of the wallet node.
    #[arg(short = 'r', long = "rpc-url")]
    pub rpc_url: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Handle a single utterance and exit instead of reading stdin.
    #[arg(short = 'u', long = "utterance")]
    pub utterance: Option<String>,

    /// Answer yes to every confirmation prompt.
    #[arg(short = 'y', long = "yes")]
    pub yes: bool,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > VOXPAY_CONFIG env var > platform default (~/.voxpay/config.toml).
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("VOXPAY_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the RPC endpoint.
    ///
    /// Priority: --rpc-url flag > VOXPAY_RPC_URL > MOONBASE_ALPHA_RPC_URL > config file value.
    pub fn resolve_rpc_url(&self, config_url: &str) -> String {
        if let Some(ref url) = self.rpc_url {
            return url.clone();
        }
        for var in ["VOXPAY_RPC_URL", "MOONBASE_ALPHA_RPC_URL"] {
            if let Ok(url) = std::env::var(var) {
                if !url.trim().is_empty() {
                    return url;
                }
            }
        }
        config_url.to_string()
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".voxpay").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".voxpay").join("config.toml");
    }
    PathBuf::from("config.toml")
}
