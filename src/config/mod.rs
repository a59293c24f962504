//! Configuration management module.
//!
//! Handles loading configuration from environment variables and the
//! per-network lookup tables.

pub mod networks;

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{AppError, Result};

pub use networks::{ChainBatchConfig, NetworkConfig, NetworkTables};

/// Default network name.
pub const DEFAULT_NETWORK: &str = "mainnet";

/// Application configuration.
#[derive(Clone)]
pub struct Config {
    /// Ethereum JSON-RPC endpoint URL.
    pub rpc_url: String,
    /// Operator private key (hex string, `0x` prefix optional).
    pub private_key: String,
    /// Network the endpoint is expected to serve (e.g. "mainnet", "holesky").
    pub network: String,
    /// Optional JSON file with network and chain tables.
    pub networks_file: Option<PathBuf>,
    /// Optional deadline for waiting on transaction receipts.
    pub receipt_timeout: Option<Duration>,
    /// Logging level (default: info).
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `LAGRANGE_RPC_URL`: Ethereum JSON-RPC endpoint
    /// - `LAGRANGE_PRIVATE_KEY`: Operator private key (hex)
    ///
    /// Optional environment variables:
    /// - `LAGRANGE_NETWORK`: Network name (default: mainnet)
    /// - `LAGRANGE_NETWORKS_FILE`: Path to a JSON tables file
    /// - `LAGRANGE_RECEIPT_TIMEOUT_SECS`: Receipt wait deadline in seconds
    /// - `LOG_LEVEL`: Logging level (default: info)
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let rpc_url = env::var("LAGRANGE_RPC_URL").map_err(|_| {
            AppError::Config("LAGRANGE_RPC_URL environment variable not set".into())
        })?;

        let private_key = env::var("LAGRANGE_PRIVATE_KEY").map_err(|_| {
            AppError::Config("LAGRANGE_PRIVATE_KEY environment variable not set".into())
        })?;

        let network = env::var("LAGRANGE_NETWORK").unwrap_or_else(|_| DEFAULT_NETWORK.to_string());

        let networks_file = env::var("LAGRANGE_NETWORKS_FILE").ok().map(PathBuf::from);

        let receipt_timeout = match env::var("LAGRANGE_RECEIPT_TIMEOUT_SECS") {
            Ok(raw) => Some(parse_timeout_secs(&raw)?),
            Err(_) => None,
        };

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self { rpc_url, private_key, network, networks_file, receipt_timeout, log_level })
    }

    /// Built-in chain IDs, overlaid with the tables file when one is configured.
    pub fn load_tables(&self) -> Result<NetworkTables> {
        let builtin = NetworkTables::builtin();
        match &self.networks_file {
            Some(path) => Ok(builtin.merge(NetworkTables::from_file(path)?)),
            None => Ok(builtin),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("rpc_url", &self.rpc_url)
            .field("network", &self.network)
            .field("networks_file", &self.networks_file)
            .field("receipt_timeout", &self.receipt_timeout)
            .field("log_level", &self.log_level)
            .finish_non_exhaustive()
    }
}

fn parse_timeout_secs(raw: &str) -> Result<Duration> {
    let secs: u64 = raw.trim().parse().map_err(|_| {
        AppError::Config(format!("LAGRANGE_RECEIPT_TIMEOUT_SECS must be an integer, got {raw:?}"))
    })?;
    if secs == 0 {
        return Err(AppError::Config("LAGRANGE_RECEIPT_TIMEOUT_SECS must be positive".into()));
    }
    Ok(Duration::from_secs(secs))
}
