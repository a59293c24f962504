//! Per-network contract addresses and per-chain identifiers.

use std::collections::HashMap;
use std::path::Path;

use alloy::primitives::Address;
use serde::Deserialize;

use crate::{
    error::{AppError, Result},
    ethereum::constants::{
        ARBITRUM_CHAIN_ID, BASE_CHAIN_ID, ETHEREUM_MAINNET_CHAIN_ID, HOLESKY_CHAIN_ID,
        OPTIMISM_CHAIN_ID, SEPOLIA_CHAIN_ID,
    },
};

/// Contract addresses for one network.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NetworkConfig {
    /// Address of the Lagrange service contract.
    pub service_contract_address: Address,
}

/// Chain identifier for one network or subscribable chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ChainBatchConfig {
    /// Numeric chain ID (the service contract takes a `uint32`).
    pub chain_id: u32,
}

/// Immutable lookup tables resolved once at startup.
///
/// JSON layout:
///
/// ```json
/// {
///   "networks": { "holesky": { "service_contract_address": "0x..." } },
///   "chains":   { "holesky": { "chain_id": 17000 } }
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworkTables {
    #[serde(default)]
    networks: HashMap<String, NetworkConfig>,
    #[serde(default)]
    chains: HashMap<String, ChainBatchConfig>,
}

impl NetworkTables {
    /// Build tables from explicit maps.
    pub fn new(
        networks: HashMap<String, NetworkConfig>,
        chains: HashMap<String, ChainBatchConfig>,
    ) -> Self {
        Self { networks, chains }
    }

    /// Tables holding only the chain IDs of well-known chains.
    ///
    /// Service contract addresses are deployment specific and must come from
    /// a tables file or be added with [`NetworkTables::with_network`].
    pub fn builtin() -> Self {
        let chains = [
            ("mainnet", ETHEREUM_MAINNET_CHAIN_ID),
            ("holesky", HOLESKY_CHAIN_ID),
            ("sepolia", SEPOLIA_CHAIN_ID),
            ("optimism", OPTIMISM_CHAIN_ID),
            ("base", BASE_CHAIN_ID),
            ("arbitrum", ARBITRUM_CHAIN_ID),
        ]
        .into_iter()
        .map(|(name, chain_id)| (name.to_string(), ChainBatchConfig { chain_id }))
        .collect();

        Self { networks: HashMap::new(), chains }
    }

    /// Parse tables from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load tables from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("failed to read tables file {}: {e}", path.display()))
        })?;
        Self::from_json(&contents).map_err(|e| e.context(&format!("{}", path.display())))
    }

    /// Overlay `other` on top of `self`; entries in `other` win.
    pub fn merge(mut self, other: NetworkTables) -> Self {
        self.networks.extend(other.networks);
        self.chains.extend(other.chains);
        self
    }

    /// Add or replace a network entry.
    pub fn with_network(
        mut self,
        name: impl Into<String>,
        service_contract_address: Address,
    ) -> Self {
        self.networks.insert(name.into(), NetworkConfig { service_contract_address });
        self
    }

    /// Add or replace a chain entry.
    pub fn with_chain(mut self, name: impl Into<String>, chain_id: u32) -> Self {
        self.chains.insert(name.into(), ChainBatchConfig { chain_id });
        self
    }

    /// Look up a network's contract addresses.
    pub fn network(&self, name: &str) -> Result<&NetworkConfig> {
        self.networks
            .get(name)
            .ok_or_else(|| AppError::Config(format!("unknown network: {name}")))
    }

    /// Look up a chain's numeric identifier.
    pub fn chain(&self, name: &str) -> Result<&ChainBatchConfig> {
        self.chains.get(name).ok_or_else(|| AppError::Config(format!("unknown chain: {name}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    const TABLES_JSON: &str = r#"{
        "networks": {
            "holesky": { "service_contract_address": "0x18a74e66cc90f0b1744da27e72df338cea0a542b" }
        },
        "chains": {
            "holesky": { "chain_id": 17000 },
            "devnet": { "chain_id": 1337 }
        }
    }"#;

    #[test]
    fn test_builtin_chain_ids() {
        let tables = NetworkTables::builtin();
        assert_eq!(tables.chain("mainnet").unwrap().chain_id, 1);
        assert_eq!(tables.chain("holesky").unwrap().chain_id, 17000);
        assert_eq!(tables.chain("optimism").unwrap().chain_id, 10);
        assert_eq!(tables.chain("base").unwrap().chain_id, 8453);
        assert_eq!(tables.chain("arbitrum").unwrap().chain_id, 42161);
        assert!(tables.network("mainnet").is_err());
    }

    #[test]
    fn test_from_json() {
        let tables = NetworkTables::from_json(TABLES_JSON).unwrap();
        assert_eq!(
            tables.network("holesky").unwrap().service_contract_address,
            address!("18a74e66cc90f0b1744da27e72df338cea0a542b")
        );
        assert_eq!(tables.chain("devnet").unwrap().chain_id, 1337);
    }

    #[test]
    fn test_from_json_missing_sections_default_to_empty() {
        let tables = NetworkTables::from_json("{}").unwrap();
        assert!(tables.chain("mainnet").is_err());
    }

    #[test]
    fn test_from_json_invalid_address() {
        let json = r#"{ "networks": { "x": { "service_contract_address": "0x1234" } } }"#;
        let result = NetworkTables::from_json(json);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_merge_overrides_builtin() {
        let overrides =
            NetworkTables::default().with_chain("mainnet", 31337).with_chain("devnet", 1337);
        let tables = NetworkTables::builtin().merge(overrides);
        assert_eq!(tables.chain("mainnet").unwrap().chain_id, 31337);
        assert_eq!(tables.chain("devnet").unwrap().chain_id, 1337);
        assert_eq!(tables.chain("holesky").unwrap().chain_id, 17000);
    }

    #[test]
    fn test_unknown_entries_are_config_errors() {
        let tables = NetworkTables::builtin();
        match tables.network("devnet") {
            Err(AppError::Config(msg)) => assert!(msg.contains("devnet")),
            other => panic!("Expected Config error, got {other:?}"),
        }
        assert!(matches!(tables.chain("zksync"), Err(AppError::Config(_))));
    }

    #[test]
    fn test_from_file_missing() {
        let result = NetworkTables::from_file("/nonexistent/lagrange-networks.json");
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_from_file_roundtrip() {
        let path = std::env::temp_dir().join("lagrange-chainops-tables-test.json");
        std::fs::write(&path, TABLES_JSON).unwrap();
        let tables = NetworkTables::from_file(&path).unwrap();
        assert_eq!(tables.chain("holesky").unwrap().chain_id, 17000);
        let _ = std::fs::remove_file(&path);
    }
}
