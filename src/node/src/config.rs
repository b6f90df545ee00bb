//! Configuration for the node daemon.

use crate::errors::NodeError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for the node daemon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// RPC configuration
    pub rpc: RpcConfig,
    /// Metrics configuration
    pub metrics: MetricsConfig,
    /// Storage configuration
    pub storage: StorageConfig,
    /// Ledger construction parameters, used only when no snapshot exists
    pub genesis: GenesisConfig,
}

/// RPC configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcConfig {
    /// Listen address for the RPC server
    pub listen_addr: String,
}

/// Metrics configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Whether to enable the metrics server
    pub enabled: bool,
    /// Listen address for the metrics server
    pub listen_addr: String,
}

/// Storage configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the data directory
    pub data_dir: String,
}

/// Ledger construction parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisConfig {
    /// Hex address of the constructing account, which becomes the owner
    pub owner: String,
    /// Initial supply credited to the owner, as a decimal string
    pub initial_supply: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            rpc: RpcConfig {
                listen_addr: "127.0.0.1:8545".to_string(),
            },
            metrics: MetricsConfig {
                enabled: false,
                listen_addr: "127.0.0.1:9090".to_string(),
            },
            storage: StorageConfig {
                data_dir: "./data".to_string(),
            },
            genesis: GenesisConfig {
                owner: format!("0x{}", "00".repeat(coin_core::ADDRESS_LEN)),
                initial_supply: "10000".to_string(),
            },
        }
    }
}

impl NodeConfig {
    /// Loads configuration from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, NodeError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            NodeError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            NodeError::ConfigError(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Saves configuration to a file.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), NodeError> {
        let path = path.as_ref();
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| NodeError::ConfigError(e.to_string()))?;
        fs::write(path, contents).map_err(|e| {
            NodeError::ConfigError(format!("Failed to write {}: {}", path.display(), e))
        })
    }
}
