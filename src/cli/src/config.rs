//! Configuration for the CLI wallet.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Configuration for the CLI wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletConfig {
    /// The node to connect to
    pub node: String,
    /// The default calling account, as hex
    #[serde(default)]
    pub account: Option<String>,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            node: "http://localhost:8545".to_string(),
            account: None,
        }
    }
}

impl WalletConfig {
    /// Loads configuration from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Saves configuration to a file.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Default location of the config file, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut dir| {
            dir.push("simplecoin");
            dir.push("wallet.json");
            dir
        })
    }
}
