//! CLI wallet for the SimpleCoin ledger node.

pub mod client;
pub mod commands;
pub mod config;
pub mod errors;

// Re-export commonly used types and functions
pub use client::RpcClient;
pub use config::WalletConfig;
pub use errors::WalletError;
