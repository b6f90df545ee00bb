//! Error types for the CLI wallet.

use coin_core::CoreError;
use std::error::Error as StdError;
use std::fmt;

/// Errors that can occur in the CLI wallet.
#[derive(Debug)]
pub enum WalletError {
    /// Error when a file operation fails.
    FileError(std::io::Error),

    /// Error when JSON serialization or deserialization fails.
    JsonError(serde_json::Error),

    /// Error when the node cannot be reached.
    NetworkError(String),

    /// Error when the node returns something that is not a valid response.
    NodeRequestFailed(String),

    /// Error when the node rejects a call.
    Rejected {
        /// JSON-RPC error code
        code: i64,
        /// Ledger error kind, if the node reported one
        kind: Option<String>,
        /// Error message
        message: String,
    },

    /// Error when an address is invalid.
    InvalidAddress(String),

    /// Error when an amount is invalid.
    InvalidAmount(String),

    /// Error when no calling account was given.
    MissingAccount,
}

impl fmt::Display for WalletError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalletError::FileError(e) => write!(f, "File error: {}", e),
            WalletError::JsonError(e) => write!(f, "JSON error: {}", e),
            WalletError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            WalletError::NodeRequestFailed(msg) => write!(f, "Node request failed: {}", msg),
            WalletError::Rejected { code, kind: Some(kind), message } => {
                write!(f, "{} ({}): {}", kind, code, message)
            }
            WalletError::Rejected { code, kind: None, message } => {
                write!(f, "Rejected ({}): {}", code, message)
            }
            WalletError::InvalidAddress(msg) => write!(f, "Invalid address: {}", msg),
            WalletError::InvalidAmount(msg) => write!(f, "Invalid amount: {}", msg),
            WalletError::MissingAccount => {
                write!(f, "No calling account: pass --from or set `account` in the config")
            }
        }
    }
}

impl StdError for WalletError {}

impl From<std::io::Error> for WalletError {
    fn from(error: std::io::Error) -> Self {
        WalletError::FileError(error)
    }
}

impl From<serde_json::Error> for WalletError {
    fn from(error: serde_json::Error) -> Self {
        WalletError::JsonError(error)
    }
}

impl From<reqwest::Error> for WalletError {
    fn from(error: reqwest::Error) -> Self {
        WalletError::NetworkError(error.to_string())
    }
}

impl From<CoreError> for WalletError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::InvalidAddress(msg) => WalletError::InvalidAddress(msg),
            CoreError::InvalidAmount(msg) => WalletError::InvalidAmount(msg),
            other => WalletError::NodeRequestFailed(other.to_string()),
        }
    }
}
