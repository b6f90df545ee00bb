//! Error types for the node daemon.

use coin_core::errors::CoreError;
use std::error::Error as StdError;
use std::fmt;

/// Errors that can occur in the node daemon.
#[derive(Debug)]
pub enum NodeError {
    /// Error when a ledger operation is rejected.
    CoreError(CoreError),

    /// Error when a metrics operation fails.
    MetricsError(String),

    /// Error when the configuration file cannot be read, parsed or written.
    ConfigError(String),

    /// Error when the snapshot store cannot be read or written.
    StorageError(String),
}

impl fmt::Display for NodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeError::CoreError(e) => write!(f, "Ledger error: {}", e),
            NodeError::MetricsError(msg) => write!(f, "Metrics error: {}", msg),
            NodeError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            NodeError::StorageError(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl StdError for NodeError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            NodeError::CoreError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CoreError> for NodeError {
    fn from(error: CoreError) -> Self {
        NodeError::CoreError(error)
    }
}
