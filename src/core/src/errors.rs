//! Error types for the core crate.

use crate::types::{Address, Balance};
use thiserror::Error;

/// Errors that can occur in the core crate.
///
/// Every variant is detected before the ledger is mutated, so a returned error
/// always means the ledger is exactly as it was before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The caller lacks the permission or allowance the operation needs.
    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    /// The source account does not hold enough tokens.
    #[error("Insufficient balance for {account}: required {required}, available {available}")]
    InsufficientBalance {
        /// The account being debited
        account: Address,
        /// The required balance
        required: Balance,
        /// The available balance
        available: Balance,
    },

    /// A quantity was negative or otherwise malformed.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// A credit would exceed the representable range.
    #[error("Arithmetic overflow: {0}")]
    ArithmeticOverflow(String),

    /// An account identifier could not be parsed.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// A persisted snapshot is corrupt or inconsistent.
    #[error("Snapshot error: {0}")]
    Snapshot(String),
}

impl CoreError {
    /// Stable name of the error kind, as exposed to RPC clients.
    pub fn kind(&self) -> &'static str {
        match self {
            CoreError::NotAuthorized(_) => "NotAuthorized",
            CoreError::InsufficientBalance { .. } => "InsufficientBalance",
            CoreError::InvalidAmount(_) => "InvalidAmount",
            CoreError::ArithmeticOverflow(_) => "ArithmeticOverflow",
            CoreError::InvalidAddress(_) => "InvalidAddress",
            CoreError::Snapshot(_) => "Snapshot",
        }
    }
}
