//! Core of the SimpleCoin token ledger.
//!
//! This crate provides the account-balance store, owner-restricted minting,
//! peer-to-peer transfers and the authorize/transferFrom allowance mechanism.
//! Callers are always passed in explicitly; the ledger never resolves identity
//! on its own.

pub mod errors;
pub mod ledger;
pub mod shared;
pub mod snapshot;
pub mod types;

// Re-export commonly used types
pub use errors::CoreError;
pub use ledger::TokenLedger;
pub use shared::SharedLedger;
pub use snapshot::{AllowanceEntry, LedgerSnapshot};
pub use types::{parse_amount, Address, Balance, LedgerMsg, ADDRESS_LEN};
