//! Commands for the CLI wallet.

pub mod authorize;
pub mod mint;
pub mod query;
pub mod send;
pub mod transfer_from;

use crate::config::WalletConfig;
use crate::errors::WalletError;
use coin_core::Address;

/// Resolves the calling account: `--from` wins over the configured account.
pub fn resolve_caller(config: &WalletConfig, from: Option<&str>) -> Result<Address, WalletError> {
    let hex = from
        .or(config.account.as_deref())
        .ok_or(WalletError::MissingAccount)?;
    Ok(hex.parse::<Address>()?)
}
