//! Read-only commands for the CLI wallet.

use crate::client::RpcClient;
use crate::errors::WalletError;
use coin_core::{Address, Balance};
use tracing::info;

/// Returns the ledger owner.
pub async fn owner(client: &RpcClient) -> Result<Address, WalletError> {
    client.owner().await
}

/// Returns the total supply.
pub async fn total_supply(client: &RpcClient) -> Result<Balance, WalletError> {
    client.total_supply().await
}

/// Returns the balance of `account`.
pub async fn balance(client: &RpcClient, account: &str) -> Result<Balance, WalletError> {
    let account = account.parse::<Address>()?;
    info!("Getting balance for {}", account);
    client.coin_balance(&account).await
}

/// Returns how much `spender` may still move out of `owner`'s balance.
pub async fn allowance(client: &RpcClient, owner: &str, spender: &str) -> Result<Balance, WalletError> {
    let owner = owner.parse::<Address>()?;
    let spender = spender.parse::<Address>()?;
    info!("Getting allowance of {} over {}", spender, owner);
    client.allowance(&owner, &spender).await
}
