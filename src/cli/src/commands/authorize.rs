//! Authorize command for the CLI wallet.

use crate::client::RpcClient;
use crate::errors::WalletError;
use coin_core::{parse_amount, Address};
use tracing::info;

/// Runs the authorize command, replacing the allowance of `spender_hex` over
/// the caller's balance.
pub async fn run(
    client: &RpcClient,
    caller: &Address,
    spender_hex: &str,
    amount: &str,
) -> Result<(), WalletError> {
    let spender = spender_hex.parse::<Address>()?;
    let amount = parse_amount(amount)?;
    info!("{} authorizing {} for {} tokens", caller, spender, amount);

    let params = serde_json::json!({
        "from": caller,
        "spender": spender,
        "amount": amount.to_string()
    });
    client.submit("authorize", params).await
}
