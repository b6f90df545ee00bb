//! Transfer-from command for the CLI wallet.

use crate::client::RpcClient;
use crate::errors::WalletError;
use coin_core::{parse_amount, Address};
use tracing::info;

/// Runs the transfer-from command: the caller spends from `owner_hex`'s
/// balance on its allowance.
pub async fn run(
    client: &RpcClient,
    caller: &Address,
    owner_hex: &str,
    to_hex: &str,
    amount: &str,
) -> Result<(), WalletError> {
    let owner = owner_hex.parse::<Address>()?;
    let recipient = to_hex.parse::<Address>()?;
    let amount = parse_amount(amount)?;
    info!("{} moving {} tokens from {} to {}", caller, amount, owner, recipient);

    let params = serde_json::json!({
        "from": caller,
        "owner": owner,
        "recipient": recipient,
        "amount": amount.to_string()
    });
    client.submit("transferFrom", params).await
}
