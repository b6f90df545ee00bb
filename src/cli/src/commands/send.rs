//! Send command for the CLI wallet.

use crate::client::RpcClient;
use crate::errors::WalletError;
use coin_core::{parse_amount, Address};
use tracing::info;

/// Runs the send command, transferring from the caller to `to_hex`.
pub async fn run(
    client: &RpcClient,
    caller: &Address,
    to_hex: &str,
    amount: &str,
) -> Result<(), WalletError> {
    let recipient = to_hex.parse::<Address>()?;
    let amount = parse_amount(amount)?;
    info!("Sending {} tokens from {} to {}", amount, caller, recipient);

    let params = serde_json::json!({
        "from": caller,
        "recipient": recipient,
        "amount": amount.to_string()
    });
    client.submit("transfer", params).await
}
