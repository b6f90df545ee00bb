//! JSON-RPC client for the ledger node.

use crate::errors::WalletError;
use coin_core::{parse_amount, Address, Balance};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// A client for one node.
#[derive(Debug)]
pub struct RpcClient {
    /// Full URL of the node's `/rpc` endpoint
    url: String,
    http: reqwest::Client,
    next_id: AtomicU64,
}

impl RpcClient {
    /// Creates a client for the node at `node_url`. `/rpc` is appended if
    /// missing.
    pub fn new(node_url: &str) -> Self {
        let trimmed = node_url.trim_end_matches('/');
        let url = if trimmed.ends_with("/rpc") {
            trimmed.to_string()
        } else {
            format!("{}/rpc", trimmed)
        };
        Self { url, http: reqwest::Client::new(), next_id: AtomicU64::new(1) }
    }

    /// The endpoint this client posts to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Calls `method` and returns its `result`.
    pub async fn call(&self, method: &str, params: Value) -> Result<Value, WalletError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = serde_json::json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": id
        });
        debug!("RPC request to {}: {}", self.url, request);

        let response_text = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await?
            .text()
            .await?;
        debug!("RPC response: {}", response_text);

        if response_text.is_empty() {
            return Err(WalletError::NetworkError("Empty response from node".to_string()));
        }

        let response: Value = serde_json::from_str(&response_text)
            .map_err(|e| WalletError::NodeRequestFailed(format!("Failed to parse response: {}", e)))?;
        parse_response(response)
    }

    /// Returns the ledger owner.
    pub async fn owner(&self) -> Result<Address, WalletError> {
        let result = self.call("owner", Value::Null).await?;
        let text = result
            .as_str()
            .ok_or_else(|| WalletError::NodeRequestFailed(format!("Invalid owner: {}", result)))?;
        Ok(text.parse::<Address>()?)
    }

    /// Returns the total supply.
    pub async fn total_supply(&self) -> Result<Balance, WalletError> {
        amount_result(self.call("totalSupply", Value::Null).await?)
    }

    /// Returns the balance of `account`.
    pub async fn coin_balance(&self, account: &Address) -> Result<Balance, WalletError> {
        let params = serde_json::json!({ "account": account });
        amount_result(self.call("coinBalance", params).await?)
    }

    /// Returns the allowance of `spender` over `owner`'s balance.
    pub async fn allowance(&self, owner: &Address, spender: &Address) -> Result<Balance, WalletError> {
        let params = serde_json::json!({ "owner": owner, "spender": spender });
        amount_result(self.call("allowance", params).await?)
    }

    /// Sends a mutating call and checks that it was applied.
    pub async fn submit(&self, method: &str, params: Value) -> Result<(), WalletError> {
        match self.call(method, params).await? {
            Value::Bool(true) => Ok(()),
            other => Err(WalletError::NodeRequestFailed(format!(
                "Unexpected result for {}: {}",
                method, other
            ))),
        }
    }
}

/// Extracts the result from a JSON-RPC response, or turns its error into a
/// [`WalletError::Rejected`].
pub fn parse_response(response: Value) -> Result<Value, WalletError> {
    if let Some(error) = response.get("error").filter(|e| !e.is_null()) {
        return Err(WalletError::Rejected {
            code: error.get("code").and_then(Value::as_i64).unwrap_or(0),
            kind: error
                .get("data")
                .and_then(|d| d.get("kind"))
                .and_then(Value::as_str)
                .map(str::to_string),
            message: error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string(),
        });
    }

    response
        .get("result")
        .cloned()
        .ok_or_else(|| WalletError::NodeRequestFailed(format!("No result in response: {}", response)))
}

fn amount_result(result: Value) -> Result<Balance, WalletError> {
    match &result {
        Value::String(text) => Ok(parse_amount(text)?),
        Value::Number(n) => n
            .as_u64()
            .map(Balance::from)
            .ok_or_else(|| WalletError::NodeRequestFailed(format!("Invalid amount: {}", n))),
        _ => Err(WalletError::NodeRequestFailed(format!("Invalid amount: {}", result))),
    }
}
