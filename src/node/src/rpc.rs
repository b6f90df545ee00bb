//! JSON-RPC server for the node daemon.
//!
//! Every ledger operation maps to one method. Mutating methods take the
//! already-authenticated caller in the `from` parameter. Amounts are accepted
//! as non-negative JSON integers or decimal strings, and always returned as
//! decimal strings.

use crate::errors::NodeError;
use crate::{handle_msg, NodeState};
use anyhow::Result;
use coin_core::{parse_amount, Address, Balance, CoreError, LedgerMsg};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::net::SocketAddr;
use tracing::{debug, error, info};
use warp::hyper::body::Bytes;
use warp::{Filter, Rejection, Reply};

/// Invalid JSON was received.
pub const PARSE_ERROR: i32 = -32700;
/// The JSON sent is not a valid request object.
pub const INVALID_REQUEST: i32 = -32600;
/// The method does not exist.
pub const METHOD_NOT_FOUND: i32 = -32601;
/// Invalid method parameters.
pub const INVALID_PARAMS: i32 = -32602;
/// Internal error.
pub const INTERNAL_ERROR: i32 = -32603;
/// The caller lacks the permission or allowance.
pub const NOT_AUTHORIZED: i32 = -32001;
/// The source account lacks funds.
pub const INSUFFICIENT_BALANCE: i32 = -32002;
/// The amount is negative or malformed.
pub const INVALID_AMOUNT: i32 = -32003;
/// A credit would overflow.
pub const ARITHMETIC_OVERFLOW: i32 = -32004;

/// JSON-RPC request.
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    /// JSON-RPC version
    pub jsonrpc: String,
    /// Method to call
    pub method: String,
    /// Parameters for the method
    #[serde(default)]
    pub params: Value,
    /// Request ID
    #[serde(default)]
    pub id: Value,
}

/// JSON-RPC response.
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    /// JSON-RPC version
    pub jsonrpc: String,
    /// Result of the method call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    /// Request ID
    pub id: Value,
}

/// JSON-RPC error.
#[derive(Debug, Serialize, PartialEq)]
pub struct JsonRpcError {
    /// Error code
    pub code: i32,
    /// Error message
    pub message: String,
    /// Additional error data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), data: None }
    }

    fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(INVALID_PARAMS, message)
    }
}

impl From<CoreError> for JsonRpcError {
    fn from(error: CoreError) -> Self {
        let code = match &error {
            CoreError::NotAuthorized(_) => NOT_AUTHORIZED,
            CoreError::InsufficientBalance { .. } => INSUFFICIENT_BALANCE,
            CoreError::InvalidAmount(_) => INVALID_AMOUNT,
            CoreError::ArithmeticOverflow(_) => ARITHMETIC_OVERFLOW,
            CoreError::InvalidAddress(_) => INVALID_PARAMS,
            CoreError::Snapshot(_) => INTERNAL_ERROR,
        };
        Self {
            code,
            message: error.to_string(),
            data: Some(serde_json::json!({ "kind": error.kind() })),
        }
    }
}

impl From<NodeError> for JsonRpcError {
    fn from(error: NodeError) -> Self {
        match error {
            NodeError::CoreError(e) => e.into(),
            other => {
                error!("Internal error while serving RPC: {}", other);
                Self::new(INTERNAL_ERROR, other.to_string())
            }
        }
    }
}

impl JsonRpcResponse {
    fn from_result(id: Value, result: Result<Value, JsonRpcError>) -> Self {
        match result {
            Ok(result) => Self { jsonrpc: "2.0".to_string(), result: Some(result), error: None, id },
            Err(error) => Self { jsonrpc: "2.0".to_string(), result: None, error: Some(error), id },
        }
    }
}

/// Builds the `POST /rpc` route.
pub fn routes(
    state: NodeState,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path("rpc")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::bytes())
        .and(with_state(state))
        .and_then(handle_rpc)
}

/// Starts the JSON-RPC server and returns the address it is bound to.
pub async fn start_rpc_server(addr: SocketAddr, state: NodeState) -> Result<SocketAddr> {
    let (bound, server) = warp::serve(routes(state)).try_bind_ephemeral(addr)?;
    info!("RPC server listening on {}", bound);
    tokio::spawn(server);
    Ok(bound)
}

/// Provides the node state to handlers.
fn with_state(
    state: NodeState,
) -> impl Filter<Extract = (NodeState,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || state.clone())
}

/// Handles a JSON-RPC request.
///
/// Ledger calls may write a snapshot to disk, so they run on the blocking pool.
async fn handle_rpc(body: Bytes, state: NodeState) -> Result<impl Reply, Rejection> {
    let response = match tokio::task::spawn_blocking(move || process(&body, &state)).await {
        Ok(response) => response,
        Err(e) => {
            error!("RPC handler task failed: {}", e);
            JsonRpcResponse::from_result(
                Value::Null,
                Err(JsonRpcError::new(INTERNAL_ERROR, "Internal error")),
            )
        }
    };
    Ok(warp::reply::json(&response))
}

/// Parses and dispatches one raw request body.
pub fn process(body: &[u8], state: &NodeState) -> JsonRpcResponse {
    let request: JsonRpcRequest = match serde_json::from_slice::<Value>(body) {
        Err(e) => {
            return JsonRpcResponse::from_result(
                Value::Null,
                Err(JsonRpcError::new(PARSE_ERROR, format!("Parse error: {}", e))),
            )
        }
        Ok(value) => match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                return JsonRpcResponse::from_result(
                    Value::Null,
                    Err(JsonRpcError::new(INVALID_REQUEST, format!("Invalid request: {}", e))),
                )
            }
        },
    };

    let id = request.id.clone();
    if request.jsonrpc != "2.0" {
        return JsonRpcResponse::from_result(
            id,
            Err(JsonRpcError::new(INVALID_REQUEST, "Unsupported JSON-RPC version")),
        );
    }

    debug!("RPC: {} {}", request.method, request.params);
    JsonRpcResponse::from_result(id, dispatch(&request.method, &request.params, state))
}

/// Routes a method call to its handler.
pub fn dispatch(method: &str, params: &Value, state: &NodeState) -> Result<Value, JsonRpcError> {
    match method {
        "owner" => Ok(serde_json::json!(state.ledger.owner())),
        "totalSupply" => Ok(amount_value(state.ledger.total_supply())),
        "coinBalance" => handle_coin_balance(params, state),
        "allowance" => handle_allowance(params, state),
        "mint" => handle_mint(params, state),
        "transfer" => handle_transfer(params, state),
        "authorize" => handle_authorize(params, state),
        "transferFrom" => handle_transfer_from(params, state),
        "getFullState" => Ok(state.ledger.snapshot().to_json()),
        _ => Err(JsonRpcError::new(METHOD_NOT_FOUND, "Method not found")),
    }
}

/// Handles the coinBalance method.
fn handle_coin_balance(params: &Value, state: &NodeState) -> Result<Value, JsonRpcError> {
    let params = object_params(params)?;
    let account = address_param(params, "account")?;
    Ok(amount_value(state.ledger.coin_balance(&account)))
}

/// Handles the allowance method.
fn handle_allowance(params: &Value, state: &NodeState) -> Result<Value, JsonRpcError> {
    let params = object_params(params)?;
    let owner = address_param(params, "owner")?;
    let spender = address_param(params, "spender")?;
    Ok(amount_value(state.ledger.allowance(&owner, &spender)))
}

/// Handles the mint method.
fn handle_mint(params: &Value, state: &NodeState) -> Result<Value, JsonRpcError> {
    let params = object_params(params)?;
    let msg = LedgerMsg::Mint {
        caller: address_param(params, "from")?,
        recipient: address_param(params, "recipient")?,
        amount: amount_param(params, "amount")?,
    };
    apply(&msg, state)
}

/// Handles the transfer method.
fn handle_transfer(params: &Value, state: &NodeState) -> Result<Value, JsonRpcError> {
    let params = object_params(params)?;
    let msg = LedgerMsg::Transfer {
        caller: address_param(params, "from")?,
        recipient: address_param(params, "recipient")?,
        amount: amount_param(params, "amount")?,
    };
    apply(&msg, state)
}

/// Handles the authorize method.
fn handle_authorize(params: &Value, state: &NodeState) -> Result<Value, JsonRpcError> {
    let params = object_params(params)?;
    let msg = LedgerMsg::Authorize {
        caller: address_param(params, "from")?,
        spender: address_param(params, "spender")?,
        amount: amount_param(params, "amount")?,
    };
    apply(&msg, state)
}

/// Handles the transferFrom method.
fn handle_transfer_from(params: &Value, state: &NodeState) -> Result<Value, JsonRpcError> {
    let params = object_params(params)?;
    let msg = LedgerMsg::TransferFrom {
        caller: address_param(params, "from")?,
        owner: address_param(params, "owner")?,
        recipient: address_param(params, "recipient")?,
        amount: amount_param(params, "amount")?,
    };
    apply(&msg, state)
}

fn apply(msg: &LedgerMsg, state: &NodeState) -> Result<Value, JsonRpcError> {
    handle_msg(msg, state)?;
    Ok(Value::Bool(true))
}

fn object_params(params: &Value) -> Result<&serde_json::Map<String, Value>, JsonRpcError> {
    params
        .as_object()
        .ok_or_else(|| JsonRpcError::invalid_params("Invalid params: expected an object"))
}

fn address_param(params: &serde_json::Map<String, Value>, name: &str) -> Result<Address, JsonRpcError> {
    let text = params
        .get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| JsonRpcError::invalid_params(format!("Missing address parameter `{}`", name)))?;
    Ok(text.parse::<Address>()?)
}

/// Reads an amount given as a JSON integer or a decimal string.
fn amount_param(params: &serde_json::Map<String, Value>, name: &str) -> Result<Balance, JsonRpcError> {
    let value = params
        .get(name)
        .ok_or_else(|| JsonRpcError::invalid_params(format!("Missing amount parameter `{}`", name)))?;

    let amount = match value {
        Value::String(text) => parse_amount(text)?,
        Value::Number(n) => match n.as_u64() {
            Some(v) => Balance::from(v),
            None => {
                return Err(CoreError::InvalidAmount(format!(
                    "{} is not a non-negative integer; pass large amounts as decimal strings",
                    n
                ))
                .into())
            }
        },
        other => {
            return Err(CoreError::InvalidAmount(format!("{} is not an amount", other)).into())
        }
    };
    Ok(amount)
}

fn amount_value(amount: Balance) -> Value {
    Value::String(amount.to_string())
}
