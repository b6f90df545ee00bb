//! Tests for the node crate.

use crate::accounts;
use coin_core::{Address, SharedLedger, TokenLedger};
use coin_node::{
    config::GenesisConfig,
    metrics::gather_metrics,
    open_ledger,
    rpc::{self, INSUFFICIENT_BALANCE, NOT_AUTHORIZED},
    storage::SnapshotStore,
    NodeState,
};
use serde_json::{json, Value};
use serial_test::serial;
use tempfile::tempdir;
use tokio::runtime::Runtime;

/// Posts a JSON-RPC call through the warp filter and returns the response.
async fn call(state: &NodeState, method: &str, params: Value) -> Value {
    let body = json!({ "jsonrpc": "2.0", "method": method, "params": params, "id": 1 });
    let response = warp::test::request()
        .method("POST")
        .path("/rpc")
        .json(&body)
        .reply(&rpc::routes(state.clone()))
        .await;
    assert_eq!(response.status(), 200);
    serde_json::from_slice(response.body()).unwrap()
}

fn hex(addr: &Address) -> String {
    addr.to_string()
}

/// Runs the reference scenario over JSON-RPC.
#[test]
#[serial]
fn test_rpc_reference_scenario() {
    let rt = Runtime::new().unwrap();
    let dir = tempdir().unwrap();
    let accounts = accounts(5);

    rt.block_on(async {
        let store = SnapshotStore::new(dir.path()).unwrap();
        let genesis = GenesisConfig { owner: hex(&accounts[0]), initial_supply: "10000".to_string() };
        let state = NodeState::new(open_ledger(&genesis, &store).unwrap(), store);

        assert_eq!(call(&state, "owner", Value::Null).await["result"], json!(hex(&accounts[0])));
        assert_eq!(
            call(&state, "coinBalance", json!({ "account": hex(&accounts[0]) })).await["result"],
            json!("10000")
        );

        // Non-owner mint is rejected
        let resp = call(
            &state,
            "mint",
            json!({ "from": hex(&accounts[1]), "recipient": hex(&accounts[2]), "amount": 1000 }),
        )
        .await;
        assert_eq!(resp["error"]["code"], json!(NOT_AUTHORIZED));

        let resp = call(
            &state,
            "mint",
            json!({ "from": hex(&accounts[0]), "recipient": hex(&accounts[1]), "amount": 1000 }),
        )
        .await;
        assert_eq!(resp["result"], json!(true));

        // accounts[1] cannot send more than it holds
        let resp = call(
            &state,
            "transfer",
            json!({ "from": hex(&accounts[1]), "recipient": hex(&accounts[2]), "amount": 12000 }),
        )
        .await;
        assert_eq!(resp["error"]["code"], json!(INSUFFICIENT_BALANCE));

        call(
            &state,
            "transfer",
            json!({ "from": hex(&accounts[0]), "recipient": hex(&accounts[2]), "amount": "2000" }),
        )
        .await;
        call(
            &state,
            "authorize",
            json!({ "from": hex(&accounts[2]), "spender": hex(&accounts[3]), "amount": 300 }),
        )
        .await;
        assert_eq!(
            call(&state, "allowance", json!({ "owner": hex(&accounts[2]), "spender": hex(&accounts[3]) }))
                .await["result"],
            json!("300")
        );

        let resp = call(
            &state,
            "transferFrom",
            json!({
                "from": hex(&accounts[3]),
                "owner": hex(&accounts[2]),
                "recipient": hex(&accounts[4]),
                "amount": 301
            }),
        )
        .await;
        assert_eq!(resp["error"]["code"], json!(NOT_AUTHORIZED));

        let resp = call(
            &state,
            "transferFrom",
            json!({
                "from": hex(&accounts[3]),
                "owner": hex(&accounts[2]),
                "recipient": hex(&accounts[4]),
                "amount": 150
            }),
        )
        .await;
        assert_eq!(resp["result"], json!(true));

        let full = call(&state, "getFullState", Value::Null).await["result"].clone();
        assert_eq!(full["owner"], json!(hex(&accounts[0])));
        assert_eq!(full["allowances"][0]["amount"], json!("150"));
        assert_eq!(full["total_supply"], json!("11000"));
        assert_eq!(state.ledger.coin_balance(&accounts[2]), 1850);
        assert_eq!(state.ledger.coin_balance(&accounts[4]), 150);
        assert_eq!(state.ledger.total_supply(), 11000);

        let metrics = gather_metrics().unwrap();
        assert!(metrics.contains("ledger_operations_total"));
        assert!(metrics.contains("ledger_rejections_total"));
    });
}

/// A restarted node resumes from the last persisted state.
#[test]
#[serial]
fn test_restart_resumes_state() {
    let rt = Runtime::new().unwrap();
    let dir = tempdir().unwrap();
    let accounts = accounts(3);
    let genesis = GenesisConfig { owner: hex(&accounts[0]), initial_supply: "500".to_string() };

    rt.block_on(async {
        let store = SnapshotStore::new(dir.path()).unwrap();
        let state = NodeState::new(open_ledger(&genesis, &store).unwrap(), store);
        call(
            &state,
            "transfer",
            json!({ "from": hex(&accounts[0]), "recipient": hex(&accounts[1]), "amount": 120 }),
        )
        .await;
        call(
            &state,
            "authorize",
            json!({ "from": hex(&accounts[1]), "spender": hex(&accounts[2]), "amount": 40 }),
        )
        .await;
    });

    let store = SnapshotStore::new(dir.path()).unwrap();
    let ledger = open_ledger(&genesis, &store).unwrap();
    assert_eq!(ledger.coin_balance(&accounts[0]), 380);
    assert_eq!(ledger.coin_balance(&accounts[1]), 120);
    assert_eq!(ledger.allowance(&accounts[1], &accounts[2]), 40);
}

/// Requests that are not POST /rpc never reach the ledger.
#[test]
fn test_rpc_route_rejects_other_paths() {
    let rt = Runtime::new().unwrap();
    let dir = tempdir().unwrap();
    let accounts = accounts(1);

    rt.block_on(async {
        let store = SnapshotStore::new(dir.path()).unwrap();
        let state = NodeState::new(SharedLedger::new(TokenLedger::new(accounts[0], 1)), store);
        let filter = rpc::routes(state);

        let response = warp::test::request().method("GET").path("/rpc").reply(&filter).await;
        assert_eq!(response.status(), 405);

        let response = warp::test::request()
            .method("POST")
            .path("/other")
            .body("{}")
            .reply(&filter)
            .await;
        assert_eq!(response.status(), 404);
    });
}
