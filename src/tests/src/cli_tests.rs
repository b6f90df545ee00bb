//! Tests for the CLI wallet against a live node.

use crate::accounts;
use coin_cli::commands::{authorize, mint, query, send, transfer_from};
use coin_cli::{RpcClient, WalletError};
use coin_core::{SharedLedger, TokenLedger};
use coin_node::{rpc::start_rpc_server, storage::SnapshotStore, NodeState};
use serial_test::serial;
use tempfile::tempdir;
use tokio::runtime::Runtime;

fn rejection_kind(err: WalletError) -> String {
    match err {
        WalletError::Rejected { kind: Some(kind), .. } => kind,
        other => panic!("expected a rejection, got {}", other),
    }
}

/// Drives the wallet commands through the reference scenario.
#[test]
#[serial]
fn test_wallet_commands() {
    let rt = Runtime::new().unwrap();
    let dir = tempdir().unwrap();
    let accounts = accounts(5);
    let hex: Vec<String> = accounts.iter().map(|a| a.to_string()).collect();

    rt.block_on(async {
        let store = SnapshotStore::new(dir.path()).unwrap();
        let ledger = SharedLedger::new(TokenLedger::new(accounts[0], 10000));
        let addr = start_rpc_server("127.0.0.1:0".parse().unwrap(), NodeState::new(ledger, store))
            .await
            .unwrap();
        let client = RpcClient::new(&format!("http://{}", addr));

        assert_eq!(query::owner(&client).await.unwrap(), accounts[0]);
        assert_eq!(query::total_supply(&client).await.unwrap(), 10000);

        let err = mint::run(&client, &accounts[1], &hex[2], "1000").await.unwrap_err();
        assert_eq!(rejection_kind(err), "NotAuthorized");

        mint::run(&client, &accounts[0], &hex[1], "1000").await.unwrap();
        assert_eq!(query::balance(&client, &hex[1]).await.unwrap(), 1000);

        send::run(&client, &accounts[0], &hex[2], "2000").await.unwrap();
        assert_eq!(query::balance(&client, &hex[0]).await.unwrap(), 8000);
        assert_eq!(query::balance(&client, &hex[2]).await.unwrap(), 2000);

        authorize::run(&client, &accounts[2], &hex[3], "300").await.unwrap();
        assert_eq!(query::allowance(&client, &hex[2], &hex[3]).await.unwrap(), 300);

        let err = transfer_from::run(&client, &accounts[3], &hex[2], &hex[4], "301")
            .await
            .unwrap_err();
        assert_eq!(rejection_kind(err), "NotAuthorized");

        transfer_from::run(&client, &accounts[3], &hex[2], &hex[4], "150").await.unwrap();
        assert_eq!(query::allowance(&client, &hex[2], &hex[3]).await.unwrap(), 150);
        assert_eq!(query::balance(&client, &hex[2]).await.unwrap(), 1850);
        assert_eq!(query::balance(&client, &hex[4]).await.unwrap(), 150);

        let err = send::run(&client, &accounts[1], &hex[2], "12000").await.unwrap_err();
        assert_eq!(rejection_kind(err), "InsufficientBalance");
    });
}

/// Malformed input is caught before anything is sent.
#[test]
fn test_wallet_validates_input() {
    let rt = Runtime::new().unwrap();
    let accounts = accounts(2);
    // Nothing listens here; validation must fail first
    let client = RpcClient::new("http://127.0.0.1:9");

    rt.block_on(async {
        let err = send::run(&client, &accounts[0], "0x1234", "5").await.unwrap_err();
        assert!(matches!(err, WalletError::InvalidAddress(_)));

        let err = send::run(&client, &accounts[0], &accounts[1].to_string(), "-5")
            .await
            .unwrap_err();
        assert!(matches!(err, WalletError::InvalidAmount(_)));

        let err = authorize::run(&client, &accounts[0], &accounts[1].to_string(), "ten")
            .await
            .unwrap_err();
        assert!(matches!(err, WalletError::InvalidAmount(_)));
    });
}
