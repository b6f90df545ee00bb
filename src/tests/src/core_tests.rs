//! Tests for the core crate.

use crate::accounts;
use coin_core::{Balance, CoreError, LedgerMsg, TokenLedger};
use rand::Rng;

/// Walks through the reference deployment scenario.
#[test]
fn test_reference_scenario() {
    let accounts = accounts(5);
    let owner = accounts[0];
    let mut ledger = TokenLedger::new(owner, 10000);

    assert_eq!(ledger.owner(), accounts[0]);
    assert_eq!(ledger.coin_balance(&owner), 10000);

    ledger.mint(&owner, &accounts[1], 1000).unwrap();
    assert_eq!(ledger.coin_balance(&accounts[1]), 1000);

    ledger.transfer(&owner, &accounts[2], 2000).unwrap();
    assert_eq!(ledger.coin_balance(&owner), 8000);
    assert_eq!(ledger.coin_balance(&accounts[2]), 2000);

    ledger.authorize(&accounts[2], &accounts[3], 300).unwrap();
    assert_eq!(ledger.allowance(&accounts[2], &accounts[3]), 300);

    let err = ledger
        .transfer_from(&accounts[3], &accounts[2], &accounts[4], 301)
        .unwrap_err();
    assert!(matches!(err, CoreError::NotAuthorized(_)));

    ledger
        .transfer_from(&accounts[3], &accounts[2], &accounts[4], 150)
        .unwrap();
    assert_eq!(ledger.allowance(&accounts[2], &accounts[3]), 150);
    assert_eq!(ledger.coin_balance(&accounts[2]), 1850);
    assert_eq!(ledger.coin_balance(&accounts[4]), 150);
    assert_eq!(ledger.coin_balance(&accounts[3]), 0);
}

/// Non-owners can never mint, whoever they credit.
#[test]
fn test_only_owner_mints() {
    let accounts = accounts(4);
    let mut ledger = TokenLedger::new(accounts[0], 10000);
    let before = ledger.clone();

    for caller in &accounts[1..] {
        for recipient in &accounts {
            let err = ledger.mint(caller, recipient, 1000).unwrap_err();
            assert!(matches!(err, CoreError::NotAuthorized(_)));
        }
    }
    assert_eq!(ledger, before);
}

/// A spender with no authorization is rejected even when the holder is rich.
#[test]
fn test_unauthorized_spender_rejected() {
    let accounts = accounts(5);
    let mut ledger = TokenLedger::new(accounts[0], 10000);
    ledger.mint(&accounts[0], &accounts[2], 600).unwrap();

    let err = ledger
        .transfer_from(&accounts[3], &accounts[2], &accounts[4], 150)
        .unwrap_err();
    assert!(matches!(err, CoreError::NotAuthorized(_)));

    // Authorization granted to someone else does not help
    ledger.authorize(&accounts[2], &accounts[1], 300).unwrap();
    let err = ledger
        .transfer_from(&accounts[3], &accounts[2], &accounts[4], 150)
        .unwrap_err();
    assert!(matches!(err, CoreError::NotAuthorized(_)));
}

/// An allowance can be spent down to exactly zero, and no further.
#[test]
fn test_allowance_exhaustion() {
    let accounts = accounts(5);
    let mut ledger = TokenLedger::new(accounts[0], 10000);
    ledger.mint(&accounts[0], &accounts[2], 600).unwrap();
    ledger.authorize(&accounts[2], &accounts[3], 300).unwrap();

    ledger.transfer_from(&accounts[3], &accounts[2], &accounts[4], 150).unwrap();
    assert_eq!(ledger.allowance(&accounts[2], &accounts[3]), 150);
    ledger.transfer_from(&accounts[3], &accounts[2], &accounts[4], 150).unwrap();
    assert_eq!(ledger.allowance(&accounts[2], &accounts[3]), 0);

    let err = ledger
        .transfer_from(&accounts[3], &accounts[2], &accounts[4], 1)
        .unwrap_err();
    assert!(matches!(err, CoreError::NotAuthorized(_)));
    assert_eq!(ledger.coin_balance(&accounts[2]), 300);
    assert_eq!(ledger.coin_balance(&accounts[4]), 300);
}

/// Independent ledgers do not share state.
#[test]
fn test_independent_instances() {
    let accounts = accounts(3);
    let mut first = TokenLedger::new(accounts[0], 100);
    let second = TokenLedger::new(accounts[1], 200);

    first.transfer(&accounts[0], &accounts[2], 50).unwrap();

    assert_eq!(second.coin_balance(&accounts[2]), 0);
    assert_eq!(second.owner(), accounts[1]);
    assert_eq!(first.coin_balance(&accounts[2]), 50);
}

fn random_msg(rng: &mut impl Rng, accounts: &[coin_core::Address]) -> LedgerMsg {
    let mut pick = || accounts[rng.gen_range(0..accounts.len())];
    let (a, b, c) = (pick(), pick(), pick());
    let amount: Balance = rng.gen_range(0..400);
    match rng.gen_range(0..4) {
        0 => LedgerMsg::Mint { caller: a, recipient: b, amount },
        1 => LedgerMsg::Transfer { caller: a, recipient: b, amount },
        2 => LedgerMsg::Authorize { caller: a, spender: b, amount },
        _ => LedgerMsg::TransferFrom { caller: a, owner: b, recipient: c, amount },
    }
}

/// Random operation sequences keep every ledger invariant.
#[test]
fn test_random_operations_keep_invariants() {
    let mut rng = rand::thread_rng();
    let accounts = accounts(5);
    let owner = accounts[0];
    let initial_supply: Balance = 1000;
    let mut ledger = TokenLedger::new(owner, initial_supply);
    let mut minted: Balance = 0;

    for _ in 0..2000 {
        let msg = random_msg(&mut rng, &accounts);
        let before = ledger.clone();

        match ledger.apply(&msg) {
            Ok(()) => match &msg {
                LedgerMsg::Mint { recipient, amount, .. } => {
                    minted += amount;
                    assert_eq!(
                        ledger.coin_balance(recipient),
                        before.coin_balance(recipient) + amount
                    );
                }
                LedgerMsg::Transfer { caller, recipient, amount } if caller != recipient => {
                    assert_eq!(ledger.coin_balance(caller), before.coin_balance(caller) - amount);
                    assert_eq!(
                        ledger.coin_balance(recipient),
                        before.coin_balance(recipient) + amount
                    );
                }
                LedgerMsg::Authorize { caller, spender, amount } => {
                    assert_eq!(ledger.allowance(caller, spender), *amount);
                }
                LedgerMsg::TransferFrom { caller, owner, amount, .. } => {
                    assert_eq!(
                        ledger.allowance(owner, caller),
                        before.allowance(owner, caller) - amount
                    );
                }
                _ => {}
            },
            // Rejections never leave a trace
            Err(_) => assert_eq!(ledger, before),
        }

        assert_eq!(ledger.owner(), owner);
        let sum: Balance = ledger.balances().map(|(_, bal)| *bal).sum();
        assert_eq!(sum, initial_supply + minted);
        assert_eq!(ledger.total_supply(), sum);
    }
}
