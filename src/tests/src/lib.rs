//! Integration tests for the SimpleCoin ledger.

pub mod cli_tests;
pub mod core_tests;
pub mod node_tests;

use coin_core::{Address, ADDRESS_LEN};
use rand::Rng;

/// Creates `n` distinct random accounts, like a test chain's account list.
pub fn accounts(n: usize) -> Vec<Address> {
    let mut rng = rand::thread_rng();
    let mut accounts: Vec<Address> = Vec::with_capacity(n);
    while accounts.len() < n {
        let mut bytes = [0u8; ADDRESS_LEN];
        rng.fill(&mut bytes);
        let addr = Address::new(bytes);
        if !accounts.contains(&addr) {
            accounts.push(addr);
        }
    }
    accounts
}
