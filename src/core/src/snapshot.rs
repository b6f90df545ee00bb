//! Serializable snapshots of the ledger state.

use crate::errors::CoreError;
use crate::ledger::TokenLedger;
use crate::types::{Address, Balance};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;

/// One row of the allowance table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceEntry {
    /// The funds holder
    pub owner: Address,
    /// The account allowed to spend
    pub spender: Address,
    /// The remaining allowance
    pub amount: Balance,
}

/// Full state of a ledger, in a deterministic order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// The ledger owner
    pub owner: Address,
    /// The total supply
    pub total_supply: Balance,
    /// Non-zero balances, sorted by address
    pub balances: Vec<(Address, Balance)>,
    /// Non-zero allowances, sorted by (owner, spender)
    pub allowances: Vec<AllowanceEntry>,
}

impl LedgerSnapshot {
    /// Encodes the snapshot with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CoreError> {
        bincode::serialize(self).map_err(|e| CoreError::Snapshot(e.to_string()))
    }

    /// Decodes a snapshot previously written by [`LedgerSnapshot::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CoreError> {
        bincode::deserialize(bytes).map_err(|e| CoreError::Snapshot(e.to_string()))
    }

    /// Renders the snapshot as JSON, with every amount as a decimal string.
    ///
    /// JSON numbers cannot hold the full `Balance` range, so this view is built
    /// by hand instead of through the `Serialize` impl used for bincode.
    pub fn to_json(&self) -> serde_json::Value {
        let balances: Vec<serde_json::Value> = self
            .balances
            .iter()
            .map(|(addr, bal)| json!([addr, bal.to_string()]))
            .collect();
        let allowances: Vec<serde_json::Value> = self
            .allowances
            .iter()
            .map(|entry| {
                json!({
                    "owner": entry.owner,
                    "spender": entry.spender,
                    "amount": entry.amount.to_string(),
                })
            })
            .collect();

        json!({
            "owner": self.owner,
            "total_supply": self.total_supply.to_string(),
            "balances": balances,
            "allowances": allowances,
        })
    }
}

impl TokenLedger {
    /// Captures the current state.
    pub fn snapshot(&self) -> LedgerSnapshot {
        let mut balances: Vec<(Address, Balance)> =
            self.balances().map(|(addr, bal)| (*addr, *bal)).collect();
        balances.sort();

        let mut allowances: Vec<AllowanceEntry> = self
            .allowances()
            .map(|((owner, spender), amount)| AllowanceEntry {
                owner: *owner,
                spender: *spender,
                amount: *amount,
            })
            .collect();
        allowances.sort_by(|a, b| (a.owner, a.spender).cmp(&(b.owner, b.spender)));

        LedgerSnapshot {
            owner: self.owner(),
            total_supply: self.total_supply(),
            balances,
            allowances,
        }
    }

    /// Rebuilds a ledger from a snapshot.
    ///
    /// Fails if an account or allowance pair appears twice, or if the balances
    /// do not add up to the recorded total supply.
    pub fn restore(snapshot: LedgerSnapshot) -> Result<Self, CoreError> {
        let mut balances = HashMap::with_capacity(snapshot.balances.len());
        let mut sum: Balance = 0;
        for (addr, bal) in snapshot.balances {
            sum = sum.checked_add(bal).ok_or_else(|| {
                CoreError::Snapshot("balances overflow the supply range".to_string())
            })?;
            if bal == 0 {
                continue;
            }
            if balances.insert(addr, bal).is_some() {
                return Err(CoreError::Snapshot(format!("duplicate balance for {}", addr)));
            }
        }

        if sum != snapshot.total_supply {
            return Err(CoreError::Snapshot(format!(
                "balances sum to {} but total supply is {}",
                sum, snapshot.total_supply
            )));
        }

        let mut allowances = HashMap::with_capacity(snapshot.allowances.len());
        for entry in snapshot.allowances {
            if entry.amount == 0 {
                continue;
            }
            if allowances.insert((entry.owner, entry.spender), entry.amount).is_some() {
                return Err(CoreError::Snapshot(format!(
                    "duplicate allowance for ({}, {})",
                    entry.owner, entry.spender
                )));
            }
        }

        Ok(TokenLedger::from_parts(
            snapshot.owner,
            snapshot.total_supply,
            balances,
            allowances,
        ))
    }
}
