//! Thread-safe handle to a ledger.

use crate::errors::CoreError;
use crate::ledger::TokenLedger;
use crate::snapshot::LedgerSnapshot;
use crate::types::{Address, Balance, LedgerMsg};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A cloneable, thread-safe handle to a [`TokenLedger`].
///
/// Mutations are serialized behind the write lock, so every mutation observes
/// the fully applied result of the one before it. Reads share the read lock and
/// never see a half-applied mutation.
#[derive(Clone, Debug)]
pub struct SharedLedger {
    inner: Arc<RwLock<TokenLedger>>,
}

impl SharedLedger {
    /// Wraps a ledger.
    pub fn new(ledger: TokenLedger) -> Self {
        Self { inner: Arc::new(RwLock::new(ledger)) }
    }

    // A panic while holding the lock cannot leave the ledger half-written:
    // every mutation validates before it writes. The poison flag is ignored.
    fn read(&self) -> RwLockReadGuard<'_, TokenLedger> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, TokenLedger> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns the ledger owner.
    pub fn owner(&self) -> Address {
        self.read().owner()
    }

    /// Returns the total supply.
    pub fn total_supply(&self) -> Balance {
        self.read().total_supply()
    }

    /// Returns the balance of `account`.
    pub fn coin_balance(&self, account: &Address) -> Balance {
        self.read().coin_balance(account)
    }

    /// Returns the allowance of `spender` over `owner`'s balance.
    pub fn allowance(&self, owner: &Address, spender: &Address) -> Balance {
        self.read().allowance(owner, spender)
    }

    /// See [`TokenLedger::mint`].
    pub fn mint(&self, caller: &Address, recipient: &Address, amount: Balance) -> Result<(), CoreError> {
        self.write().mint(caller, recipient, amount)
    }

    /// See [`TokenLedger::transfer`].
    pub fn transfer(&self, caller: &Address, recipient: &Address, amount: Balance) -> Result<(), CoreError> {
        self.write().transfer(caller, recipient, amount)
    }

    /// See [`TokenLedger::authorize`].
    pub fn authorize(&self, caller: &Address, spender: &Address, amount: Balance) -> Result<(), CoreError> {
        self.write().authorize(caller, spender, amount)
    }

    /// See [`TokenLedger::transfer_from`].
    pub fn transfer_from(
        &self,
        caller: &Address,
        owner: &Address,
        recipient: &Address,
        amount: Balance,
    ) -> Result<(), CoreError> {
        self.write().transfer_from(caller, owner, recipient, amount)
    }

    /// Applies a message.
    pub fn apply(&self, msg: &LedgerMsg) -> Result<(), CoreError> {
        self.write().apply(msg)
    }

    /// Applies a message and hands the resulting state to `commit` before it
    /// becomes visible.
    ///
    /// The message is applied to a copy under the write lock. The copy replaces
    /// the live ledger only if `commit` succeeds, so a failed commit leaves the
    /// ledger exactly as it was.
    ///
    /// Both the copy and the snapshot handed to `commit` cost O(accounts) per
    /// call. That suits ledgers that fit comfortably in memory; a large ledger
    /// would want a journal of touched entries instead.
    pub fn apply_with<F, E>(&self, msg: &LedgerMsg, commit: F) -> Result<(), E>
    where
        F: FnOnce(&LedgerSnapshot) -> Result<(), E>,
        E: From<CoreError>,
    {
        let mut ledger = self.write();
        let mut next = ledger.clone();
        next.apply(msg)?;
        commit(&next.snapshot())?;
        *ledger = next;
        Ok(())
    }

    /// Captures the current state.
    pub fn snapshot(&self) -> LedgerSnapshot {
        self.read().snapshot()
    }
}
