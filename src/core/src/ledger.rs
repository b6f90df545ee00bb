//! The token ledger: balances, owner minting and the allowance table.

use crate::errors::CoreError;
use crate::types::{Address, Balance, LedgerMsg};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info};

/// An in-memory fungible-token ledger.
///
/// The owner is fixed at construction and is the only account that may mint.
/// Every mutating method validates all of its preconditions before writing, so
/// an `Err` return leaves the ledger untouched.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenLedger {
    /// The account allowed to mint
    owner: Address,
    /// Initial supply plus everything minted since
    total_supply: Balance,
    /// Balances by account; absent means zero
    balances: HashMap<Address, Balance>,
    /// Allowances by (funds holder, spender); absent means zero
    allowances: HashMap<(Address, Address), Balance>,
}

impl TokenLedger {
    /// Creates a ledger owned by `caller`, crediting `initial_supply` to it.
    ///
    /// # Arguments
    ///
    /// * `caller` - The constructing account, which becomes the owner
    /// * `initial_supply` - Tokens credited to the owner
    pub fn new(caller: Address, initial_supply: Balance) -> Self {
        let mut ledger = Self {
            owner: caller,
            total_supply: initial_supply,
            balances: HashMap::new(),
            allowances: HashMap::new(),
        };
        ledger.set_balance(caller, initial_supply);

        info!("Ledger created: owner {}, initial supply {}", caller, initial_supply);
        ledger
    }

    /// Builds a ledger from already-validated parts.
    pub(crate) fn from_parts(
        owner: Address,
        total_supply: Balance,
        balances: HashMap<Address, Balance>,
        allowances: HashMap<(Address, Address), Balance>,
    ) -> Self {
        Self { owner, total_supply, balances, allowances }
    }

    /// Returns the ledger owner.
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Returns the total number of tokens in existence.
    pub fn total_supply(&self) -> Balance {
        self.total_supply
    }

    /// Returns the balance of `account`, or zero if it was never credited.
    pub fn coin_balance(&self, account: &Address) -> Balance {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Returns how much `spender` may still move out of `owner`'s balance.
    pub fn allowance(&self, owner: &Address, spender: &Address) -> Balance {
        self.allowances.get(&(*owner, *spender)).copied().unwrap_or(0)
    }

    /// Iterates over every account with a non-zero balance.
    pub fn balances(&self) -> impl Iterator<Item = (&Address, &Balance)> {
        self.balances.iter()
    }

    /// Iterates over every non-zero allowance as `((owner, spender), amount)`.
    pub fn allowances(&self) -> impl Iterator<Item = (&(Address, Address), &Balance)> {
        self.allowances.iter()
    }

    /// Mints new tokens to `recipient`.
    ///
    /// # Arguments
    ///
    /// * `caller` - The calling account (must be the owner)
    /// * `recipient` - The account to credit
    /// * `amount` - The amount to mint
    ///
    /// # Returns
    ///
    /// `Ok(())` if the mint was applied, `Err(CoreError)` otherwise
    pub fn mint(
        &mut self,
        caller: &Address,
        recipient: &Address,
        amount: Balance,
    ) -> Result<(), CoreError> {
        debug!("mint: caller {}, recipient {}, amount {}", caller, recipient, amount);

        if *caller != self.owner {
            return Err(CoreError::NotAuthorized(format!(
                "only the owner ({}) can mint, got {}",
                self.owner, caller
            )));
        }

        let new_supply = self.total_supply.checked_add(amount).ok_or_else(|| {
            CoreError::ArithmeticOverflow(format!(
                "minting {} would overflow total supply {}",
                amount, self.total_supply
            ))
        })?;

        let new_balance = credit(self.coin_balance(recipient), amount, recipient)?;

        self.total_supply = new_supply;
        self.set_balance(*recipient, new_balance);

        info!("Minted {} tokens to {}. New supply: {}", amount, recipient, new_supply);
        Ok(())
    }

    /// Transfers tokens from the caller to `recipient`.
    ///
    /// A transfer to oneself is accepted as long as the caller holds `amount`,
    /// and leaves the balance unchanged.
    pub fn transfer(
        &mut self,
        caller: &Address,
        recipient: &Address,
        amount: Balance,
    ) -> Result<(), CoreError> {
        debug!("transfer: caller {}, recipient {}, amount {}", caller, recipient, amount);

        self.move_balance(caller, recipient, amount)?;

        info!("Transferred {} tokens from {} to {}", amount, caller, recipient);
        Ok(())
    }

    /// Sets the allowance of `spender` over the caller's balance to `amount`.
    ///
    /// The new value replaces any previous allowance. No balance check is made.
    pub fn authorize(
        &mut self,
        caller: &Address,
        spender: &Address,
        amount: Balance,
    ) -> Result<(), CoreError> {
        debug!("authorize: caller {}, spender {}, amount {}", caller, spender, amount);

        self.set_allowance(*caller, *spender, amount);

        info!("{} authorized {} to spend {} tokens", caller, spender, amount);
        Ok(())
    }

    /// Transfers tokens out of `owner`'s balance on the caller's allowance.
    ///
    /// # Arguments
    ///
    /// * `caller` - The spender
    /// * `owner` - The funds holder
    /// * `recipient` - The account to credit
    /// * `amount` - The amount to transfer
    ///
    /// # Returns
    ///
    /// `Ok(())` if the transfer was applied, `Err(CoreError)` otherwise
    pub fn transfer_from(
        &mut self,
        caller: &Address,
        owner: &Address,
        recipient: &Address,
        amount: Balance,
    ) -> Result<(), CoreError> {
        debug!(
            "transferFrom: caller {}, owner {}, recipient {}, amount {}",
            caller, owner, recipient, amount
        );

        let allowed = self.allowance(owner, caller);
        if allowed < amount {
            return Err(CoreError::NotAuthorized(format!(
                "{} may spend {} of {}'s tokens, requested {}",
                caller, allowed, owner, amount
            )));
        }

        // The balance move is the only step that can still fail, so the
        // allowance is written after it succeeds.
        self.move_balance(owner, recipient, amount)?;
        self.set_allowance(*owner, *caller, allowed - amount);

        info!(
            "{} transferred {} tokens from {} to {}",
            caller, amount, owner, recipient
        );
        Ok(())
    }

    /// Applies a ledger message.
    pub fn apply(&mut self, msg: &LedgerMsg) -> Result<(), CoreError> {
        match msg {
            LedgerMsg::Mint { caller, recipient, amount } => self.mint(caller, recipient, *amount),
            LedgerMsg::Transfer { caller, recipient, amount } => {
                self.transfer(caller, recipient, *amount)
            }
            LedgerMsg::Authorize { caller, spender, amount } => {
                self.authorize(caller, spender, *amount)
            }
            LedgerMsg::TransferFrom { caller, owner, recipient, amount } => {
                self.transfer_from(caller, owner, recipient, *amount)
            }
        }
    }

    /// Debits `from` and credits `to`, or does nothing on error.
    fn move_balance(
        &mut self,
        from: &Address,
        to: &Address,
        amount: Balance,
    ) -> Result<(), CoreError> {
        let from_bal = self.coin_balance(from);
        if from_bal < amount {
            return Err(CoreError::InsufficientBalance {
                account: *from,
                required: amount,
                available: from_bal,
            });
        }

        if from == to {
            return Ok(());
        }

        let new_to = credit(self.coin_balance(to), amount, to)?;

        self.set_balance(*from, from_bal - amount);
        self.set_balance(*to, new_to);
        Ok(())
    }

    fn set_balance(&mut self, account: Address, balance: Balance) {
        if balance == 0 {
            self.balances.remove(&account);
        } else {
            self.balances.insert(account, balance);
        }
    }

    fn set_allowance(&mut self, owner: Address, spender: Address, amount: Balance) {
        if amount == 0 {
            self.allowances.remove(&(owner, spender));
        } else {
            self.allowances.insert((owner, spender), amount);
        }
    }
}

fn credit(balance: Balance, amount: Balance, account: &Address) -> Result<Balance, CoreError> {
    balance.checked_add(amount).ok_or_else(|| {
        CoreError::ArithmeticOverflow(format!(
            "crediting {} to {} would overflow balance {}",
            amount, account, balance
        ))
    })
}

impl fmt::Debug for TokenLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenLedger")
            .field("owner", &self.owner)
            .field("total_supply", &self.total_supply)
            .field("accounts", &self.balances.len())
            .field("allowances", &self.allowances.len())
            .finish()
    }
}

impl fmt::Display for TokenLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TokenLedger {{ owner: {}, total_supply: {}, accounts: {} }}",
            self.owner,
            self.total_supply,
            self.balances.len()
        )
    }
}
