//! Core types for the token ledger.

use crate::errors::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Width of an account identifier in bytes.
pub const ADDRESS_LEN: usize = 20;

/// Token balance, represented as a 128-bit unsigned integer.
pub type Balance = u128;

/// An opaque, fixed-width account identifier.
///
/// The ledger only compares and hashes addresses. At text boundaries an address
/// is rendered as `0x`-prefixed lowercase hex.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(pub [u8; ADDRESS_LEN]);

impl Address {
    /// Creates an address from raw bytes.
    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Parses an address from hex, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        let bytes = hex::decode(digits)
            .map_err(|e| CoreError::InvalidAddress(format!("{}: {}", s, e)))?;

        if bytes.len() != ADDRESS_LEN {
            return Err(CoreError::InvalidAddress(format!(
                "{}: expected {} bytes, got {}",
                s,
                ADDRESS_LEN,
                bytes.len()
            )));
        }

        let mut addr = [0u8; ADDRESS_LEN];
        addr.copy_from_slice(&bytes);
        Ok(Self(addr))
    }
}

impl FromStr for Address {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

// Addresses travel as hex strings in both JSON and bincode so that persisted
// snapshots and RPC payloads agree on one representation.
impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct AddressVisitor;

        impl<'de> serde::de::Visitor<'de> for AddressVisitor {
            type Value = Address;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                write!(formatter, "a {}-byte hex address", ADDRESS_LEN)
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Address::from_hex(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(AddressVisitor)
    }
}

/// Parses a token amount from its decimal text form.
///
/// Negative, fractional, empty or out-of-range values are rejected with
/// [`CoreError::InvalidAmount`].
pub fn parse_amount(s: &str) -> Result<Balance, CoreError> {
    let trimmed = s.trim();
    if trimmed.starts_with('-') {
        return Err(CoreError::InvalidAmount(format!(
            "amount must not be negative: {}",
            trimmed
        )));
    }
    trimmed
        .parse::<Balance>()
        .map_err(|e| CoreError::InvalidAmount(format!("{}: {}", trimmed, e)))
}

/// A mutating ledger operation, with the authenticated caller made explicit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerMsg {
    /// Issue new tokens to `recipient` (owner only).
    Mint {
        /// The caller; must be the ledger owner
        caller: Address,
        /// The account credited
        recipient: Address,
        /// The amount to mint
        amount: Balance,
    },

    /// Move tokens from the caller to `recipient`.
    Transfer {
        /// The sender
        caller: Address,
        /// The account credited
        recipient: Address,
        /// The amount to transfer
        amount: Balance,
    },

    /// Set the allowance of `spender` over the caller's balance.
    Authorize {
        /// The funds holder
        caller: Address,
        /// The account allowed to spend
        spender: Address,
        /// The new allowance
        amount: Balance,
    },

    /// Move tokens out of `owner` on the caller's allowance.
    TransferFrom {
        /// The spender
        caller: Address,
        /// The funds holder
        owner: Address,
        /// The account credited
        recipient: Address,
        /// The amount to transfer
        amount: Balance,
    },
}

impl LedgerMsg {
    /// Short operation name, used for logging and metric labels.
    pub fn name(&self) -> &'static str {
        match self {
            LedgerMsg::Mint { .. } => "mint",
            LedgerMsg::Transfer { .. } => "transfer",
            LedgerMsg::Authorize { .. } => "authorize",
            LedgerMsg::TransferFrom { .. } => "transferFrom",
        }
    }
}

impl fmt::Display for LedgerMsg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerMsg::Mint { caller, recipient, amount } => {
                write!(f, "Mint {{ caller: {}, recipient: {}, amount: {} }}", caller, recipient, amount)
            }
            LedgerMsg::Transfer { caller, recipient, amount } => {
                write!(f, "Transfer {{ caller: {}, recipient: {}, amount: {} }}", caller, recipient, amount)
            }
            LedgerMsg::Authorize { caller, spender, amount } => {
                write!(f, "Authorize {{ caller: {}, spender: {}, amount: {} }}", caller, spender, amount)
            }
            LedgerMsg::TransferFrom { caller, owner, recipient, amount } => {
                write!(
                    f,
                    "TransferFrom {{ caller: {}, owner: {}, recipient: {}, amount: {} }}",
                    caller, owner, recipient, amount
                )
            }
        }
    }
}
