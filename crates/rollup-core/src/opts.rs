//! Transaction options: the caller-facing partial form and the fully
//! resolved form consumed by the builders.
//!
//! Unset fields are `None`, never a sentinel. A single resolution step turns
//! a [`TransactOpts`] into a [`ResolvedOpts`]; builders only ever see the
//! resolved form, so every default is fixed before anything is signed.

use crate::amount::ensure_amount;
use crate::error::{CoreError, Result};
use crate::hex_serde;
use crate::types::{ensure_non_negative, AccountIndex, AssetId};
use alloy::primitives::Address;
use num_bigint::BigInt;

/// Partially specified options. Created per call, consumed once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactOpts {
    /// Sending account. Unset: looked up by the signing key's public key.
    pub from_account_index: Option<AccountIndex>,
    /// Fee collector. Unset: the network's gas account.
    pub gas_account_index: Option<AccountIndex>,
    /// Fee asset. Unset: the configured default gas asset.
    pub gas_fee_asset_id: Option<AssetId>,
    /// Fee amount. Unset: quoted by the network for the fee asset.
    pub gas_fee_asset_amount: Option<BigInt>,
    /// Unset: fetched from the network on every call (no local cache).
    pub nonce: Option<i64>,
    /// Milliseconds since epoch. Unset: now + default window.
    pub expired_at: Option<i64>,
    /// Free-form memo hashed into transfers.
    pub call_data: Option<String>,
}

impl TransactOpts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_from_account_index(mut self, index: AccountIndex) -> Self {
        self.from_account_index = Some(index);
        self
    }

    pub fn with_gas_account_index(mut self, index: AccountIndex) -> Self {
        self.gas_account_index = Some(index);
        self
    }

    pub fn with_gas_fee(mut self, asset_id: AssetId, amount: BigInt) -> Self {
        self.gas_fee_asset_id = Some(asset_id);
        self.gas_fee_asset_amount = Some(amount);
        self
    }

    pub fn with_nonce(mut self, nonce: i64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    pub fn with_expired_at(mut self, expired_at: i64) -> Self {
        self.expired_at = Some(expired_at);
        self
    }

    pub fn with_call_data(mut self, call_data: impl Into<String>) -> Self {
        self.call_data = Some(call_data.into());
        self
    }
}

/// Where a transaction sends value, in the network's canonical form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// A layer-2 account.
    Account {
        index: AccountIndex,
        name_hash: [u8; 32],
    },
    /// A layer-1 address (withdrawals).
    L1Address(Address),
}

/// How a human-supplied destination string should be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestinationRef {
    /// Already canonical; passes through unchanged.
    L1Address(Address),
    /// Hex public key, resolved by account lookup.
    PubKey(String),
    /// Account name, resolved by account lookup.
    Name(String),
}

impl DestinationRef {
    /// Classify a destination string.
    ///
    /// `0x` + 40 hex digits is an L1 address; 66 or 130 hex digits (with or
    /// without `0x`) is a compressed or uncompressed public key; anything
    /// else is an account name.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidRequest(
                "destination must not be empty".to_string(),
            ));
        }
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let is_hex = !digits.is_empty() && digits.chars().all(|c| c.is_ascii_hexdigit());

        if is_hex && trimmed.starts_with("0x") && digits.len() == 40 {
            return parse_l1_address(trimmed).map(Self::L1Address);
        }
        if is_hex && (digits.len() == 66 || digits.len() == 130) {
            return Ok(Self::PubKey(digits.to_ascii_lowercase()));
        }
        Ok(Self::Name(trimmed.to_string()))
    }
}

/// Parse a `0x`-prefixed 20-byte L1 address.
pub fn parse_l1_address(input: &str) -> Result<Address> {
    let trimmed = input.trim();
    if !trimmed.starts_with("0x") {
        return Err(CoreError::InvalidRequest(format!(
            "L1 address must be 0x-prefixed: {trimmed:?}"
        )));
    }
    let bytes = hex_serde::decode(trimmed)
        .map_err(|e| CoreError::InvalidRequest(format!("invalid L1 address {trimmed:?}: {e}")))?;
    if bytes.len() != 20 {
        return Err(CoreError::InvalidRequest(format!(
            "L1 address must be 20 bytes, got {}",
            bytes.len()
        )));
    }
    Ok(Address::from_slice(&bytes))
}

/// Fully resolved options. Every field is concrete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOpts {
    pub from_account_index: AccountIndex,
    pub gas_account_index: AccountIndex,
    pub gas_fee_asset_id: AssetId,
    pub gas_fee_asset_amount: BigInt,
    pub nonce: i64,
    pub expired_at: i64,
    pub call_data: String,
    /// Set for kinds that address a destination.
    pub to: Option<Destination>,
}

impl ResolvedOpts {
    pub fn validate(&self) -> Result<()> {
        self.from_account_index.ensure_valid()?;
        self.gas_account_index.ensure_valid()?;
        self.gas_fee_asset_id.ensure_valid()?;
        ensure_amount("gas fee asset amount", &self.gas_fee_asset_amount)?;
        ensure_non_negative("nonce", self.nonce)?;
        if self.expired_at <= 0 {
            return Err(CoreError::InvalidRequest(format!(
                "expired_at must be a positive timestamp, got {}",
                self.expired_at
            )));
        }
        Ok(())
    }

    /// Destination as a layer-2 account, or an error naming the kind.
    pub fn account_destination(&self, kind: &str) -> Result<(AccountIndex, [u8; 32])> {
        match self.to {
            Some(Destination::Account { index, name_hash }) => Ok((index, name_hash)),
            Some(Destination::L1Address(addr)) => Err(CoreError::InvalidRequest(format!(
                "{kind} requires a layer-2 account destination, got L1 address {addr}"
            ))),
            None => Err(CoreError::InvalidRequest(format!(
                "{kind} requires a resolved destination"
            ))),
        }
    }
}
