//! Remote state snapshots: accounts, assets, trading pairs and NFTs.
//!
//! These are read-only views of server state. Nothing here is cached; every
//! value is re-fetched for each operation that needs it.

use crate::amount::serde_str;
use crate::types::{AccountIndex, AssetId, NftIndex, PairIndex};
use alloy::primitives::keccak256;
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

/// Hash of a human-readable account name, as embedded in transactions that
/// address an account.
pub fn account_name_hash(name: &str) -> [u8; 32] {
    keccak256(name.trim().as_bytes()).0
}

/// Per-asset balance held by an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountAsset {
    pub asset_id: AssetId,
    #[serde(with = "serde_str")]
    pub balance: BigInt,
}

/// Layer-2 account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub index: AccountIndex,
    /// Registered name (e.g. "sher.legend").
    #[serde(default)]
    pub name: String,
    /// Hex-encoded public key registered for the account.
    #[serde(default)]
    pub pk: String,
    /// Next nonce the account will consume.
    #[serde(default)]
    pub nonce: i64,
    #[serde(default)]
    pub assets: Vec<AccountAsset>,
}

impl Account {
    /// Balance of `asset_id`; zero when the account holds none.
    pub fn balance_of(&self, asset_id: AssetId) -> BigInt {
        self.assets
            .iter()
            .find(|a| a.asset_id == asset_id)
            .map(|a| a.balance.clone())
            .unwrap_or_default()
    }

    pub fn name_hash(&self) -> [u8; 32] {
        account_name_hash(&self.name)
    }
}

/// The account that collects gas fees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasAccount {
    pub index: AccountIndex,
    #[serde(default)]
    pub name: String,
}

/// Registered fungible asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub asset_id: AssetId,
    pub asset_name: String,
    #[serde(default)]
    pub asset_symbol: String,
    #[serde(default)]
    pub asset_decimals: u32,
    /// L1 token contract (empty for the native asset).
    #[serde(default)]
    pub l1_address: String,
    #[serde(default)]
    pub is_gas_asset: bool,
}

/// Liquidity pool between two assets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradingPair {
    pub pair_index: PairIndex,
    pub asset_a_id: AssetId,
    #[serde(with = "serde_str")]
    pub asset_a_amount: BigInt,
    pub asset_b_id: AssetId,
    #[serde(with = "serde_str")]
    pub asset_b_amount: BigInt,
    /// Swap fee in basis points.
    #[serde(default)]
    pub fee_rate: i64,
    /// Share of the fee routed to the treasury, in basis points.
    #[serde(default)]
    pub treasury_rate: i64,
    #[serde(with = "serde_str")]
    pub total_lp_amount: BigInt,
}

/// Layer-2 NFT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nft {
    pub nft_index: NftIndex,
    pub creator_account_index: AccountIndex,
    pub owner_account_index: AccountIndex,
    pub nft_content_hash: String,
    #[serde(default)]
    pub collection_id: i64,
    #[serde(default)]
    pub creator_treasury_rate: i64,
}

/// One page of an account's NFTs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftList {
    pub total: i64,
    #[serde(default)]
    pub nfts: Vec<Nft>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_deserialize_and_balance() {
        let json = r#"{
            "index": 2,
            "name": "sher.legend",
            "pk": "0x02ab",
            "nonce": 7,
            "assets": [
                {"asset_id": 0, "balance": "100000000000000000"},
                {"asset_id": 1, "balance": "5"}
            ]
        }"#;
        let account: Account = serde_json::from_str(json).unwrap();
        assert_eq!(account.index, AccountIndex::new(2));
        assert_eq!(account.nonce, 7);
        assert_eq!(
            account.balance_of(AssetId::new(0)),
            BigInt::from(100_000_000_000_000_000u64)
        );
        assert_eq!(account.balance_of(AssetId::new(9)), BigInt::from(0));
    }

    #[test]
    fn test_name_hash_ignores_surrounding_whitespace() {
        assert_eq!(
            account_name_hash("gavin.legend"),
            account_name_hash(" gavin.legend ")
        );
        assert_ne!(
            account_name_hash("gavin.legend"),
            account_name_hash("sher.legend")
        );
    }
}
