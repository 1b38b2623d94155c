//! Typed transaction requests.
//!
//! A request is what the caller wants; it carries no nonce, fee or expiry.
//! Validation here is purely field-level and runs before any network or
//! signing work, so a malformed request never costs a round trip.

use crate::amount::ensure_amount;
use crate::error::{CoreError, Result};
use crate::hex_serde;
use crate::offer::{Offer, OfferType, MAX_RATE_BPS};
use crate::opts::{parse_l1_address, DestinationRef};
use crate::tx_type::TxType;
use crate::types::{ensure_non_negative, ensure_not_blank, AssetId, NftIndex, PairIndex};
use num_bigint::BigInt;

fn ensure_rate(field: &str, rate: i64) -> Result<()> {
    if !(0..=MAX_RATE_BPS).contains(&rate) {
        return Err(CoreError::InvalidRequest(format!(
            "{field} must be within 0..={MAX_RATE_BPS} bps, got {rate}"
        )));
    }
    Ok(())
}

/// Layer-2 destinations are names or public keys; an L1 address is only
/// valid for withdrawals.
fn ensure_account_destination(kind: &str, to: &str) -> Result<()> {
    ensure_not_blank(&format!("{kind} destination"), to)?;
    if let DestinationRef::L1Address(addr) = DestinationRef::parse(to)? {
        return Err(CoreError::InvalidRequest(format!(
            "{kind} requires a layer-2 account destination, got L1 address {addr}"
        )));
    }
    Ok(())
}

fn ensure_distinct_assets(a: AssetId, b: AssetId) -> Result<()> {
    if a == b {
        return Err(CoreError::InvalidRequest(format!(
            "asset A and asset B must differ, both are {a}"
        )));
    }
    Ok(())
}

/// Move an asset to another layer-2 account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferTxReq {
    /// Account name or public key of the recipient.
    pub to: String,
    pub asset_id: AssetId,
    pub asset_amount: BigInt,
}

impl TransferTxReq {
    pub fn validate(&self) -> Result<()> {
        ensure_account_destination("transfer", &self.to)?;
        self.asset_id.ensure_valid()?;
        ensure_amount("asset amount", &self.asset_amount)
    }
}

/// Withdraw an asset to a layer-1 address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawTxReq {
    pub asset_id: AssetId,
    pub asset_amount: BigInt,
    pub to_address: String,
}

impl WithdrawTxReq {
    pub fn validate(&self) -> Result<()> {
        self.asset_id.ensure_valid()?;
        ensure_amount("asset amount", &self.asset_amount)?;
        parse_l1_address(&self.to_address).map(|_| ())
    }
}

/// Mint an NFT into a collection, delivered to a layer-2 account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintNftTxReq {
    pub to: String,
    /// 32-byte content hash, hex.
    pub nft_content_hash: String,
    pub nft_collection_id: i64,
    pub creator_treasury_rate: i64,
    /// Optional metadata; hashed into the encoding (empty allowed).
    pub meta_data: String,
}

impl MintNftTxReq {
    pub fn validate(&self) -> Result<()> {
        ensure_account_destination("mint", &self.to)?;
        self.content_hash_bytes()?;
        ensure_non_negative("nft collection id", self.nft_collection_id)?;
        ensure_rate("creator treasury rate", self.creator_treasury_rate)
    }

    pub fn content_hash_bytes(&self) -> Result<[u8; 32]> {
        let bytes = hex_serde::decode(&self.nft_content_hash).map_err(|e| {
            CoreError::InvalidRequest(format!("nft content hash is not hex: {e}"))
        })?;
        <[u8; 32]>::try_from(bytes.as_slice()).map_err(|_| {
            CoreError::InvalidRequest(format!(
                "nft content hash must be 32 bytes, got {}",
                bytes.len()
            ))
        })
    }
}

/// Give an NFT to another layer-2 account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferNftTxReq {
    pub to: String,
    pub nft_index: NftIndex,
}

impl TransferNftTxReq {
    pub fn validate(&self) -> Result<()> {
        ensure_account_destination("nft transfer", &self.to)?;
        self.nft_index.ensure_valid()
    }
}

/// Withdraw an NFT to a layer-1 address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawNftTxReq {
    pub nft_index: NftIndex,
    pub to_address: String,
}

impl WithdrawNftTxReq {
    pub fn validate(&self) -> Result<()> {
        self.nft_index.ensure_valid()?;
        parse_l1_address(&self.to_address).map(|_| ())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCollectionTxReq {
    pub name: String,
    pub introduction: String,
}

impl CreateCollectionTxReq {
    pub fn validate(&self) -> Result<()> {
        ensure_not_blank("collection name", &self.name)
    }
}

/// Replace an NFT's mutable attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateNftReq {
    pub nft_index: NftIndex,
    pub mutable_attributes: String,
}

impl UpdateNftReq {
    pub fn validate(&self) -> Result<()> {
        self.nft_index.ensure_valid()?;
        ensure_not_blank("mutable attributes", &self.mutable_attributes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelOfferTxReq {
    pub offer_id: i64,
}

impl CancelOfferTxReq {
    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("offer id", self.offer_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddLiquidityTxReq {
    pub pair_index: PairIndex,
    pub asset_a_id: AssetId,
    pub asset_a_amount: BigInt,
    pub asset_b_id: AssetId,
    pub asset_b_amount: BigInt,
    /// Unset: derived from the pool state before building.
    pub lp_amount: Option<BigInt>,
}

impl AddLiquidityTxReq {
    pub fn validate(&self) -> Result<()> {
        self.pair_index.ensure_valid()?;
        self.asset_a_id.ensure_valid()?;
        self.asset_b_id.ensure_valid()?;
        ensure_distinct_assets(self.asset_a_id, self.asset_b_id)?;
        ensure_amount("asset A amount", &self.asset_a_amount)?;
        ensure_amount("asset B amount", &self.asset_b_amount)?;
        if let Some(lp) = &self.lp_amount {
            ensure_amount("lp amount", lp)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveLiquidityTxReq {
    pub pair_index: PairIndex,
    pub asset_a_id: AssetId,
    pub asset_a_min_amount: BigInt,
    pub asset_b_id: AssetId,
    pub asset_b_min_amount: BigInt,
    pub lp_amount: BigInt,
}

impl RemoveLiquidityTxReq {
    pub fn validate(&self) -> Result<()> {
        self.pair_index.ensure_valid()?;
        self.asset_a_id.ensure_valid()?;
        self.asset_b_id.ensure_valid()?;
        ensure_distinct_assets(self.asset_a_id, self.asset_b_id)?;
        ensure_amount("asset A min amount", &self.asset_a_min_amount)?;
        ensure_amount("asset B min amount", &self.asset_b_min_amount)?;
        ensure_amount("lp amount", &self.lp_amount)
    }
}

/// Swap asset A for at least `asset_b_min_amount` of asset B.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapTxReq {
    pub pair_index: PairIndex,
    pub asset_a_id: AssetId,
    pub asset_a_amount: BigInt,
    pub asset_b_id: AssetId,
    pub asset_b_min_amount: BigInt,
}

impl SwapTxReq {
    pub fn validate(&self) -> Result<()> {
        self.pair_index.ensure_valid()?;
        self.asset_a_id.ensure_valid()?;
        self.asset_b_id.ensure_valid()?;
        ensure_distinct_assets(self.asset_a_id, self.asset_b_id)?;
        ensure_amount("asset A amount", &self.asset_a_amount)?;
        ensure_amount("asset B min amount", &self.asset_b_min_amount)
    }
}

/// Bind a new layer-2 public key to the account owning `l1_address`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangePubKeyReq {
    pub l1_address: String,
    pub pub_key_x: [u8; 32],
    pub pub_key_y: [u8; 32],
}

impl ChangePubKeyReq {
    pub fn validate(&self) -> Result<()> {
        parse_l1_address(&self.l1_address)?;
        if self.pub_key_x == [0u8; 32] && self.pub_key_y == [0u8; 32] {
            return Err(CoreError::InvalidRequest(
                "public key must not be the zero point".to_string(),
            ));
        }
        Ok(())
    }
}

/// Settle a signed buy offer against a signed sell offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomicMatchTxReq {
    pub buy_offer: Offer,
    pub sell_offer: Offer,
    pub treasury_amount: BigInt,
}

impl AtomicMatchTxReq {
    /// Structural preconditions, in order: field validity, offer directions,
    /// matching NFT and asset, expiry at `now_ms`, signature presence.
    ///
    /// Signatures are checked for presence and size only; verifying them
    /// against account keys is the network's job.
    pub fn validate(&self, now_ms: i64) -> Result<()> {
        self.buy_offer.validate()?;
        self.sell_offer.validate()?;
        ensure_amount("treasury amount", &self.treasury_amount)?;

        if self.buy_offer.offer_type != OfferType::Buy {
            return Err(CoreError::InvalidRequest(format!(
                "buy side carries a {} offer",
                self.buy_offer.offer_type
            )));
        }
        if self.sell_offer.offer_type != OfferType::Sell {
            return Err(CoreError::InvalidRequest(format!(
                "sell side carries a {} offer",
                self.sell_offer.offer_type
            )));
        }

        if self.buy_offer.nft_index != self.sell_offer.nft_index {
            return Err(CoreError::MismatchedOffer {
                field: "nft index",
                buy: self.buy_offer.nft_index.index(),
                sell: self.sell_offer.nft_index.index(),
            });
        }
        if self.buy_offer.asset_id != self.sell_offer.asset_id {
            return Err(CoreError::MismatchedOffer {
                field: "asset id",
                buy: self.buy_offer.asset_id.index(),
                sell: self.sell_offer.asset_id.index(),
            });
        }

        self.buy_offer.ensure_unexpired(now_ms)?;
        self.sell_offer.ensure_unexpired(now_ms)?;

        self.buy_offer.ensure_signed()?;
        self.sell_offer.ensure_signed()
    }
}

/// Closed set of client-originated requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxRequest {
    Transfer(TransferTxReq),
    Withdraw(WithdrawTxReq),
    MintNft(MintNftTxReq),
    TransferNft(TransferNftTxReq),
    WithdrawNft(WithdrawNftTxReq),
    CreateCollection(CreateCollectionTxReq),
    UpdateNft(UpdateNftReq),
    CancelOffer(CancelOfferTxReq),
    AddLiquidity(AddLiquidityTxReq),
    RemoveLiquidity(RemoveLiquidityTxReq),
    Swap(SwapTxReq),
    ChangePubKey(ChangePubKeyReq),
    AtomicMatch(AtomicMatchTxReq),
}

impl TxRequest {
    pub fn tx_type(&self) -> TxType {
        match self {
            Self::Transfer(_) => TxType::Transfer,
            Self::Withdraw(_) => TxType::Withdraw,
            Self::MintNft(_) => TxType::MintNft,
            Self::TransferNft(_) => TxType::TransferNft,
            Self::WithdrawNft(_) => TxType::WithdrawNft,
            Self::CreateCollection(_) => TxType::CreateCollection,
            Self::UpdateNft(_) => TxType::UpdateNft,
            Self::CancelOffer(_) => TxType::CancelOffer,
            Self::AddLiquidity(_) => TxType::AddLiquidity,
            Self::RemoveLiquidity(_) => TxType::RemoveLiquidity,
            Self::Swap(_) => TxType::Swap,
            Self::ChangePubKey(_) => TxType::ChangePubKey,
            Self::AtomicMatch(_) => TxType::AtomicMatch,
        }
    }

    /// Field-level validation. `now_ms` is only consulted for offer expiry.
    pub fn validate(&self, now_ms: i64) -> Result<()> {
        match self {
            Self::Transfer(r) => r.validate(),
            Self::Withdraw(r) => r.validate(),
            Self::MintNft(r) => r.validate(),
            Self::TransferNft(r) => r.validate(),
            Self::WithdrawNft(r) => r.validate(),
            Self::CreateCollection(r) => r.validate(),
            Self::UpdateNft(r) => r.validate(),
            Self::CancelOffer(r) => r.validate(),
            Self::AddLiquidity(r) => r.validate(),
            Self::RemoveLiquidity(r) => r.validate(),
            Self::Swap(r) => r.validate(),
            Self::ChangePubKey(r) => r.validate(),
            Self::AtomicMatch(r) => r.validate(now_ms),
        }
    }

    /// Human-supplied destination that must be resolved before building.
    pub fn destination(&self) -> Option<&str> {
        match self {
            Self::Transfer(r) => Some(&r.to),
            Self::MintNft(r) => Some(&r.to),
            Self::TransferNft(r) => Some(&r.to),
            Self::Withdraw(r) => Some(&r.to_address),
            Self::WithdrawNft(r) => Some(&r.to_address),
            _ => None,
        }
    }
}
