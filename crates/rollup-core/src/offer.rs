//! NFT offers.
//!
//! An offer is a signed intent to buy or sell one NFT for a fixed amount of
//! one asset. It is signed by its owner independently of any transaction and
//! later embedded, verbatim, in an atomic match.

use crate::amount::{ensure_amount, serde_str};
use crate::error::{CoreError, Result};
use crate::hex_serde;
use crate::types::{ensure_non_negative, AccountIndex, AssetId, NftIndex};
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of a recoverable secp256k1 signature (r ‖ s ‖ v).
pub const SIGNATURE_LEN: usize = 65;

/// Upper bound for rates expressed in basis points.
pub const MAX_RATE_BPS: i64 = 10_000;

/// Offer direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum OfferType {
    Buy,
    Sell,
}

impl OfferType {
    pub fn code(&self) -> i64 {
        match self {
            Self::Buy => 0,
            Self::Sell => 1,
        }
    }
}

impl From<OfferType> for i64 {
    fn from(t: OfferType) -> Self {
        t.code()
    }
}

impl TryFrom<i64> for OfferType {
    type Error = CoreError;

    fn try_from(code: i64) -> std::result::Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Buy),
            1 => Ok(Self::Sell),
            other => Err(CoreError::InvalidRequest(format!(
                "offer type must be 0 (buy) or 1 (sell), got {other}"
            ))),
        }
    }
}

impl fmt::Display for OfferType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

/// Offer fields plus the owner's signature once signed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Offer {
    #[serde(rename = "Type")]
    pub offer_type: OfferType,
    /// Unique per account, strictly increasing.
    pub offer_id: i64,
    pub account_index: AccountIndex,
    pub nft_index: NftIndex,
    pub asset_id: AssetId,
    #[serde(with = "serde_str")]
    pub asset_amount: BigInt,
    /// Milliseconds since epoch.
    pub listed_at: i64,
    /// Milliseconds since epoch; must be after `listed_at`.
    pub expired_at: i64,
    /// Treasury fee in basis points.
    pub treasury_rate: i64,
    #[serde(default, with = "hex_serde::bytes_opt")]
    pub sig: Option<Vec<u8>>,
}

impl Offer {
    /// Field-level validation; does not look at the signature.
    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("offer id", self.offer_id)?;
        self.account_index.ensure_valid()?;
        self.nft_index.ensure_valid()?;
        self.asset_id.ensure_valid()?;
        ensure_amount("offer asset amount", &self.asset_amount)?;
        ensure_non_negative("listed at", self.listed_at)?;
        if self.expired_at <= self.listed_at {
            return Err(CoreError::InvalidRequest(format!(
                "offer {} expired_at ({}) must be after listed_at ({})",
                self.offer_id, self.expired_at, self.listed_at
            )));
        }
        if !(0..=MAX_RATE_BPS).contains(&self.treasury_rate) {
            return Err(CoreError::InvalidRequest(format!(
                "treasury rate must be within 0..={MAX_RATE_BPS} bps, got {}",
                self.treasury_rate
            )));
        }
        Ok(())
    }

    /// An offer is expired once `now_ms` reaches `expired_at`.
    pub fn is_expired(&self, now_ms: i64) -> bool {
        self.expired_at <= now_ms
    }

    pub fn ensure_unexpired(&self, now_ms: i64) -> Result<()> {
        if self.is_expired(now_ms) {
            return Err(CoreError::ExpiredOffer {
                offer_id: self.offer_id,
                expired_at: self.expired_at,
                now_ms,
            });
        }
        Ok(())
    }

    /// Structural check that a signature is attached and well-sized.
    pub fn ensure_signed(&self) -> Result<()> {
        match &self.sig {
            Some(sig) if sig.len() == SIGNATURE_LEN => Ok(()),
            Some(sig) => Err(CoreError::InvalidRequest(format!(
                "{} offer {} signature must be {SIGNATURE_LEN} bytes, got {}",
                self.offer_type,
                self.offer_id,
                sig.len()
            ))),
            None => Err(CoreError::InvalidRequest(format!(
                "{} offer {} is not signed",
                self.offer_type, self.offer_id
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: i64 = 1_700_000_000_000;

    fn offer() -> Offer {
        Offer {
            offer_type: OfferType::Buy,
            offer_id: 5,
            account_index: AccountIndex::new(3),
            nft_index: NftIndex::new(3),
            asset_id: AssetId::new(0),
            asset_amount: BigInt::from(10_000),
            listed_at: T,
            expired_at: T + 7_200_000,
            treasury_rate: 200,
            sig: None,
        }
    }

    #[test]
    fn test_valid_offer() {
        assert!(offer().validate().is_ok());
    }

    #[test]
    fn test_expiry_must_follow_listing() {
        let mut o = offer();
        o.expired_at = o.listed_at;
        assert!(matches!(o.validate(), Err(CoreError::InvalidRequest(_))));
        o.expired_at = o.listed_at - 1;
        assert!(matches!(o.validate(), Err(CoreError::InvalidRequest(_))));
    }

    #[test]
    fn test_treasury_rate_bounds() {
        let mut o = offer();
        o.treasury_rate = MAX_RATE_BPS + 1;
        assert!(o.validate().is_err());
        o.treasury_rate = -1;
        assert!(o.validate().is_err());
    }

    #[test]
    fn test_expiry_boundary() {
        let o = offer();
        assert!(!o.is_expired(o.expired_at - 1));
        assert!(o.is_expired(o.expired_at));
        assert!(matches!(
            o.ensure_unexpired(o.expired_at + 1),
            Err(CoreError::ExpiredOffer { offer_id: 5, .. })
        ));
    }

    #[test]
    fn test_signature_presence() {
        let mut o = offer();
        assert!(o.ensure_signed().is_err());
        o.sig = Some(vec![0u8; 64]);
        assert!(o.ensure_signed().is_err());
        o.sig = Some(vec![0u8; SIGNATURE_LEN]);
        assert!(o.ensure_signed().is_ok());
    }

    #[test]
    fn test_offer_type_wire_codes() {
        let json = serde_json::to_string(&offer()).unwrap();
        assert!(json.starts_with(r#"{"Type":0,"OfferId":5"#));
        assert!(json.contains(r#""AssetAmount":"10000""#));
        assert!(OfferType::try_from(2).is_err());
    }
}
