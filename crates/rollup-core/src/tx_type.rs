//! Transaction kinds and their numeric codes.
//!
//! The codes are a compatibility contract with the remote verifier: the code
//! is the first byte of every canonical encoding and the `tx_type` field of
//! every submission.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Transaction kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum TxType {
    Empty = 0,
    RegisterZns = 1,
    CreatePair = 2,
    UpdatePairRate = 3,
    Deposit = 4,
    DepositNft = 5,
    Transfer = 6,
    Swap = 7,
    AddLiquidity = 8,
    RemoveLiquidity = 9,
    Withdraw = 10,
    CreateCollection = 11,
    MintNft = 12,
    TransferNft = 13,
    AtomicMatch = 14,
    CancelOffer = 15,
    WithdrawNft = 16,
    FullExit = 17,
    FullExitNft = 18,
    ChangePubKey = 19,
    UpdateNft = 20,
}

impl TxType {
    const ALL: [TxType; 21] = [
        Self::Empty,
        Self::RegisterZns,
        Self::CreatePair,
        Self::UpdatePairRate,
        Self::Deposit,
        Self::DepositNft,
        Self::Transfer,
        Self::Swap,
        Self::AddLiquidity,
        Self::RemoveLiquidity,
        Self::Withdraw,
        Self::CreateCollection,
        Self::MintNft,
        Self::TransferNft,
        Self::AtomicMatch,
        Self::CancelOffer,
        Self::WithdrawNft,
        Self::FullExit,
        Self::FullExitNft,
        Self::ChangePubKey,
        Self::UpdateNft,
    ];

    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Whether a layer-2 client may originate this kind.
    ///
    /// Deposits, exits and pair administration originate on L1 or from the
    /// operator and are never built here.
    pub fn is_client_originated(&self) -> bool {
        matches!(
            self,
            Self::Transfer
                | Self::Swap
                | Self::AddLiquidity
                | Self::RemoveLiquidity
                | Self::Withdraw
                | Self::CreateCollection
                | Self::MintNft
                | Self::TransferNft
                | Self::AtomicMatch
                | Self::CancelOffer
                | Self::WithdrawNft
                | Self::ChangePubKey
                | Self::UpdateNft
        )
    }
}

impl From<TxType> for u8 {
    fn from(t: TxType) -> Self {
        t.code()
    }
}

impl TryFrom<u8> for TxType {
    type Error = CoreError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(code as usize)
            .copied()
            .ok_or_else(|| CoreError::InvalidRequest(format!("unknown tx type {code}")))
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for t in TxType::ALL {
            assert_eq!(TxType::try_from(t.code()).unwrap(), t);
        }
        assert!(TxType::try_from(21).is_err());
    }

    #[test]
    fn test_known_codes() {
        assert_eq!(TxType::Transfer.code(), 6);
        assert_eq!(TxType::AtomicMatch.code(), 14);
        assert_eq!(TxType::CancelOffer.code(), 15);
        assert_eq!(serde_json::to_string(&TxType::Withdraw).unwrap(), "10");
    }

    #[test]
    fn test_client_originated() {
        assert!(TxType::Transfer.is_client_originated());
        assert!(!TxType::Deposit.is_client_originated());
        assert!(!TxType::FullExitNft.is_client_originated());
    }
}
