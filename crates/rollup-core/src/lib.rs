//! Core domain types for the rollup transaction SDK.
//!
//! This crate holds everything that can be decided without a key or a
//! network connection:
//! - Index newtypes (`AccountIndex`, `AssetId`, `NftIndex`, `PairIndex`) and `BigInt` amounts
//! - `TransactOpts` / `ResolvedOpts`: partial and resolved transaction options
//! - Typed requests for every client-originated transaction kind
//! - `Offer`: the NFT buy/sell intent embedded in atomic matches
//! - Remote state snapshots (accounts, assets, pairs, NFTs)

pub mod account;
pub mod amount;
pub mod clock;
pub mod error;
pub mod hex_serde;
pub mod liquidity;
pub mod offer;
pub mod opts;
pub mod request;
pub mod tx_type;
pub mod types;

pub use account::{account_name_hash, Account, AccountAsset, Asset, GasAccount, Nft, NftList, TradingPair};
pub use amount::{ensure_amount, to_be_bytes32, AMOUNT_BYTES};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{CoreError, Result};
pub use liquidity::{compute_empty_lp_amount, compute_lp_amount, lp_amount_for};
pub use offer::{Offer, OfferType, MAX_RATE_BPS, SIGNATURE_LEN};
pub use opts::{parse_l1_address, Destination, DestinationRef, ResolvedOpts, TransactOpts};
pub use tx_type::TxType;
pub use types::{AccountIndex, AssetId, NftIndex, PairIndex};

// Requests
pub use request::{
    AddLiquidityTxReq, AtomicMatchTxReq, CancelOfferTxReq, ChangePubKeyReq, CreateCollectionTxReq,
    MintNftTxReq, RemoveLiquidityTxReq, SwapTxReq, TransferNftTxReq, TransferTxReq, TxRequest,
    UpdateNftReq, WithdrawNftTxReq, WithdrawTxReq,
};
