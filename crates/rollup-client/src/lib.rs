//! Client facade for the rollup transaction SDK.
//!
//! - `OptionResolver`: fills unset transaction options from remote state
//! - `L2Client`: read queries and the validate → resolve → sign → submit pipeline
//! - `ClientConfig`: explicit, injected configuration
//! - `ClientError`: the caller-facing error taxonomy

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod resolver;

pub use client::{L2Client, SignOfferReq};
pub use config::{ClientConfig, KeyConfig};
pub use error::{ClientError, ClientResult};
pub use logging::init_logging;
pub use resolver::{AccountRef, OptionResolver};

// Re-export the request and option types callers build.
pub use rollup_core::{
    AccountIndex, AddLiquidityTxReq, AssetId, AtomicMatchTxReq, CancelOfferTxReq, ChangePubKeyReq,
    CreateCollectionTxReq, MintNftTxReq, NftIndex, Offer, OfferType, PairIndex,
    RemoveLiquidityTxReq, SwapTxReq, TransactOpts, TransferNftTxReq, TransferTxReq, TxType,
    UpdateNftReq, WithdrawNftTxReq, WithdrawTxReq,
};
