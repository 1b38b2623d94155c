//! Request and response bodies of the REST endpoint.
//!
//! Domain objects (accounts, assets, pairs, NFTs) are returned as-is and
//! deserialize straight into the `rollup_core` types; only the envelopes
//! around scalar answers live here.

use num_bigint::BigInt;
use rollup_core::amount::serde_str;
use rollup_core::{Asset, TradingPair};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct NonceResponse {
    pub nonce: i64,
}

#[derive(Debug, Deserialize)]
pub struct MaxOfferIdResponse {
    pub offer_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct AssetsResponse {
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub assets: Vec<Asset>,
}

#[derive(Debug, Deserialize)]
pub struct PairsResponse {
    #[serde(default)]
    pub pairs: Vec<TradingPair>,
}

#[derive(Debug, Deserialize)]
pub struct GasFeeResponse {
    #[serde(with = "serde_str")]
    pub gas_fee: BigInt,
}

/// Body of `POST /api/v1/sendTx`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SendTxRequest {
    pub tx_type: u8,
    /// Wire JSON of the signed transaction.
    pub tx_info: String,
}

#[derive(Debug, Deserialize)]
pub struct SendTxResponse {
    pub tx_id: String,
}

/// Body of every non-2xx response.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}
