//! HTTP client for the rollup REST endpoint.
//!
//! All reads are `GET /api/v1/...` with query parameters; submission is a
//! single `POST /api/v1/sendTx`. Non-2xx bodies carry `{code, message}`;
//! 404 becomes `NotFound`, anything else `Api` with the message verbatim.

use std::time::Duration;

use num_bigint::BigInt;
use reqwest::{Client, Response, StatusCode};
use rollup_core::{
    Account, AccountIndex, Asset, AssetId, GasAccount, NftList, PairIndex, TradingPair, TxType,
};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::error::{RemoteError, RemoteResult};
use crate::query::{BoxFuture, RemoteQuery};
use crate::types::{
    AssetsResponse, ErrorResponse, GasFeeResponse, MaxOfferIdResponse, NonceResponse,
    PairsResponse, SendTxRequest, SendTxResponse,
};

/// Default timeout for API requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// REST implementation of [`RemoteQuery`].
pub struct HttpRemote {
    /// HTTP client.
    client: Client,
    /// Endpoint root, without trailing slash (e.g. "http://127.0.0.1:8888").
    base_url: String,
}

impl HttpRemote {
    pub fn new(base_url: impl Into<String>) -> RemoteResult<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> RemoteResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::HttpClient(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1/{path}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> RemoteResult<T> {
        let url = self.url(path);
        debug!(url = %url, ?query, "GET");

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| RemoteError::HttpClient(format!("HTTP request failed: {e}")))?;

        Self::decode(path, response).await
    }

    async fn decode<T: DeserializeOwned>(path: &str, response: Response) -> RemoteResult<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RemoteError::HttpClient(format!("Failed to read response: {e}")))?;

        if status.is_success() {
            return Ok(serde_json::from_str(&body)?);
        }

        let error: Option<ErrorResponse> = serde_json::from_str(&body).ok();
        if status == StatusCode::NOT_FOUND {
            let what = error
                .map(|e| e.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| path.to_string());
            return Err(RemoteError::NotFound(what));
        }

        match error {
            Some(ErrorResponse { code, message }) => {
                warn!(path, %status, code, message = %message, "Endpoint rejected request");
                Err(RemoteError::Api { code, message })
            }
            None => Err(RemoteError::HttpClient(format!("HTTP {status}: {body}"))),
        }
    }

    async fn account_by(&self, by: &str, value: String) -> RemoteResult<Account> {
        self.get_json("account", &[("by", by.to_string()), ("value", value)])
            .await
    }
}

impl RemoteQuery for HttpRemote {
    fn get_account_by_index(&self, index: AccountIndex) -> BoxFuture<'_, RemoteResult<Account>> {
        Box::pin(self.account_by("index", index.to_string()))
    }

    fn get_account_by_name(&self, name: String) -> BoxFuture<'_, RemoteResult<Account>> {
        Box::pin(async move { self.account_by("name", name).await })
    }

    fn get_account_by_pubkey(&self, pubkey: String) -> BoxFuture<'_, RemoteResult<Account>> {
        Box::pin(async move { self.account_by("pk", pubkey).await })
    }

    fn get_next_nonce(&self, index: AccountIndex) -> BoxFuture<'_, RemoteResult<i64>> {
        Box::pin(async move {
            let resp: NonceResponse = self
                .get_json("nextNonce", &[("account_index", index.to_string())])
                .await?;
            Ok(resp.nonce)
        })
    }

    fn get_max_offer_id(&self, index: AccountIndex) -> BoxFuture<'_, RemoteResult<i64>> {
        Box::pin(async move {
            let resp: MaxOfferIdResponse = self
                .get_json("maxOfferId", &[("account_index", index.to_string())])
                .await?;
            Ok(resp.offer_id)
        })
    }

    fn get_asset_list(&self) -> BoxFuture<'_, RemoteResult<Vec<Asset>>> {
        Box::pin(async move {
            let resp: AssetsResponse = self.get_json("assets", &[]).await?;
            debug!(total = resp.total, "Fetched asset list");
            Ok(resp.assets)
        })
    }

    fn get_pair_list(&self) -> BoxFuture<'_, RemoteResult<Vec<TradingPair>>> {
        Box::pin(async move {
            let resp: PairsResponse = self.get_json("pairs", &[]).await?;
            Ok(resp.pairs)
        })
    }

    fn get_pair_info(&self, index: PairIndex) -> BoxFuture<'_, RemoteResult<TradingPair>> {
        Box::pin(async move { self.get_json("pair", &[("index", index.to_string())]).await })
    }

    fn get_nft_list(
        &self,
        index: AccountIndex,
        offset: i64,
        limit: i64,
    ) -> BoxFuture<'_, RemoteResult<NftList>> {
        Box::pin(async move {
            self.get_json(
                "accountNfts",
                &[
                    ("by", "account_index".to_string()),
                    ("value", index.to_string()),
                    ("offset", offset.to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await
        })
    }

    fn get_gas_account(&self) -> BoxFuture<'_, RemoteResult<GasAccount>> {
        Box::pin(async move { self.get_json("gasAccount", &[]).await })
    }

    fn get_gas_fee(&self, asset_id: AssetId) -> BoxFuture<'_, RemoteResult<BigInt>> {
        Box::pin(async move {
            let resp: GasFeeResponse = self
                .get_json("gasFee", &[("asset_id", asset_id.to_string())])
                .await?;
            Ok(resp.gas_fee)
        })
    }

    fn submit_raw_transaction(
        &self,
        tx_type: TxType,
        tx_info: String,
    ) -> BoxFuture<'_, RemoteResult<String>> {
        Box::pin(async move {
            let url = self.url("sendTx");
            info!(url = %url, %tx_type, "Submitting transaction");

            let request = SendTxRequest {
                tx_type: tx_type.code(),
                tx_info,
            };
            let response = self
                .client
                .post(&url)
                .json(&request)
                .send()
                .await
                .map_err(|e| RemoteError::HttpClient(format!("HTTP request failed: {e}")))?;

            let resp: SendTxResponse = Self::decode("sendTx", response).await?;
            info!(tx_id = %resp.tx_id, %tx_type, "Transaction accepted");
            Ok(resp.tx_id)
        })
    }
}
