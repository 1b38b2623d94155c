//! Client facade.
//!
//! Every transaction operation runs the same pipeline: validate the request,
//! resolve options, build and sign, submit once. The first failing stage
//! ends the call; nothing is submitted after an error.

use std::sync::Arc;

use num_bigint::BigInt;
use rollup_core::{
    ensure_amount, Account, AccountIndex, AddLiquidityTxReq, Asset, AssetId, AtomicMatchTxReq,
    CancelOfferTxReq, ChangePubKeyReq, Clock, CreateCollectionTxReq, GasAccount, MintNftTxReq,
    NftIndex, NftList, Offer, OfferType, PairIndex, RemoveLiquidityTxReq, SwapTxReq, SystemClock,
    TradingPair, TransactOpts, TransferNftTxReq, TransferTxReq, TxRequest, TxType, UpdateNftReq,
    WithdrawNftTxReq, WithdrawTxReq,
};
use rollup_remote::{DynRemote, HttpRemote};
use rollup_txutils::{
    build_offer, build_tx, parse_signed_offer, KeyManager, KeySigner, SignerError,
};
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::resolver::{AccountRef, OptionResolver};

/// Fields of an offer the caller chooses. Ids and timestamps left unset are
/// filled by [`L2Client::sign_offer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignOfferReq {
    pub offer_type: OfferType,
    pub nft_index: NftIndex,
    pub asset_id: AssetId,
    pub asset_amount: BigInt,
    /// Basis points.
    pub treasury_rate: i64,
    /// Unset: the account's max offer id + 1.
    pub offer_id: Option<i64>,
    /// Unset: now + the configured default window.
    pub expired_at: Option<i64>,
}

/// Layer-2 client: read queries plus signed transaction submission.
pub struct L2Client {
    remote: DynRemote,
    key: Option<Arc<dyn KeySigner>>,
    resolver: OptionResolver,
}

impl L2Client {
    /// Client over HTTP, with the key named in `config` (if any).
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        config.validate()?;
        let remote = HttpRemote::with_timeout(&config.endpoint, config.request_timeout())
            .map_err(|e| ClientError::Config(e.to_string()))?;
        let key = match &config.key {
            Some(key) => Some(Arc::new(KeyManager::load(key.to_source())?) as Arc<dyn KeySigner>),
            None => None,
        };
        info!(endpoint = %config.endpoint, signing = key.is_some(), "L2 client ready");
        Ok(Self::with_parts(
            &config,
            Arc::new(remote),
            key,
            Arc::new(SystemClock),
        ))
    }

    /// Client over explicit collaborators.
    pub fn with_parts(
        config: &ClientConfig,
        remote: DynRemote,
        key: Option<Arc<dyn KeySigner>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let resolver = OptionResolver::new(
            remote.clone(),
            clock,
            config.default_expiry_ms,
            config.gas_asset_id(),
        );
        Self {
            remote,
            key,
            resolver,
        }
    }

    pub fn resolver(&self) -> &OptionResolver {
        &self.resolver
    }

    /// Public key of the signing key, `0x`-less hex.
    pub fn public_key_hex(&self) -> ClientResult<String> {
        Ok(hex::encode(self.signer()?.public_key_bytes()))
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub async fn get_account_by_index(&self, index: AccountIndex) -> ClientResult<Account> {
        self.remote
            .get_account_by_index(index)
            .await
            .map_err(|e| ClientError::resolution("account by index", e))
    }

    pub async fn get_account_by_name(&self, name: &str) -> ClientResult<Account> {
        self.remote
            .get_account_by_name(name.to_string())
            .await
            .map_err(|e| ClientError::resolution("account by name", e))
    }

    pub async fn get_account_by_pubkey(&self, pubkey: &str) -> ClientResult<Account> {
        let pubkey = pubkey.trim().trim_start_matches("0x").to_ascii_lowercase();
        self.remote
            .get_account_by_pubkey(pubkey)
            .await
            .map_err(|e| ClientError::resolution("account by public key", e))
    }

    /// Account owning the signing key.
    pub async fn get_my_account(&self) -> ClientResult<Account> {
        let pubkey = self.public_key_hex()?;
        self.get_account_by_pubkey(&pubkey).await
    }

    /// Balance of `asset_id` held by the named account; zero if none.
    pub async fn get_balance_by_asset_id_and_account_name(
        &self,
        asset_id: AssetId,
        account_name: &str,
    ) -> ClientResult<BigInt> {
        asset_id.ensure_valid()?;
        let account = self.get_account_by_name(account_name).await?;
        Ok(account.balance_of(asset_id))
    }

    pub async fn get_gas_account(&self) -> ClientResult<GasAccount> {
        self.remote
            .get_gas_account()
            .await
            .map_err(|e| ClientError::resolution("gas account", e))
    }

    pub async fn get_gas_fee(&self, asset_id: AssetId) -> ClientResult<BigInt> {
        self.remote
            .get_gas_fee(asset_id)
            .await
            .map_err(|e| ClientError::resolution("gas fee", e))
    }

    pub async fn get_asset_list(&self) -> ClientResult<Vec<Asset>> {
        self.remote
            .get_asset_list()
            .await
            .map_err(|e| ClientError::resolution("asset list", e))
    }

    pub async fn get_available_pairs(&self) -> ClientResult<Vec<TradingPair>> {
        self.remote
            .get_pair_list()
            .await
            .map_err(|e| ClientError::resolution("pair list", e))
    }

    pub async fn get_pair_info(&self, index: PairIndex) -> ClientResult<TradingPair> {
        index.ensure_valid()?;
        self.remote
            .get_pair_info(index)
            .await
            .map_err(|e| ClientError::resolution("pair info", e))
    }

    pub async fn get_account_nft_list(
        &self,
        index: AccountIndex,
        offset: i64,
        limit: i64,
    ) -> ClientResult<NftList> {
        index.ensure_valid()?;
        if offset < 0 || limit <= 0 {
            return Err(ClientError::Validation(format!(
                "invalid page: offset={offset} limit={limit}"
            )));
        }
        self.remote
            .get_nft_list(index, offset, limit)
            .await
            .map_err(|e| ClientError::resolution("nft list", e))
    }

    pub async fn get_next_nonce(&self, index: AccountIndex) -> ClientResult<i64> {
        self.remote
            .get_next_nonce(index)
            .await
            .map_err(|e| ClientError::resolution("nonce", e))
    }

    /// Highest offer id used by the account; -1 if none.
    pub async fn get_max_offer_id(&self, index: AccountIndex) -> ClientResult<i64> {
        self.remote
            .get_max_offer_id(index)
            .await
            .map_err(|e| ClientError::resolution("max offer id", e))
    }

    // =========================================================================
    // Transactions
    // =========================================================================

    pub async fn transfer(&self, req: TransferTxReq, opts: TransactOpts) -> ClientResult<String> {
        self.execute(TxRequest::Transfer(req), opts).await
    }

    pub async fn withdraw(&self, req: WithdrawTxReq, opts: TransactOpts) -> ClientResult<String> {
        self.execute(TxRequest::Withdraw(req), opts).await
    }

    pub async fn mint_nft(&self, req: MintNftTxReq, opts: TransactOpts) -> ClientResult<String> {
        self.execute(TxRequest::MintNft(req), opts).await
    }

    pub async fn transfer_nft(
        &self,
        req: TransferNftTxReq,
        opts: TransactOpts,
    ) -> ClientResult<String> {
        self.execute(TxRequest::TransferNft(req), opts).await
    }

    pub async fn withdraw_nft(
        &self,
        req: WithdrawNftTxReq,
        opts: TransactOpts,
    ) -> ClientResult<String> {
        self.execute(TxRequest::WithdrawNft(req), opts).await
    }

    pub async fn create_collection(
        &self,
        req: CreateCollectionTxReq,
        opts: TransactOpts,
    ) -> ClientResult<String> {
        self.execute(TxRequest::CreateCollection(req), opts).await
    }

    pub async fn update_nft(&self, req: UpdateNftReq, opts: TransactOpts) -> ClientResult<String> {
        self.execute(TxRequest::UpdateNft(req), opts).await
    }

    pub async fn cancel_offer(
        &self,
        req: CancelOfferTxReq,
        opts: TransactOpts,
    ) -> ClientResult<String> {
        self.execute(TxRequest::CancelOffer(req), opts).await
    }

    /// Add liquidity. An unset LP amount is derived from the pair's current
    /// reserves before anything is signed.
    pub async fn add_liquidity(
        &self,
        mut req: AddLiquidityTxReq,
        opts: TransactOpts,
    ) -> ClientResult<String> {
        req.validate()?;
        if req.lp_amount.is_none() {
            let pair = self.get_pair_info(req.pair_index).await?;
            let lp = rollup_core::lp_amount_for(&pair, &req.asset_a_amount, &req.asset_b_amount)?;
            debug!(pair = %req.pair_index, lp_amount = %lp, "Derived LP amount");
            req.lp_amount = Some(lp);
        }
        self.execute(TxRequest::AddLiquidity(req), opts).await
    }

    pub async fn remove_liquidity(
        &self,
        req: RemoveLiquidityTxReq,
        opts: TransactOpts,
    ) -> ClientResult<String> {
        self.execute(TxRequest::RemoveLiquidity(req), opts).await
    }

    pub async fn swap(&self, req: SwapTxReq, opts: TransactOpts) -> ClientResult<String> {
        self.execute(TxRequest::Swap(req), opts).await
    }

    pub async fn change_pub_key(
        &self,
        req: ChangePubKeyReq,
        opts: TransactOpts,
    ) -> ClientResult<String> {
        self.execute(TxRequest::ChangePubKey(req), opts).await
    }

    /// Settle two signed offers; the transaction is signed with this
    /// client's key as matcher.
    pub async fn atomic_match(
        &self,
        req: AtomicMatchTxReq,
        opts: TransactOpts,
    ) -> ClientResult<String> {
        self.execute(TxRequest::AtomicMatch(req), opts).await
    }

    /// [`Self::atomic_match`] over offers in their signed string form.
    pub async fn atomic_match_from_signed(
        &self,
        buy_offer: &str,
        sell_offer: &str,
        treasury_amount: BigInt,
        opts: TransactOpts,
    ) -> ClientResult<String> {
        let req = AtomicMatchTxReq {
            buy_offer: parse_signed_offer(buy_offer)?,
            sell_offer: parse_signed_offer(sell_offer)?,
            treasury_amount,
        };
        self.atomic_match(req, opts).await
    }

    /// Sign an offer from the key's own account and return its signed
    /// string form. Nothing is submitted.
    pub async fn sign_offer(&self, req: SignOfferReq) -> ClientResult<String> {
        let now_ms = self.resolver.now_ms();
        let mut offer = Offer {
            offer_type: req.offer_type,
            offer_id: req.offer_id.unwrap_or(0),
            account_index: AccountIndex::new(0),
            nft_index: req.nft_index,
            asset_id: req.asset_id,
            asset_amount: req.asset_amount,
            listed_at: now_ms,
            expired_at: req
                .expired_at
                .unwrap_or_else(|| self.resolver.default_expired_at()),
            treasury_rate: req.treasury_rate,
            sig: None,
        };
        offer.validate()?;

        let key = self.signer()?;
        let account = self.get_my_account().await?;
        offer.account_index = account.index;
        if req.offer_id.is_none() {
            offer.offer_id = self.get_max_offer_id(account.index).await? + 1;
        }

        let signed = build_offer(&**key, &offer)?;
        info!(
            offer_id = offer.offer_id,
            offer_type = %offer.offer_type,
            account = %offer.account_index,
            "Offer signed"
        );
        Ok(signed)
    }

    /// Submit an externally built, already signed payload.
    pub async fn send_raw_tx(&self, tx_type: TxType, tx_info: String) -> ClientResult<String> {
        if !tx_type.is_client_originated() {
            return Err(ClientError::Validation(format!(
                "{tx_type} cannot be submitted by a client"
            )));
        }
        if tx_info.trim().is_empty() {
            return Err(ClientError::Validation("tx_info must not be empty".to_string()));
        }
        self.submit(tx_type, tx_info).await
    }

    // =========================================================================
    // Pipeline
    // =========================================================================

    async fn execute(&self, req: TxRequest, opts: TransactOpts) -> ClientResult<String> {
        req.validate(self.resolver.now_ms())?;
        if let Some(amount) = &opts.gas_fee_asset_amount {
            ensure_amount("gas fee asset amount", amount)?;
        }

        let key = self.signer()?;
        let from = AccountRef::PubKey(hex::encode(key.public_key_bytes()));
        let resolved = self
            .resolver
            .resolve(opts, &from, req.destination())
            .await?;

        // Offer expiry is judged at build time, after the resolver's round trips.
        let signed = build_tx(&**key, &req, &resolved, self.resolver.now_ms())?;
        debug!(tx_type = %signed.tx_type, tx_hash = %signed.tx_hash, "Submitting signed transaction");
        self.submit(signed.tx_type, signed.tx_info).await
    }

    async fn submit(&self, tx_type: TxType, tx_info: String) -> ClientResult<String> {
        let tx_id = self
            .remote
            .submit_raw_transaction(tx_type, tx_info)
            .await
            .map_err(ClientError::submission)?;
        info!(%tx_type, tx_id = %tx_id, "Transaction submitted");
        Ok(tx_id)
    }

    fn signer(&self) -> ClientResult<&Arc<dyn KeySigner>> {
        self.key
            .as_ref()
            .ok_or_else(|| SignerError::NoSigningKey.into())
    }
}
