//! Remote query collaborator trait.
//!
//! Every question the client asks the network, plus the single write
//! (transaction submission), behind one dyn-compatible trait so the resolver
//! and facade can run against a live endpoint or a recording mock.

use std::pin::Pin;
use std::sync::Arc;

use num_bigint::BigInt;
use rollup_core::{
    Account, AccountIndex, Asset, AssetId, GasAccount, NftList, PairIndex, TradingPair, TxType,
};

use crate::error::RemoteResult;

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// Read-only state queries and raw transaction submission.
///
/// Implementations must not cache: every call reflects current remote state.
pub trait RemoteQuery: Send + Sync {
    fn get_account_by_index(&self, index: AccountIndex) -> BoxFuture<'_, RemoteResult<Account>>;

    fn get_account_by_name(&self, name: String) -> BoxFuture<'_, RemoteResult<Account>>;

    /// `pubkey` is lowercase hex without `0x`.
    fn get_account_by_pubkey(&self, pubkey: String) -> BoxFuture<'_, RemoteResult<Account>>;

    /// Nonce the account's next transaction must carry.
    fn get_next_nonce(&self, index: AccountIndex) -> BoxFuture<'_, RemoteResult<i64>>;

    /// Highest offer id the account has used; -1 if none.
    fn get_max_offer_id(&self, index: AccountIndex) -> BoxFuture<'_, RemoteResult<i64>>;

    fn get_asset_list(&self) -> BoxFuture<'_, RemoteResult<Vec<Asset>>>;

    fn get_pair_list(&self) -> BoxFuture<'_, RemoteResult<Vec<TradingPair>>>;

    fn get_pair_info(&self, index: PairIndex) -> BoxFuture<'_, RemoteResult<TradingPair>>;

    fn get_nft_list(
        &self,
        index: AccountIndex,
        offset: i64,
        limit: i64,
    ) -> BoxFuture<'_, RemoteResult<NftList>>;

    /// Account that collects gas fees.
    fn get_gas_account(&self) -> BoxFuture<'_, RemoteResult<GasAccount>>;

    /// Current fee quote in units of `asset_id`.
    fn get_gas_fee(&self, asset_id: AssetId) -> BoxFuture<'_, RemoteResult<BigInt>>;

    /// Submit a signed transaction; returns the endpoint-assigned id.
    fn submit_raw_transaction(
        &self,
        tx_type: TxType,
        tx_info: String,
    ) -> BoxFuture<'_, RemoteResult<String>>;
}

/// Arc wrapper for RemoteQuery trait objects.
pub type DynRemote = Arc<dyn RemoteQuery>;
