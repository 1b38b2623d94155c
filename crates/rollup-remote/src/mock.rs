//! In-memory remote for tests.
//!
//! Serves a fixed snapshot of accounts, assets, pairs and NFTs, and records
//! every call and submission so tests can assert on network traffic.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use num_bigint::BigInt;
use parking_lot::Mutex;
use rollup_core::{
    Account, AccountIndex, Asset, AssetId, GasAccount, Nft, NftList, PairIndex, TradingPair,
    TxType,
};

use crate::error::{RemoteError, RemoteResult};
use crate::query::{BoxFuture, RemoteQuery};

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
    AccountByIndex(i64),
    AccountByName(String),
    AccountByPubKey(String),
    NextNonce(i64),
    MaxOfferId(i64),
    AssetList,
    PairList,
    PairInfo(i64),
    NftList { account_index: i64, offset: i64, limit: i64 },
    GasAccount,
    GasFee(i64),
    Submit(TxType),
}

/// One recorded submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub tx_type: TxType,
    pub tx_info: String,
    pub tx_id: String,
}

/// Recording mock remote.
#[derive(Debug)]
pub struct MockRemote {
    accounts: Mutex<Vec<Account>>,
    max_offer_ids: Mutex<HashMap<i64, i64>>,
    assets: Mutex<Vec<Asset>>,
    pairs: Mutex<Vec<TradingPair>>,
    nfts: Mutex<HashMap<i64, Vec<Nft>>>,
    gas_account: Mutex<GasAccount>,
    gas_fee: Mutex<BigInt>,
    /// Next submission is rejected with (code, message).
    reject_next: Mutex<Option<(i64, String)>>,
    calls: Mutex<Vec<RemoteCall>>,
    submissions: Mutex<Vec<Submission>>,
    tx_counter: AtomicU64,
}

impl Default for MockRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRemote {
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(Vec::new()),
            max_offer_ids: Mutex::new(HashMap::new()),
            assets: Mutex::new(Vec::new()),
            pairs: Mutex::new(Vec::new()),
            nfts: Mutex::new(HashMap::new()),
            gas_account: Mutex::new(GasAccount {
                index: AccountIndex::new(1),
                name: "gas.legend".to_string(),
            }),
            gas_fee: Mutex::new(BigInt::from(0)),
            reject_next: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            submissions: Mutex::new(Vec::new()),
            tx_counter: AtomicU64::new(0),
        }
    }

    pub fn add_account(&self, account: Account) {
        let mut accounts = self.accounts.lock();
        accounts.retain(|a| a.index != account.index);
        accounts.push(account);
    }

    /// Overwrite the nonce of a registered account.
    pub fn set_nonce(&self, index: AccountIndex, nonce: i64) {
        if let Some(account) = self.accounts.lock().iter_mut().find(|a| a.index == index) {
            account.nonce = nonce;
        }
    }

    pub fn set_max_offer_id(&self, index: AccountIndex, offer_id: i64) {
        self.max_offer_ids.lock().insert(index.index(), offer_id);
    }

    pub fn add_asset(&self, asset: Asset) {
        self.assets.lock().push(asset);
    }

    pub fn add_pair(&self, pair: TradingPair) {
        let mut pairs = self.pairs.lock();
        pairs.retain(|p| p.pair_index != pair.pair_index);
        pairs.push(pair);
    }

    pub fn add_nft(&self, nft: Nft) {
        self.nfts
            .lock()
            .entry(nft.owner_account_index.index())
            .or_default()
            .push(nft);
    }

    pub fn set_gas_account(&self, gas_account: GasAccount) {
        *self.gas_account.lock() = gas_account;
    }

    pub fn set_gas_fee(&self, fee: BigInt) {
        *self.gas_fee.lock() = fee;
    }

    /// Reject the next submission with the given API error.
    pub fn reject_next_submission(&self, code: i64, message: impl Into<String>) {
        *self.reject_next.lock() = Some((code, message.into()));
    }

    /// Get recorded calls.
    pub fn calls(&self) -> Vec<RemoteCall> {
        self.calls.lock().clone()
    }

    /// Number of recorded calls matching `pred`.
    pub fn count_calls(&self, pred: impl Fn(&RemoteCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|c| pred(c)).count()
    }

    /// Get recorded submissions.
    pub fn submissions(&self) -> Vec<Submission> {
        self.submissions.lock().clone()
    }

    /// Clear recorded calls and submissions.
    pub fn clear_history(&self) {
        self.calls.lock().clear();
        self.submissions.lock().clear();
    }

    fn record(&self, call: RemoteCall) {
        self.calls.lock().push(call);
    }

    fn find_account(&self, pred: impl Fn(&Account) -> bool, what: String) -> RemoteResult<Account> {
        self.accounts
            .lock()
            .iter()
            .find(|a| pred(a))
            .cloned()
            .ok_or(RemoteError::NotFound(what))
    }
}

fn normalize_pk(pk: &str) -> String {
    pk.trim().trim_start_matches("0x").to_ascii_lowercase()
}

impl RemoteQuery for MockRemote {
    fn get_account_by_index(&self, index: AccountIndex) -> BoxFuture<'_, RemoteResult<Account>> {
        Box::pin(async move {
            self.record(RemoteCall::AccountByIndex(index.index()));
            self.find_account(|a| a.index == index, format!("account {index}"))
        })
    }

    fn get_account_by_name(&self, name: String) -> BoxFuture<'_, RemoteResult<Account>> {
        Box::pin(async move {
            self.record(RemoteCall::AccountByName(name.clone()));
            self.find_account(|a| a.name == name, format!("account name {name}"))
        })
    }

    fn get_account_by_pubkey(&self, pubkey: String) -> BoxFuture<'_, RemoteResult<Account>> {
        Box::pin(async move {
            self.record(RemoteCall::AccountByPubKey(pubkey.clone()));
            let wanted = normalize_pk(&pubkey);
            self.find_account(
                |a| normalize_pk(&a.pk) == wanted,
                format!("account with public key {pubkey}"),
            )
        })
    }

    fn get_next_nonce(&self, index: AccountIndex) -> BoxFuture<'_, RemoteResult<i64>> {
        Box::pin(async move {
            self.record(RemoteCall::NextNonce(index.index()));
            self.find_account(|a| a.index == index, format!("account {index}"))
                .map(|a| a.nonce)
        })
    }

    fn get_max_offer_id(&self, index: AccountIndex) -> BoxFuture<'_, RemoteResult<i64>> {
        Box::pin(async move {
            self.record(RemoteCall::MaxOfferId(index.index()));
            Ok(self
                .max_offer_ids
                .lock()
                .get(&index.index())
                .copied()
                .unwrap_or(-1))
        })
    }

    fn get_asset_list(&self) -> BoxFuture<'_, RemoteResult<Vec<Asset>>> {
        Box::pin(async move {
            self.record(RemoteCall::AssetList);
            Ok(self.assets.lock().clone())
        })
    }

    fn get_pair_list(&self) -> BoxFuture<'_, RemoteResult<Vec<TradingPair>>> {
        Box::pin(async move {
            self.record(RemoteCall::PairList);
            Ok(self.pairs.lock().clone())
        })
    }

    fn get_pair_info(&self, index: PairIndex) -> BoxFuture<'_, RemoteResult<TradingPair>> {
        Box::pin(async move {
            self.record(RemoteCall::PairInfo(index.index()));
            self.pairs
                .lock()
                .iter()
                .find(|p| p.pair_index == index)
                .cloned()
                .ok_or_else(|| RemoteError::NotFound(format!("pair {index}")))
        })
    }

    fn get_nft_list(
        &self,
        index: AccountIndex,
        offset: i64,
        limit: i64,
    ) -> BoxFuture<'_, RemoteResult<NftList>> {
        Box::pin(async move {
            self.record(RemoteCall::NftList {
                account_index: index.index(),
                offset,
                limit,
            });
            let nfts = self.nfts.lock();
            let owned = nfts.get(&index.index()).cloned().unwrap_or_default();
            let total = owned.len() as i64;
            let page = owned
                .into_iter()
                .skip(offset.max(0) as usize)
                .take(limit.max(0) as usize)
                .collect();
            Ok(NftList { total, nfts: page })
        })
    }

    fn get_gas_account(&self) -> BoxFuture<'_, RemoteResult<GasAccount>> {
        Box::pin(async move {
            self.record(RemoteCall::GasAccount);
            Ok(self.gas_account.lock().clone())
        })
    }

    fn get_gas_fee(&self, asset_id: AssetId) -> BoxFuture<'_, RemoteResult<BigInt>> {
        Box::pin(async move {
            self.record(RemoteCall::GasFee(asset_id.index()));
            Ok(self.gas_fee.lock().clone())
        })
    }

    fn submit_raw_transaction(
        &self,
        tx_type: TxType,
        tx_info: String,
    ) -> BoxFuture<'_, RemoteResult<String>> {
        Box::pin(async move {
            self.record(RemoteCall::Submit(tx_type));
            if let Some((code, message)) = self.reject_next.lock().take() {
                return Err(RemoteError::Api { code, message });
            }
            let n = self.tx_counter.fetch_add(1, Ordering::SeqCst) + 1;
            let tx_id = format!("0x{n:064x}");
            self.submissions.lock().push(Submission {
                tx_type,
                tx_info,
                tx_id: tx_id.clone(),
            });
            Ok(tx_id)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::block_on;

    fn account(index: i64, name: &str, pk: &str, nonce: i64) -> Account {
        Account {
            index: AccountIndex::new(index),
            name: name.to_string(),
            pk: pk.to_string(),
            nonce,
            assets: Vec::new(),
        }
    }

    #[test]
    fn test_account_lookups_and_recording() {
        let mock = MockRemote::new();
        mock.add_account(account(2, "sher.legend", "0xABCD", 7));

        let by_name = block_on(mock.get_account_by_name("sher.legend".to_string())).unwrap();
        assert_eq!(by_name.index, AccountIndex::new(2));
        let by_pk = block_on(mock.get_account_by_pubkey("abcd".to_string())).unwrap();
        assert_eq!(by_pk.index, AccountIndex::new(2));
        assert_eq!(block_on(mock.get_next_nonce(AccountIndex::new(2))).unwrap(), 7);

        assert!(matches!(
            block_on(mock.get_account_by_name("nobody.legend".to_string())),
            Err(RemoteError::NotFound(_))
        ));
        assert_eq!(
            mock.count_calls(|c| matches!(c, RemoteCall::AccountByName(_))),
            2
        );
    }

    #[test]
    fn test_submission_ids_and_rejection() {
        let mock = MockRemote::new();
        let id1 = block_on(mock.submit_raw_transaction(TxType::Transfer, "{}".to_string())).unwrap();
        let id2 = block_on(mock.submit_raw_transaction(TxType::Swap, "{}".to_string())).unwrap();
        assert_ne!(id1, id2);

        mock.reject_next_submission(21, "invalid nonce");
        let err = block_on(mock.submit_raw_transaction(TxType::Transfer, "{}".to_string()))
            .unwrap_err();
        assert_eq!(err.to_string(), "API error 21: invalid nonce");
        assert_eq!(mock.submissions().len(), 2);
    }

    #[test]
    fn test_max_offer_id_defaults_to_none_used() {
        let mock = MockRemote::new();
        assert_eq!(block_on(mock.get_max_offer_id(AccountIndex::new(9))).unwrap(), -1);
        mock.set_max_offer_id(AccountIndex::new(9), 4);
        assert_eq!(block_on(mock.get_max_offer_id(AccountIndex::new(9))).unwrap(), 4);
    }
}
