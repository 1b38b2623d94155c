//! Option resolution.
//!
//! Turns a partially specified [`TransactOpts`] into a [`ResolvedOpts`] by
//! querying the remote for whatever the caller left unset. Nothing is cached:
//! every call re-reads remote state, so two concurrent calls for the same
//! account can resolve the same nonce. Callers that need strict ordering must
//! serialize their submissions.

use std::sync::Arc;

use rollup_core::{
    AccountIndex, AssetId, Clock, Destination, DestinationRef, ResolvedOpts, TransactOpts,
};
use rollup_remote::DynRemote;
use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// Identifies the sending account when the options leave it unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountRef {
    Index(AccountIndex),
    Name(String),
    /// Hex public key, usually the signing key's own.
    PubKey(String),
}

pub struct OptionResolver {
    remote: DynRemote,
    clock: Arc<dyn Clock>,
    default_expiry_ms: i64,
    default_gas_asset_id: AssetId,
}

impl OptionResolver {
    pub fn new(
        remote: DynRemote,
        clock: Arc<dyn Clock>,
        default_expiry_ms: i64,
        default_gas_asset_id: AssetId,
    ) -> Self {
        Self {
            remote,
            clock,
            default_expiry_ms,
            default_gas_asset_id,
        }
    }

    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    /// Default expiry for something created now.
    pub fn default_expired_at(&self) -> i64 {
        self.now_ms().saturating_add(self.default_expiry_ms)
    }

    /// Fill every unset field of `opts`.
    ///
    /// `to` is the human-supplied destination, if the transaction kind has
    /// one. Lookups run in field order and the first failure is returned.
    pub async fn resolve(
        &self,
        opts: TransactOpts,
        from: &AccountRef,
        to: Option<&str>,
    ) -> ClientResult<ResolvedOpts> {
        let from_account_index = match opts.from_account_index {
            Some(index) => index,
            None => self.account_index(from).await?,
        };

        let nonce = match opts.nonce {
            Some(nonce) => nonce,
            None => self
                .remote
                .get_next_nonce(from_account_index)
                .await
                .map_err(|e| ClientError::resolution("nonce", e))?,
        };

        let expired_at = opts
            .expired_at
            .unwrap_or_else(|| self.default_expired_at());

        let gas_fee_asset_id = opts.gas_fee_asset_id.unwrap_or(self.default_gas_asset_id);

        let gas_account_index = match opts.gas_account_index {
            Some(index) => index,
            None => {
                self.remote
                    .get_gas_account()
                    .await
                    .map_err(|e| ClientError::resolution("gas account", e))?
                    .index
            }
        };

        let gas_fee_asset_amount = match opts.gas_fee_asset_amount {
            Some(amount) => amount,
            None => self
                .remote
                .get_gas_fee(gas_fee_asset_id)
                .await
                .map_err(|e| ClientError::resolution("gas fee", e))?,
        };

        let to = match to {
            Some(raw) => Some(self.resolve_destination(raw).await?),
            None => None,
        };

        let resolved = ResolvedOpts {
            from_account_index,
            gas_account_index,
            gas_fee_asset_id,
            gas_fee_asset_amount,
            nonce,
            expired_at,
            call_data: opts.call_data.unwrap_or_default(),
            to,
        };
        resolved.validate()?;

        debug!(
            from = %resolved.from_account_index,
            nonce = resolved.nonce,
            expired_at = resolved.expired_at,
            gas_account = %resolved.gas_account_index,
            gas_asset = %resolved.gas_fee_asset_id,
            gas_fee = %resolved.gas_fee_asset_amount,
            "Resolved transaction options"
        );
        Ok(resolved)
    }

    /// Canonical destination for a name, public key or L1 address.
    ///
    /// L1 addresses pass through without a network call; names and keys
    /// that do not resolve fail with `NotFound`.
    pub async fn resolve_destination(&self, raw: &str) -> ClientResult<Destination> {
        let account = match DestinationRef::parse(raw)? {
            DestinationRef::L1Address(addr) => return Ok(Destination::L1Address(addr)),
            DestinationRef::PubKey(pk) => self.remote.get_account_by_pubkey(pk).await,
            DestinationRef::Name(name) => self.remote.get_account_by_name(name).await,
        }
        .map_err(|e| ClientError::resolution("destination", e))?;

        debug!(destination = raw, index = %account.index, "Resolved destination");
        Ok(Destination::Account {
            index: account.index,
            name_hash: account.name_hash(),
        })
    }

    async fn account_index(&self, from: &AccountRef) -> ClientResult<AccountIndex> {
        let account = match from {
            AccountRef::Index(index) => return Ok(*index),
            AccountRef::Name(name) => self.remote.get_account_by_name(name.clone()).await,
            AccountRef::PubKey(pk) => self.remote.get_account_by_pubkey(pk.clone()).await,
        }
        .map_err(|e| ClientError::resolution("from account", e))?;
        Ok(account.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;
    use rollup_core::{account_name_hash, parse_l1_address, Account, FixedClock};
    use rollup_remote::{MockRemote, RemoteCall};

    const NOW: i64 = 1_700_000_000_000;
    const WEEK: i64 = 604_800_000;

    fn account(index: i64, name: &str, pk: &str, nonce: i64) -> Account {
        Account {
            index: AccountIndex::new(index),
            name: name.to_string(),
            pk: pk.to_string(),
            nonce,
            assets: Vec::new(),
        }
    }

    fn setup() -> (Arc<MockRemote>, OptionResolver) {
        let mock = Arc::new(MockRemote::new());
        mock.add_account(account(2, "sher.legend", "02aa", 7));
        mock.add_account(account(3, "gavin.legend", "02bb", 0));
        mock.set_gas_fee(BigInt::from(5000));
        let resolver = OptionResolver::new(
            mock.clone(),
            Arc::new(FixedClock::new(NOW)),
            WEEK,
            AssetId::new(0),
        );
        (mock, resolver)
    }

    #[tokio::test]
    async fn test_unset_nonce_issues_exactly_one_query() {
        let (mock, resolver) = setup();
        let resolved = resolver
            .resolve(
                TransactOpts::new(),
                &AccountRef::Name("sher.legend".to_string()),
                None,
            )
            .await
            .unwrap();

        assert_eq!(resolved.from_account_index, AccountIndex::new(2));
        assert_eq!(resolved.nonce, 7);
        assert_eq!(resolved.expired_at, NOW + WEEK);
        assert_eq!(resolved.gas_account_index, AccountIndex::new(1));
        assert_eq!(resolved.gas_fee_asset_amount, BigInt::from(5000));
        assert_eq!(
            mock.count_calls(|c| matches!(c, RemoteCall::NextNonce(2))),
            1
        );
    }

    #[tokio::test]
    async fn test_explicit_fields_skip_lookups() {
        let (mock, resolver) = setup();
        let opts = TransactOpts::new()
            .with_from_account_index(AccountIndex::new(2))
            .with_nonce(11)
            .with_expired_at(NOW + 1)
            .with_gas_account_index(AccountIndex::new(1))
            .with_gas_fee(AssetId::new(0), BigInt::from(1));
        let resolved = resolver
            .resolve(opts, &AccountRef::Index(AccountIndex::new(9)), None)
            .await
            .unwrap();

        assert_eq!(resolved.nonce, 11);
        assert_eq!(resolved.expired_at, NOW + 1);
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_resolution_is_idempotent() {
        let (_mock, resolver) = setup();
        let from = AccountRef::PubKey("02aa".to_string());
        let a = resolver
            .resolve(TransactOpts::new(), &from, Some("gavin.legend"))
            .await
            .unwrap();
        let b = resolver
            .resolve(TransactOpts::new(), &from, Some("gavin.legend"))
            .await
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(
            a.to,
            Some(Destination::Account {
                index: AccountIndex::new(3),
                name_hash: account_name_hash("gavin.legend"),
            })
        );
    }

    #[tokio::test]
    async fn test_unknown_name_is_not_found() {
        let (_mock, resolver) = setup();
        let err = resolver.resolve_destination("nobody.legend").await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_l1_address_passes_through() {
        let (mock, resolver) = setup();
        let raw = "0x8b2C5A5744F42AA9269BaabDd05933a96D8EF911";
        let dest = resolver.resolve_destination(raw).await.unwrap();
        assert_eq!(dest, Destination::L1Address(parse_l1_address(raw).unwrap()));
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_negative_explicit_nonce_is_rejected() {
        let (_mock, resolver) = setup();
        let err = resolver
            .resolve(
                TransactOpts::new().with_nonce(-2),
                &AccountRef::Index(AccountIndex::new(2)),
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }
}
