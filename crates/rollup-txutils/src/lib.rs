//! Transaction assembly for the rollup SDK.
//!
//! This crate turns validated requests and resolved options into signed,
//! wire-ready transactions:
//! - `KeyManager` / `KeySigner`: seed-derived secp256k1 signing
//! - `CanonicalEncoder`: the fixed-width byte layout the verifier rebuilds
//! - `TxInfo` / `build_tx`: one builder per transaction kind
//! - `build_offer` / `parse_signed_offer`: standalone signed offers
//! - `build_atomic_match`: settle a signed buy offer against a signed sell offer
//!
//! Nothing here performs network I/O.

pub mod account_tx;
pub mod asset_tx;
pub mod atomic_match;
pub mod builder;
pub mod encoding;
pub mod envelope;
pub mod error;
pub mod liquidity_tx;
pub mod nft_tx;
pub mod offer;
pub mod signer;

pub use atomic_match::build_atomic_match;
pub use builder::{build_tx, SignedTx, TxInfo};
pub use encoding::CanonicalEncoder;
pub use envelope::{TxBody, TxEnvelope};
pub use error::{TxError, TxResult};
pub use offer::{build_offer, encode_offer, parse_signed_offer, sign_offer, OFFER_TAG};
pub use signer::{
    parse_signature, recover_signer, KeyError, KeyManager, KeySigner, KeySource, SignerError,
};

#[cfg(test)]
pub(crate) mod test_support {
    use num_bigint::BigInt;
    use rollup_core::{
        account_name_hash, AccountIndex, AssetId, Destination, NftIndex, Offer, OfferType,
        ResolvedOpts,
    };

    use crate::signer::KeyManager;

    pub const T: i64 = 1_700_000_000_000;

    pub fn test_key() -> KeyManager {
        KeyManager::from_seed("0x28e1a3762ff9944e9a4ad79477b756ef0aff3d2af76f0f40a0c3ec6ca76cf24b")
            .unwrap()
    }

    pub fn resolved_opts() -> ResolvedOpts {
        ResolvedOpts {
            from_account_index: AccountIndex::new(2),
            gas_account_index: AccountIndex::new(1),
            gas_fee_asset_id: AssetId::new(0),
            gas_fee_asset_amount: BigInt::from(5000),
            nonce: 3,
            expired_at: T + 604_800_000,
            call_data: String::new(),
            to: None,
        }
    }

    pub fn to_gavin() -> Destination {
        Destination::Account {
            index: AccountIndex::new(3),
            name_hash: account_name_hash("gavin.legend"),
        }
    }

    fn offer(offer_type: OfferType, offer_id: i64, account: i64, nft: i64) -> Offer {
        Offer {
            offer_type,
            offer_id,
            account_index: AccountIndex::new(account),
            nft_index: NftIndex::new(nft),
            asset_id: AssetId::new(0),
            asset_amount: BigInt::from(10_000),
            listed_at: T,
            expired_at: T + 7_200_000,
            treasury_rate: 200,
            sig: None,
        }
    }

    pub fn buy_offer(offer_id: i64, nft: i64) -> Offer {
        offer(OfferType::Buy, offer_id, 4, nft)
    }

    pub fn sell_offer(offer_id: i64, nft: i64) -> Offer {
        offer(OfferType::Sell, offer_id, 5, nft)
    }
}
