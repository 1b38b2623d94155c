//! Transaction builders.
//!
//! `TxInfo` is the closed set of buildable kinds. Every variant validates,
//! encodes canonically and signs the same way; only the body differs.
//! Builders do no I/O: given the same request, options and key they produce
//! byte-identical output.

use alloy::primitives::keccak256;
use rollup_core::{hex_serde, ResolvedOpts, TxRequest, TxType};
use tracing::debug;

use crate::account_tx::ChangePubKeyBody;
use crate::asset_tx::{TransferBody, WithdrawBody};
use crate::atomic_match::AtomicMatchBody;
use crate::envelope::TxEnvelope;
use crate::error::TxResult;
use crate::liquidity_tx::{AddLiquidityBody, RemoveLiquidityBody, SwapBody};
use crate::nft_tx::{
    CancelOfferBody, CreateCollectionBody, MintNftBody, TransferNftBody, UpdateNftBody,
    WithdrawNftBody,
};
use crate::signer::KeySigner;

/// A transaction of any buildable kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxInfo {
    Transfer(TxEnvelope<TransferBody>),
    Withdraw(TxEnvelope<WithdrawBody>),
    MintNft(TxEnvelope<MintNftBody>),
    TransferNft(TxEnvelope<TransferNftBody>),
    WithdrawNft(TxEnvelope<WithdrawNftBody>),
    CreateCollection(TxEnvelope<CreateCollectionBody>),
    UpdateNft(TxEnvelope<UpdateNftBody>),
    CancelOffer(TxEnvelope<CancelOfferBody>),
    AddLiquidity(TxEnvelope<AddLiquidityBody>),
    RemoveLiquidity(TxEnvelope<RemoveLiquidityBody>),
    Swap(TxEnvelope<SwapBody>),
    ChangePubKey(TxEnvelope<ChangePubKeyBody>),
    AtomicMatch(TxEnvelope<AtomicMatchBody>),
}

macro_rules! dispatch {
    ($info:expr, $env:ident => $body:expr) => {
        match $info {
            TxInfo::Transfer($env) => $body,
            TxInfo::Withdraw($env) => $body,
            TxInfo::MintNft($env) => $body,
            TxInfo::TransferNft($env) => $body,
            TxInfo::WithdrawNft($env) => $body,
            TxInfo::CreateCollection($env) => $body,
            TxInfo::UpdateNft($env) => $body,
            TxInfo::CancelOffer($env) => $body,
            TxInfo::AddLiquidity($env) => $body,
            TxInfo::RemoveLiquidity($env) => $body,
            TxInfo::Swap($env) => $body,
            TxInfo::ChangePubKey($env) => $body,
            TxInfo::AtomicMatch($env) => $body,
        }
    };
}

impl TxInfo {
    /// Combine a request with resolved options. Unsigned.
    pub fn from_request(req: &TxRequest, opts: &ResolvedOpts) -> TxResult<Self> {
        let info = match req {
            TxRequest::Transfer(r) => {
                Self::Transfer(TxEnvelope::new(TransferBody::from_request(r, opts)?, opts))
            }
            TxRequest::Withdraw(r) => {
                Self::Withdraw(TxEnvelope::new(WithdrawBody::from_request(r, opts)?, opts))
            }
            TxRequest::MintNft(r) => {
                Self::MintNft(TxEnvelope::new(MintNftBody::from_request(r, opts)?, opts))
            }
            TxRequest::TransferNft(r) => Self::TransferNft(TxEnvelope::new(
                TransferNftBody::from_request(r, opts)?,
                opts,
            )),
            TxRequest::WithdrawNft(r) => Self::WithdrawNft(TxEnvelope::new(
                WithdrawNftBody::from_request(r, opts)?,
                opts,
            )),
            TxRequest::CreateCollection(r) => Self::CreateCollection(TxEnvelope::new(
                CreateCollectionBody::from_request(r),
                opts,
            )),
            TxRequest::UpdateNft(r) => {
                Self::UpdateNft(TxEnvelope::new(UpdateNftBody::from_request(r), opts))
            }
            TxRequest::CancelOffer(r) => {
                Self::CancelOffer(TxEnvelope::new(CancelOfferBody::from_request(r), opts))
            }
            TxRequest::AddLiquidity(r) => Self::AddLiquidity(TxEnvelope::new(
                AddLiquidityBody::from_request(r)?,
                opts,
            )),
            TxRequest::RemoveLiquidity(r) => Self::RemoveLiquidity(TxEnvelope::new(
                RemoveLiquidityBody::from_request(r),
                opts,
            )),
            TxRequest::Swap(r) => Self::Swap(TxEnvelope::new(SwapBody::from_request(r), opts)),
            TxRequest::ChangePubKey(r) => Self::ChangePubKey(TxEnvelope::new(
                ChangePubKeyBody::from_request(r)?,
                opts,
            )),
            TxRequest::AtomicMatch(r) => {
                Self::AtomicMatch(TxEnvelope::new(AtomicMatchBody::from_request(r), opts))
            }
        };
        Ok(info)
    }

    pub fn tx_type(&self) -> TxType {
        dispatch!(self, env => env.tx_type())
    }

    pub fn validate(&self) -> TxResult<()> {
        dispatch!(self, env => env.validate())
    }

    pub fn canonical_encode(&self) -> TxResult<Vec<u8>> {
        dispatch!(self, env => env.canonical_encode())
    }

    /// Sign with `key`; returns the bytes that were signed.
    pub fn sign(&mut self, key: &dyn KeySigner) -> TxResult<Vec<u8>> {
        dispatch!(self, env => env.sign(key))
    }

    pub fn sig(&self) -> Option<&[u8]> {
        dispatch!(self, env => env.sig())
    }

    pub fn to_wire(&self) -> TxResult<String> {
        dispatch!(self, env => env.to_wire())
    }
}

/// A signed transaction ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTx {
    pub tx_type: TxType,
    /// Wire JSON, including the signature.
    pub tx_info: String,
    /// keccak-256 of the canonical encoding, `0x`-hex.
    pub tx_hash: String,
}

/// Validate, encode, sign and serialize one transaction.
///
/// `now_ms` is the build timestamp used for offer expiry checks.
pub fn build_tx(
    key: &dyn KeySigner,
    req: &TxRequest,
    opts: &ResolvedOpts,
    now_ms: i64,
) -> TxResult<SignedTx> {
    req.validate(now_ms)?;
    opts.validate()?;

    let mut info = TxInfo::from_request(req, opts)?;
    info.validate()?;
    let payload = info.sign(key)?;
    let tx_info = info.to_wire()?;
    let tx_hash = hex_serde::encode(keccak256(&payload).as_slice());

    debug!(
        tx_type = %info.tx_type(),
        from = %opts.from_account_index,
        nonce = opts.nonce,
        tx_hash = %tx_hash,
        "Built signed transaction"
    );

    Ok(SignedTx {
        tx_type: info.tx_type(),
        tx_info,
        tx_hash,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TxError;
    use crate::signer::{recover_signer, KeyManager};
    use crate::test_support::{resolved_opts, test_key, to_gavin};
    use num_bigint::BigInt;
    use rollup_core::{
        AssetId, CancelOfferTxReq, CoreError, CreateCollectionTxReq, NftIndex, TransferTxReq,
        UpdateNftReq, WithdrawNftTxReq,
    };

    fn transfer(amount: i64) -> TxRequest {
        TxRequest::Transfer(TransferTxReq {
            to: "gavin.legend".to_string(),
            asset_id: AssetId::new(0),
            asset_amount: BigInt::from(amount),
        })
    }

    fn opts_to_gavin() -> ResolvedOpts {
        let mut opts = resolved_opts();
        opts.to = Some(to_gavin());
        opts
    }

    #[test]
    fn test_build_is_deterministic() {
        let key = test_key();
        let opts = opts_to_gavin();
        let a = build_tx(&key, &transfer(100_000), &opts, 0).unwrap();
        let b = build_tx(&key, &transfer(100_000), &opts, 0).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.tx_type, TxType::Transfer);
    }

    #[test]
    fn test_negative_amount_fails_before_signing() {
        struct PanicSigner;
        impl KeySigner for PanicSigner {
            fn public_key_bytes(&self) -> Vec<u8> {
                Vec::new()
            }
            fn sign(&self, _payload: &[u8]) -> Result<Vec<u8>, crate::signer::SignerError> {
                panic!("signing must not be reached");
            }
        }

        let err = build_tx(&PanicSigner, &transfer(-1), &opts_to_gavin(), 0).unwrap_err();
        assert!(matches!(err, TxError::Core(CoreError::InvalidRequest(_))));
    }

    #[test]
    fn test_nonce_is_embedded_unchanged() {
        let key = test_key();
        let mut opts = opts_to_gavin();
        opts.nonce = 42;
        let signed = build_tx(&key, &transfer(1), &opts, 0).unwrap();
        let value: serde_json::Value = serde_json::from_str(&signed.tx_info).unwrap();
        assert_eq!(value["Nonce"], 42);

        let info = TxInfo::from_request(&transfer(1), &opts).unwrap();
        let bytes = info.canonical_encode().unwrap();
        assert_eq!(&bytes[bytes.len() - 8..], &42i64.to_be_bytes());
    }

    #[test]
    fn test_signature_recovers_to_key() {
        let key = test_key();
        let opts = resolved_opts();
        let req = TxRequest::CancelOffer(CancelOfferTxReq { offer_id: 1 });
        let mut info = TxInfo::from_request(&req, &opts).unwrap();
        let payload = info.sign(&key).unwrap();
        assert_eq!(
            recover_signer(&payload, info.sig().unwrap()).unwrap(),
            key.address()
        );

        let other = KeyManager::from_seed("0x99").unwrap();
        let mut info2 = TxInfo::from_request(&req, &opts).unwrap();
        info2.sign(&other).unwrap();
        assert_ne!(info.sig(), info2.sig());
    }

    #[test]
    fn test_every_kind_dispatches_to_its_code() {
        let opts = opts_to_gavin();
        let cases = [
            (
                TxRequest::CreateCollection(CreateCollectionTxReq {
                    name: "Zkbnb".to_string(),
                    introduction: String::new(),
                }),
                TxType::CreateCollection,
            ),
            (
                TxRequest::UpdateNft(UpdateNftReq {
                    nft_index: NftIndex::new(1),
                    mutable_attributes: "{\"level\":2}".to_string(),
                }),
                TxType::UpdateNft,
            ),
            (
                TxRequest::WithdrawNft(WithdrawNftTxReq {
                    nft_index: NftIndex::new(1),
                    to_address: "0x8b2C5A5744F42AA9269BaabDd05933a96D8EF911".to_string(),
                }),
                TxType::WithdrawNft,
            ),
        ];
        for (req, expected) in cases {
            let info = TxInfo::from_request(&req, &opts).unwrap();
            assert_eq!(info.tx_type(), expected);
            assert_eq!(info.canonical_encode().unwrap()[0], expected.code());
        }
    }

    #[test]
    fn test_invalid_opts_rejected() {
        let mut opts = opts_to_gavin();
        opts.nonce = -1;
        assert!(build_tx(&test_key(), &transfer(1), &opts, 0).is_err());
    }
}
