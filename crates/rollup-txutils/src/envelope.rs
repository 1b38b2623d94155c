//! Common transaction frame shared by every kind.
//!
//! Canonical layout:
//! `[type u8][from_account_index][body][gas_account_index][gas_fee_asset_id]
//! [gas_fee_asset_amount][expired_at][nonce]`
//!
//! The wire JSON carries the same fields in the same order, then `Sig`.

use num_bigint::BigInt;
use rollup_core::amount::serde_str;
use rollup_core::{hex_serde, AccountIndex, AssetId, ResolvedOpts, TxType};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::encoding::CanonicalEncoder;
use crate::error::{TxError, TxResult};
use crate::signer::KeySigner;

/// Kind-specific part of a transaction.
pub trait TxBody: Serialize + DeserializeOwned {
    const TX_TYPE: TxType;

    /// Checks that need the built body rather than the raw request.
    fn validate(&self) -> TxResult<()> {
        Ok(())
    }

    /// Append the body fields in canonical order.
    fn encode(&self, enc: &mut CanonicalEncoder) -> TxResult<()>;
}

/// A transaction of one kind: common fields around a body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TxEnvelope<B> {
    pub from_account_index: AccountIndex,
    #[serde(flatten)]
    pub body: B,
    pub gas_account_index: AccountIndex,
    pub gas_fee_asset_id: AssetId,
    #[serde(with = "serde_str")]
    pub gas_fee_asset_amount: BigInt,
    pub expired_at: i64,
    pub nonce: i64,
    #[serde(
        default,
        with = "hex_serde::bytes_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub sig: Option<Vec<u8>>,
}

impl<B: TxBody> TxEnvelope<B> {
    /// Frame `body` with fully resolved options. Unsigned.
    pub fn new(body: B, opts: &ResolvedOpts) -> Self {
        Self {
            from_account_index: opts.from_account_index,
            body,
            gas_account_index: opts.gas_account_index,
            gas_fee_asset_id: opts.gas_fee_asset_id,
            gas_fee_asset_amount: opts.gas_fee_asset_amount.clone(),
            expired_at: opts.expired_at,
            nonce: opts.nonce,
            sig: None,
        }
    }

    pub fn tx_type(&self) -> TxType {
        B::TX_TYPE
    }

    pub fn validate(&self) -> TxResult<()> {
        self.body.validate()
    }

    /// Bytes the signature covers. Never includes the signature itself.
    pub fn canonical_encode(&self) -> TxResult<Vec<u8>> {
        let mut enc = CanonicalEncoder::new();
        enc.put_u8(B::TX_TYPE.code())
            .put_i64(self.from_account_index.index());
        self.body.encode(&mut enc)?;
        enc.put_i64(self.gas_account_index.index())
            .put_i64(self.gas_fee_asset_id.index());
        enc.put_amount("gas fee asset amount", &self.gas_fee_asset_amount)?;
        enc.put_i64(self.expired_at).put_i64(self.nonce);
        Ok(enc.finish())
    }

    /// Sign the canonical encoding and attach the signature.
    ///
    /// Returns the signed bytes.
    pub fn sign(&mut self, key: &dyn KeySigner) -> TxResult<Vec<u8>> {
        let payload = self.canonical_encode()?;
        self.sig = Some(key.sign(&payload)?);
        Ok(payload)
    }

    pub fn sig(&self) -> Option<&[u8]> {
        self.sig.as_deref()
    }

    /// Wire JSON. Refuses to serialize an unsigned transaction.
    pub fn to_wire(&self) -> TxResult<String> {
        if self.sig.is_none() {
            return Err(TxError::Encoding(format!(
                "{} transaction is not signed",
                B::TX_TYPE
            )));
        }
        Ok(serde_json::to_string(self)?)
    }
}
