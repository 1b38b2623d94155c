//! Fungible asset transactions: transfer and withdraw.

use alloy::primitives::Address;
use num_bigint::BigInt;
use rollup_core::amount::serde_str;
use rollup_core::{
    hex_serde, parse_l1_address, AccountIndex, AssetId, Destination, ResolvedOpts, TransferTxReq,
    TxType, WithdrawTxReq,
};
use serde::{Deserialize, Serialize};

use crate::encoding::CanonicalEncoder;
use crate::envelope::TxBody;
use crate::error::TxResult;

/// L1 destination: the resolved one if present, otherwise the raw request field.
pub(crate) fn l1_destination(opts: &ResolvedOpts, raw: &str) -> TxResult<Address> {
    match opts.to {
        Some(Destination::L1Address(addr)) => Ok(addr),
        _ => Ok(parse_l1_address(raw)?),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransferBody {
    pub to_account_index: AccountIndex,
    #[serde(with = "hex_serde::bytes32")]
    pub to_account_name_hash: [u8; 32],
    pub asset_id: AssetId,
    #[serde(with = "serde_str")]
    pub asset_amount: BigInt,
    pub call_data: String,
}

impl TransferBody {
    pub fn from_request(req: &TransferTxReq, opts: &ResolvedOpts) -> TxResult<Self> {
        let (to_account_index, to_account_name_hash) = opts.account_destination("transfer")?;
        Ok(Self {
            to_account_index,
            to_account_name_hash,
            asset_id: req.asset_id,
            asset_amount: req.asset_amount.clone(),
            call_data: opts.call_data.clone(),
        })
    }
}

impl TxBody for TransferBody {
    const TX_TYPE: TxType = TxType::Transfer;

    fn encode(&self, enc: &mut CanonicalEncoder) -> TxResult<()> {
        enc.put_i64(self.to_account_index.index())
            .put_bytes32(&self.to_account_name_hash)
            .put_i64(self.asset_id.index());
        enc.put_amount("asset amount", &self.asset_amount)?;
        enc.put_str_hash(&self.call_data);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WithdrawBody {
    pub asset_id: AssetId,
    #[serde(with = "serde_str")]
    pub asset_amount: BigInt,
    #[serde(with = "hex_serde::address")]
    pub to_address: Address,
}

impl WithdrawBody {
    pub fn from_request(req: &WithdrawTxReq, opts: &ResolvedOpts) -> TxResult<Self> {
        Ok(Self {
            asset_id: req.asset_id,
            asset_amount: req.asset_amount.clone(),
            to_address: l1_destination(opts, &req.to_address)?,
        })
    }
}

impl TxBody for WithdrawBody {
    const TX_TYPE: TxType = TxType::Withdraw;

    fn encode(&self, enc: &mut CanonicalEncoder) -> TxResult<()> {
        enc.put_i64(self.asset_id.index());
        enc.put_amount("asset amount", &self.asset_amount)?;
        enc.put_address(&self.to_address);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::TxEnvelope;
    use crate::test_support::{resolved_opts, test_key, to_gavin};
    use rollup_core::account_name_hash;

    fn transfer_req() -> TransferTxReq {
        TransferTxReq {
            to: "gavin.legend".to_string(),
            asset_id: AssetId::new(0),
            asset_amount: BigInt::from(100_000),
        }
    }

    #[test]
    fn test_transfer_layout() {
        let mut opts = resolved_opts();
        opts.to = Some(to_gavin());
        let body = TransferBody::from_request(&transfer_req(), &opts).unwrap();
        let env = TxEnvelope::new(body, &opts);
        let bytes = env.canonical_encode().unwrap();

        // type + from + (to idx + name hash + asset + amount + call data) + gas idx + gas asset
        // + gas amount + expiry + nonce
        assert_eq!(bytes.len(), 1 + 8 + (8 + 32 + 8 + 32 + 32) + 8 + 8 + 32 + 8 + 8);
        assert_eq!(bytes[0], TxType::Transfer.code());
        assert_eq!(&bytes[1..9], &opts.from_account_index.index().to_be_bytes());
        assert_eq!(&bytes[17..49], &account_name_hash("gavin.legend"));
        assert_eq!(&bytes[bytes.len() - 8..], &opts.nonce.to_be_bytes());
    }

    #[test]
    fn test_transfer_requires_account_destination() {
        let opts = resolved_opts();
        assert!(TransferBody::from_request(&transfer_req(), &opts).is_err());
    }

    #[test]
    fn test_withdraw_wire_form() {
        let opts = resolved_opts();
        let req = WithdrawTxReq {
            asset_id: AssetId::new(1),
            asset_amount: BigInt::from(5),
            to_address: "0x8b2C5A5744F42AA9269BaabDd05933a96D8EF911".to_string(),
        };
        let body = WithdrawBody::from_request(&req, &opts).unwrap();
        let mut env = TxEnvelope::new(body, &opts);
        assert!(env.to_wire().is_err(), "unsigned transactions never reach the wire");

        env.sign(&test_key()).unwrap();
        let wire = env.to_wire().unwrap();
        assert!(wire.starts_with(r#"{"FromAccountIndex":2,"AssetId":1,"AssetAmount":"5","ToAddress":"0x8b2c5a5744f42aa9269baabdd05933a96d8ef911""#));
        assert!(wire.contains(r#""Sig":"0x"#));

        let back: TxEnvelope<WithdrawBody> = serde_json::from_str(&wire).unwrap();
        assert_eq!(back, env);
    }
}
