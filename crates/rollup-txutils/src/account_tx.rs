//! Account key rotation.

use alloy::primitives::Address;
use rollup_core::{hex_serde, parse_l1_address, ChangePubKeyReq, TxType};
use serde::{Deserialize, Serialize};

use crate::encoding::CanonicalEncoder;
use crate::envelope::TxBody;
use crate::error::TxResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChangePubKeyBody {
    #[serde(rename = "L1Address", with = "hex_serde::address")]
    pub l1_address: Address,
    #[serde(with = "hex_serde::bytes32")]
    pub pub_key_x: [u8; 32],
    #[serde(with = "hex_serde::bytes32")]
    pub pub_key_y: [u8; 32],
}

impl ChangePubKeyBody {
    pub fn from_request(req: &ChangePubKeyReq) -> TxResult<Self> {
        Ok(Self {
            l1_address: parse_l1_address(&req.l1_address)?,
            pub_key_x: req.pub_key_x,
            pub_key_y: req.pub_key_y,
        })
    }
}

impl TxBody for ChangePubKeyBody {
    const TX_TYPE: TxType = TxType::ChangePubKey;

    fn encode(&self, enc: &mut CanonicalEncoder) -> TxResult<()> {
        enc.put_address(&self.l1_address)
            .put_bytes32(&self.pub_key_x)
            .put_bytes32(&self.pub_key_y);
        Ok(())
    }
}
