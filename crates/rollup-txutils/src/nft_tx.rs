//! NFT and collection transactions.

use alloy::primitives::Address;
use rollup_core::{
    hex_serde, AccountIndex, CancelOfferTxReq, CreateCollectionTxReq, MintNftTxReq, NftIndex,
    ResolvedOpts, TransferNftTxReq, TxType, UpdateNftReq, WithdrawNftTxReq,
};
use serde::{Deserialize, Serialize};

use crate::asset_tx::l1_destination;
use crate::encoding::CanonicalEncoder;
use crate::envelope::TxBody;
use crate::error::TxResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MintNftBody {
    pub to_account_index: AccountIndex,
    #[serde(with = "hex_serde::bytes32")]
    pub to_account_name_hash: [u8; 32],
    #[serde(with = "hex_serde::bytes32")]
    pub nft_content_hash: [u8; 32],
    pub nft_collection_id: i64,
    pub creator_treasury_rate: i64,
    pub meta_data: String,
}

impl MintNftBody {
    pub fn from_request(req: &MintNftTxReq, opts: &ResolvedOpts) -> TxResult<Self> {
        let (to_account_index, to_account_name_hash) = opts.account_destination("mint nft")?;
        Ok(Self {
            to_account_index,
            to_account_name_hash,
            nft_content_hash: req.content_hash_bytes()?,
            nft_collection_id: req.nft_collection_id,
            creator_treasury_rate: req.creator_treasury_rate,
            meta_data: req.meta_data.clone(),
        })
    }
}

impl TxBody for MintNftBody {
    const TX_TYPE: TxType = TxType::MintNft;

    fn encode(&self, enc: &mut CanonicalEncoder) -> TxResult<()> {
        enc.put_i64(self.to_account_index.index())
            .put_bytes32(&self.to_account_name_hash)
            .put_bytes32(&self.nft_content_hash)
            .put_i64(self.nft_collection_id)
            .put_i64(self.creator_treasury_rate)
            .put_str_hash(&self.meta_data);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransferNftBody {
    pub to_account_index: AccountIndex,
    #[serde(with = "hex_serde::bytes32")]
    pub to_account_name_hash: [u8; 32],
    pub nft_index: NftIndex,
    pub call_data: String,
}

impl TransferNftBody {
    pub fn from_request(req: &TransferNftTxReq, opts: &ResolvedOpts) -> TxResult<Self> {
        let (to_account_index, to_account_name_hash) = opts.account_destination("transfer nft")?;
        Ok(Self {
            to_account_index,
            to_account_name_hash,
            nft_index: req.nft_index,
            call_data: opts.call_data.clone(),
        })
    }
}

impl TxBody for TransferNftBody {
    const TX_TYPE: TxType = TxType::TransferNft;

    fn encode(&self, enc: &mut CanonicalEncoder) -> TxResult<()> {
        enc.put_i64(self.to_account_index.index())
            .put_bytes32(&self.to_account_name_hash)
            .put_i64(self.nft_index.index())
            .put_str_hash(&self.call_data);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WithdrawNftBody {
    pub nft_index: NftIndex,
    #[serde(with = "hex_serde::address")]
    pub to_address: Address,
}

impl WithdrawNftBody {
    pub fn from_request(req: &WithdrawNftTxReq, opts: &ResolvedOpts) -> TxResult<Self> {
        Ok(Self {
            nft_index: req.nft_index,
            to_address: l1_destination(opts, &req.to_address)?,
        })
    }
}

impl TxBody for WithdrawNftBody {
    const TX_TYPE: TxType = TxType::WithdrawNft;

    fn encode(&self, enc: &mut CanonicalEncoder) -> TxResult<()> {
        enc.put_i64(self.nft_index.index())
            .put_address(&self.to_address);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateCollectionBody {
    pub name: String,
    pub introduction: String,
}

impl CreateCollectionBody {
    pub fn from_request(req: &CreateCollectionTxReq) -> Self {
        Self {
            name: req.name.clone(),
            introduction: req.introduction.clone(),
        }
    }
}

impl TxBody for CreateCollectionBody {
    const TX_TYPE: TxType = TxType::CreateCollection;

    fn encode(&self, enc: &mut CanonicalEncoder) -> TxResult<()> {
        enc.put_str_hash(&self.name)
            .put_str_hash(&self.introduction);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateNftBody {
    pub nft_index: NftIndex,
    pub mutable_attributes: String,
}

impl UpdateNftBody {
    pub fn from_request(req: &UpdateNftReq) -> Self {
        Self {
            nft_index: req.nft_index,
            mutable_attributes: req.mutable_attributes.clone(),
        }
    }
}

impl TxBody for UpdateNftBody {
    const TX_TYPE: TxType = TxType::UpdateNft;

    fn encode(&self, enc: &mut CanonicalEncoder) -> TxResult<()> {
        enc.put_i64(self.nft_index.index())
            .put_str_hash(&self.mutable_attributes);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CancelOfferBody {
    pub offer_id: i64,
}

impl CancelOfferBody {
    pub fn from_request(req: &CancelOfferTxReq) -> Self {
        Self {
            offer_id: req.offer_id,
        }
    }
}

impl TxBody for CancelOfferBody {
    const TX_TYPE: TxType = TxType::CancelOffer;

    fn encode(&self, enc: &mut CanonicalEncoder) -> TxResult<()> {
        enc.put_i64(self.offer_id);
        Ok(())
    }
}
