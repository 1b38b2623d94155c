//! Liquidity pool transactions: add, remove and swap.

use num_bigint::BigInt;
use rollup_core::amount::serde_str;
use rollup_core::{
    AddLiquidityTxReq, AssetId, CoreError, PairIndex, RemoveLiquidityTxReq, SwapTxReq, TxType,
};
use serde::{Deserialize, Serialize};

use crate::encoding::CanonicalEncoder;
use crate::envelope::TxBody;
use crate::error::TxResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AddLiquidityBody {
    pub pair_index: PairIndex,
    pub asset_a_id: AssetId,
    #[serde(with = "serde_str")]
    pub asset_a_amount: BigInt,
    pub asset_b_id: AssetId,
    #[serde(with = "serde_str")]
    pub asset_b_amount: BigInt,
    #[serde(with = "serde_str")]
    pub lp_amount: BigInt,
}

impl AddLiquidityBody {
    /// The LP amount must already be filled in; builders never query pool state.
    pub fn from_request(req: &AddLiquidityTxReq) -> TxResult<Self> {
        let lp_amount = req.lp_amount.clone().ok_or_else(|| {
            CoreError::InvalidRequest(
                "lp amount must be set before building add liquidity".to_string(),
            )
        })?;
        Ok(Self {
            pair_index: req.pair_index,
            asset_a_id: req.asset_a_id,
            asset_a_amount: req.asset_a_amount.clone(),
            asset_b_id: req.asset_b_id,
            asset_b_amount: req.asset_b_amount.clone(),
            lp_amount,
        })
    }
}

impl TxBody for AddLiquidityBody {
    const TX_TYPE: TxType = TxType::AddLiquidity;

    fn encode(&self, enc: &mut CanonicalEncoder) -> TxResult<()> {
        enc.put_i64(self.pair_index.index())
            .put_i64(self.asset_a_id.index());
        enc.put_amount("asset A amount", &self.asset_a_amount)?
            .put_i64(self.asset_b_id.index());
        enc.put_amount("asset B amount", &self.asset_b_amount)?
            .put_amount("lp amount", &self.lp_amount)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RemoveLiquidityBody {
    pub pair_index: PairIndex,
    pub asset_a_id: AssetId,
    #[serde(with = "serde_str")]
    pub asset_a_min_amount: BigInt,
    pub asset_b_id: AssetId,
    #[serde(with = "serde_str")]
    pub asset_b_min_amount: BigInt,
    #[serde(with = "serde_str")]
    pub lp_amount: BigInt,
}

impl RemoveLiquidityBody {
    pub fn from_request(req: &RemoveLiquidityTxReq) -> Self {
        Self {
            pair_index: req.pair_index,
            asset_a_id: req.asset_a_id,
            asset_a_min_amount: req.asset_a_min_amount.clone(),
            asset_b_id: req.asset_b_id,
            asset_b_min_amount: req.asset_b_min_amount.clone(),
            lp_amount: req.lp_amount.clone(),
        }
    }
}

impl TxBody for RemoveLiquidityBody {
    const TX_TYPE: TxType = TxType::RemoveLiquidity;

    fn encode(&self, enc: &mut CanonicalEncoder) -> TxResult<()> {
        enc.put_i64(self.pair_index.index())
            .put_i64(self.asset_a_id.index());
        enc.put_amount("asset A min amount", &self.asset_a_min_amount)?
            .put_i64(self.asset_b_id.index());
        enc.put_amount("asset B min amount", &self.asset_b_min_amount)?
            .put_amount("lp amount", &self.lp_amount)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SwapBody {
    pub pair_index: PairIndex,
    pub asset_a_id: AssetId,
    #[serde(with = "serde_str")]
    pub asset_a_amount: BigInt,
    pub asset_b_id: AssetId,
    #[serde(with = "serde_str")]
    pub asset_b_min_amount: BigInt,
}

impl SwapBody {
    pub fn from_request(req: &SwapTxReq) -> Self {
        Self {
            pair_index: req.pair_index,
            asset_a_id: req.asset_a_id,
            asset_a_amount: req.asset_a_amount.clone(),
            asset_b_id: req.asset_b_id,
            asset_b_min_amount: req.asset_b_min_amount.clone(),
        }
    }
}

impl TxBody for SwapBody {
    const TX_TYPE: TxType = TxType::Swap;

    fn encode(&self, enc: &mut CanonicalEncoder) -> TxResult<()> {
        enc.put_i64(self.pair_index.index())
            .put_i64(self.asset_a_id.index());
        enc.put_amount("asset A amount", &self.asset_a_amount)?
            .put_i64(self.asset_b_id.index());
        enc.put_amount("asset B min amount", &self.asset_b_min_amount)?;
        Ok(())
    }
}
