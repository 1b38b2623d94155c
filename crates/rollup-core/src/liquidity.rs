//! Liquidity-pool share arithmetic.

use crate::account::TradingPair;
use crate::error::{CoreError, Result};
use num_bigint::{BigInt, Sign};

/// LP shares minted by the first deposit into an empty pool: `floor(sqrt(a * b))`.
pub fn compute_empty_lp_amount(asset_a_amount: &BigInt, asset_b_amount: &BigInt) -> Result<BigInt> {
    if asset_a_amount.sign() == Sign::Minus || asset_b_amount.sign() == Sign::Minus {
        return Err(CoreError::invalid(
            "liquidity amounts must be non-negative",
        ));
    }
    Ok((asset_a_amount * asset_b_amount).sqrt())
}

/// LP shares for adding `asset_a_amount` to a funded pool, proportional to
/// the pool's asset-A reserve.
pub fn compute_lp_amount(pair: &TradingPair, asset_a_amount: &BigInt) -> Result<BigInt> {
    if asset_a_amount.sign() == Sign::Minus {
        return Err(CoreError::invalid("asset A amount must be non-negative"));
    }
    if pair.asset_a_amount.sign() != Sign::Plus {
        return Err(CoreError::invalid(format!(
            "pair {} has no asset A reserve",
            pair.pair_index
        )));
    }
    Ok(asset_a_amount * &pair.total_lp_amount / &pair.asset_a_amount)
}

/// Pick the right formula for the pool's state.
pub fn lp_amount_for(
    pair: &TradingPair,
    asset_a_amount: &BigInt,
    asset_b_amount: &BigInt,
) -> Result<BigInt> {
    if pair.total_lp_amount.sign() == Sign::NoSign {
        compute_empty_lp_amount(asset_a_amount, asset_b_amount)
    } else {
        compute_lp_amount(pair, asset_a_amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AssetId, PairIndex};

    fn pair(a: i64, b: i64, lp: i64) -> TradingPair {
        TradingPair {
            pair_index: PairIndex::new(0),
            asset_a_id: AssetId::new(0),
            asset_a_amount: BigInt::from(a),
            asset_b_id: AssetId::new(2),
            asset_b_amount: BigInt::from(b),
            fee_rate: 30,
            treasury_rate: 10,
            total_lp_amount: BigInt::from(lp),
        }
    }

    #[test]
    fn test_empty_pool_uses_geometric_mean() {
        let lp = compute_empty_lp_amount(&BigInt::from(100_000), &BigInt::from(1_000_000)).unwrap();
        // floor(sqrt(1e11)) = 316227
        assert_eq!(lp, BigInt::from(316_227));
        assert!(compute_empty_lp_amount(&BigInt::from(-1), &BigInt::from(1)).is_err());
    }

    #[test]
    fn test_funded_pool_is_proportional() {
        let p = pair(1_000, 4_000, 2_000);
        assert_eq!(compute_lp_amount(&p, &BigInt::from(100)).unwrap(), BigInt::from(200));
        assert_eq!(
            lp_amount_for(&p, &BigInt::from(100), &BigInt::from(400)).unwrap(),
            BigInt::from(200)
        );
    }

    #[test]
    fn test_lp_amount_for_empty_pool() {
        let p = pair(0, 0, 0);
        assert_eq!(
            lp_amount_for(&p, &BigInt::from(4), &BigInt::from(9)).unwrap(),
            BigInt::from(6)
        );
        assert!(compute_lp_amount(&p, &BigInt::from(4)).is_err());
    }
}
