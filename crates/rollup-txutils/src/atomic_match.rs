//! Atomic match: settle a signed buy offer against a signed sell offer.
//!
//! The two offers are embedded by value, each followed by its owner's
//! signature, and the whole transaction is signed by the matcher. Offer
//! signatures are checked for shape only; whether they belong to the
//! offering accounts is decided by the network.

use num_bigint::BigInt;
use rollup_core::amount::serde_str;
use rollup_core::{AtomicMatchTxReq, Offer, ResolvedOpts, TxRequest, TxType};
use serde::{Deserialize, Serialize};

use crate::builder::{build_tx, SignedTx};
use crate::encoding::CanonicalEncoder;
use crate::envelope::TxBody;
use crate::error::{TxError, TxResult};
use crate::offer::encode_signed_offer;
use crate::signer::{parse_signature, KeySigner};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AtomicMatchBody {
    pub buy_offer: Offer,
    pub sell_offer: Offer,
    #[serde(with = "serde_str")]
    pub treasury_amount: BigInt,
}

impl AtomicMatchBody {
    pub fn from_request(req: &AtomicMatchTxReq) -> Self {
        Self {
            buy_offer: req.buy_offer.clone(),
            sell_offer: req.sell_offer.clone(),
            treasury_amount: req.treasury_amount.clone(),
        }
    }
}

impl TxBody for AtomicMatchBody {
    const TX_TYPE: TxType = TxType::AtomicMatch;

    fn validate(&self) -> TxResult<()> {
        for offer in [&self.buy_offer, &self.sell_offer] {
            let sig = offer.sig.as_deref().ok_or_else(|| {
                TxError::Encoding(format!("{} offer {} is not signed", offer.offer_type, offer.offer_id))
            })?;
            parse_signature(sig)?;
        }
        Ok(())
    }

    fn encode(&self, enc: &mut CanonicalEncoder) -> TxResult<()> {
        encode_signed_offer(&self.buy_offer, enc)?;
        encode_signed_offer(&self.sell_offer, enc)?;
        enc.put_amount("treasury amount", &self.treasury_amount)?;
        Ok(())
    }
}

/// Build and sign an atomic match with the matcher's key.
///
/// Preconditions are checked against `now_ms` before anything is encoded:
/// matching NFT and asset (`MismatchedOffer`), both offers unexpired
/// (`ExpiredOffer`), both signatures present.
pub fn build_atomic_match(
    matcher_key: &dyn KeySigner,
    buy_offer: &Offer,
    sell_offer: &Offer,
    treasury_amount: BigInt,
    opts: &ResolvedOpts,
    now_ms: i64,
) -> TxResult<SignedTx> {
    let req = TxRequest::AtomicMatch(AtomicMatchTxReq {
        buy_offer: buy_offer.clone(),
        sell_offer: sell_offer.clone(),
        treasury_amount,
    });
    build_tx(matcher_key, &req, opts, now_ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::TxEnvelope;
    use crate::offer::sign_offer;
    use crate::signer::{recover_signer, KeyManager};
    use crate::test_support::{buy_offer, resolved_opts, sell_offer, test_key, T};
    use rollup_core::{AssetId, CoreError};

    fn buyer() -> KeyManager {
        KeyManager::from_seed("0x01").unwrap()
    }

    fn seller() -> KeyManager {
        KeyManager::from_seed("0x02").unwrap()
    }

    fn signed_pair(sell_nft: i64) -> (Offer, Offer) {
        let buy = sign_offer(&buyer(), &buy_offer(5, 3)).unwrap();
        let sell = sign_offer(&seller(), &sell_offer(9, sell_nft)).unwrap();
        (buy, sell)
    }

    #[test]
    fn test_matching_offers_settle() {
        let (buy, sell) = signed_pair(3);
        let matcher = test_key();
        let opts = resolved_opts();
        let signed =
            build_atomic_match(&matcher, &buy, &sell, BigInt::from(5000), &opts, T + 1).unwrap();

        assert_eq!(signed.tx_type, TxType::AtomicMatch);
        let env: TxEnvelope<AtomicMatchBody> = serde_json::from_str(&signed.tx_info).unwrap();
        assert_eq!(env.body.buy_offer.offer_id, 5);
        assert_eq!(env.body.sell_offer.offer_id, 9);
        assert_eq!(env.body.treasury_amount, BigInt::from(5000));

        // The outer signature belongs to the matcher, not to either offer owner.
        let payload = env.canonical_encode().unwrap();
        let signer = recover_signer(&payload, env.sig().unwrap()).unwrap();
        assert_eq!(signer, matcher.address());
        assert_ne!(signer, buyer().address());
        assert_ne!(signer, seller().address());
    }

    #[test]
    fn test_nft_mismatch_is_rejected() {
        let (buy, sell) = signed_pair(4);
        let err = build_atomic_match(
            &test_key(),
            &buy,
            &sell,
            BigInt::from(5000),
            &resolved_opts(),
            T + 1,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            TxError::Core(CoreError::MismatchedOffer {
                field: "nft index",
                buy: 3,
                sell: 4
            })
        ));
    }

    #[test]
    fn test_asset_mismatch_is_rejected() {
        let buy = sign_offer(&buyer(), &buy_offer(5, 3)).unwrap();
        let mut sell = sell_offer(9, 3);
        sell.asset_id = AssetId::new(1);
        let sell = sign_offer(&seller(), &sell).unwrap();
        let err = build_atomic_match(
            &test_key(),
            &buy,
            &sell,
            BigInt::from(0),
            &resolved_opts(),
            T + 1,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            TxError::Core(CoreError::MismatchedOffer { field: "asset id", .. })
        ));
    }

    #[test]
    fn test_expired_buy_offer_is_rejected() {
        let (buy, sell) = signed_pair(3);
        let err = build_atomic_match(
            &test_key(),
            &buy,
            &sell,
            BigInt::from(5000),
            &resolved_opts(),
            buy.expired_at + 1,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            TxError::Core(CoreError::ExpiredOffer { offer_id: 5, .. })
        ));
    }

    #[test]
    fn test_expired_sell_offer_is_rejected() {
        let buy = sign_offer(&buyer(), &buy_offer(5, 3)).unwrap();
        let mut sell = sell_offer(9, 3);
        sell.expired_at = T + 5;
        let sell = sign_offer(&seller(), &sell).unwrap();
        let err = build_atomic_match(
            &test_key(),
            &buy,
            &sell,
            BigInt::from(5000),
            &resolved_opts(),
            T + 10,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            TxError::Core(CoreError::ExpiredOffer {
                offer_id: 9,
                expired_at,
                now_ms,
            }) if expired_at == T + 5 && now_ms == T + 10
        ));
    }

    #[test]
    fn test_garbage_signature_is_rejected() {
        let (buy, mut sell) = signed_pair(3);
        // right length, but no valid recovery id
        let mut sig = sell.sig.clone().unwrap();
        sig[64] = 5;
        sell.sig = Some(sig);
        assert!(build_atomic_match(
            &test_key(),
            &buy,
            &sell,
            BigInt::from(5000),
            &resolved_opts(),
            T + 1,
        )
        .is_err());
    }

    #[test]
    fn test_encoding_embeds_both_signatures() {
        let (buy, sell) = signed_pair(3);
        let opts = resolved_opts();
        let env = TxEnvelope::new(
            AtomicMatchBody {
                buy_offer: buy.clone(),
                sell_offer: sell.clone(),
                treasury_amount: BigInt::from(5000),
            },
            &opts,
        );
        let bytes = env.canonical_encode().unwrap();
        let offer_len = 1 + 8 * 5 + 32 + 8 * 3;
        let buy_sig_at = 9 + offer_len;
        assert_eq!(&bytes[buy_sig_at..buy_sig_at + 2], &[0, 65]);
        assert_eq!(
            &bytes[buy_sig_at + 2..buy_sig_at + 67],
            buy.sig.as_deref().unwrap()
        );
        assert_eq!(bytes[buy_sig_at + 67], 0xff, "sell offer starts with its tag");
    }
}
