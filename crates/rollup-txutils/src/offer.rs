//! Offer signing.
//!
//! An offer is signed on its own, by its owner, long before any match
//! exists. Its canonical form is tagged so that offer bytes can never be
//! mistaken for a transaction:
//! `[0xff][type][offer_id][account_index][nft_index][asset_id][asset_amount]
//! [listed_at][expired_at][treasury_rate]`
//!
//! The signed form handed between parties is the offer's JSON with `Sig`.

use rollup_core::Offer;
use tracing::debug;

use crate::encoding::CanonicalEncoder;
use crate::error::{TxError, TxResult};
use crate::signer::{parse_signature, KeySigner};

/// Leading byte of every canonical offer. Transaction codes stay below it.
pub const OFFER_TAG: u8 = 0xff;

/// Canonical bytes of `offer`, excluding its signature.
pub fn encode_offer(offer: &Offer) -> TxResult<Vec<u8>> {
    let mut enc = CanonicalEncoder::new();
    enc.put_u8(OFFER_TAG)
        .put_i64(offer.offer_type.code())
        .put_i64(offer.offer_id)
        .put_i64(offer.account_index.index())
        .put_i64(offer.nft_index.index())
        .put_i64(offer.asset_id.index());
    enc.put_amount("offer asset amount", &offer.asset_amount)?;
    enc.put_i64(offer.listed_at)
        .put_i64(offer.expired_at)
        .put_i64(offer.treasury_rate);
    Ok(enc.finish())
}

/// Append a signed offer to an outer encoding: canonical bytes, then the
/// length-prefixed signature.
pub fn encode_signed_offer(offer: &Offer, enc: &mut CanonicalEncoder) -> TxResult<()> {
    let sig = offer.sig.as_deref().ok_or_else(|| {
        TxError::Encoding(format!(
            "{} offer {} has no signature to embed",
            offer.offer_type, offer.offer_id
        ))
    })?;
    enc.put_raw(&encode_offer(offer)?);
    enc.put_signature(sig)?;
    Ok(())
}

/// Validate and sign `offer`, replacing any existing signature.
pub fn sign_offer(key: &dyn KeySigner, offer: &Offer) -> TxResult<Offer> {
    offer.validate()?;
    let payload = encode_offer(offer)?;
    let mut signed = offer.clone();
    signed.sig = Some(key.sign(&payload)?);
    debug!(
        offer_id = offer.offer_id,
        offer_type = %offer.offer_type,
        nft_index = %offer.nft_index,
        "Signed offer"
    );
    Ok(signed)
}

/// Sign `offer` and return its transferable signed form.
pub fn build_offer(key: &dyn KeySigner, offer: &Offer) -> TxResult<String> {
    let signed = sign_offer(key, offer)?;
    Ok(serde_json::to_string(&signed)?)
}

/// Re-hydrate a signed offer produced by [`build_offer`].
///
/// Fields are validated and the signature is checked structurally; it is not
/// verified against the owner's registered key.
pub fn parse_signed_offer(signed: &str) -> TxResult<Offer> {
    let offer: Offer = serde_json::from_str(signed)?;
    offer.validate()?;
    offer.ensure_signed()?;
    if let Some(sig) = &offer.sig {
        parse_signature(sig)?;
    }
    Ok(offer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signer::recover_signer;
    use crate::test_support::{buy_offer, test_key, T};
    use rollup_core::{CoreError, OfferType};

    #[test]
    fn test_round_trip_reproduces_fields() {
        let key = test_key();
        let offer = buy_offer(5, 3);
        let signed = build_offer(&key, &offer).unwrap();
        let parsed = parse_signed_offer(&signed).unwrap();

        let mut unsigned = parsed.clone();
        unsigned.sig = None;
        assert_eq!(unsigned, offer);
        assert_eq!(parsed.sig.as_ref().map(Vec::len), Some(65));
    }

    #[test]
    fn test_signature_covers_canonical_bytes() {
        let key = test_key();
        let signed = sign_offer(&key, &buy_offer(5, 3)).unwrap();
        let payload = encode_offer(&signed).unwrap();
        let sig = signed.sig.as_deref().unwrap();
        assert_eq!(recover_signer(&payload, sig).unwrap(), key.address());
    }

    #[test]
    fn test_expiry_not_after_listing_is_rejected() {
        let key = test_key();
        let mut offer = buy_offer(5, 3);
        offer.expired_at = offer.listed_at;
        assert!(matches!(
            build_offer(&key, &offer),
            Err(TxError::Core(CoreError::InvalidRequest(_)))
        ));
    }

    #[test]
    fn test_deterministic() {
        let key = test_key();
        let offer = buy_offer(5, 3);
        assert_eq!(
            build_offer(&key, &offer).unwrap(),
            build_offer(&key, &offer).unwrap()
        );
    }

    #[test]
    fn test_layout() {
        let mut offer = buy_offer(5, 3);
        offer.offer_type = OfferType::Sell;
        let bytes = encode_offer(&offer).unwrap();
        assert_eq!(bytes.len(), 1 + 8 * 5 + 32 + 8 * 3);
        assert_eq!(bytes[0], OFFER_TAG);
        assert_eq!(&bytes[1..9], &1i64.to_be_bytes());
        assert_eq!(&bytes[bytes.len() - 24..bytes.len() - 16], &T.to_be_bytes());
    }

    #[test]
    fn test_parse_rejects_unsigned_and_garbage() {
        let unsigned = serde_json::to_string(&buy_offer(5, 3)).unwrap();
        assert!(parse_signed_offer(&unsigned).is_err());
        assert!(matches!(
            parse_signed_offer("not json"),
            Err(TxError::Json(_))
        ));
    }
}
