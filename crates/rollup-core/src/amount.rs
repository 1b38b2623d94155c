//! Arbitrary-precision asset amounts.
//!
//! Amounts are `BigInt` so that a caller-supplied negative value can be
//! represented and rejected by validation instead of wrapping silently. On
//! the wire they travel as decimal strings; in the canonical encoding they
//! occupy a fixed 32-byte big-endian slot.

use crate::error::{CoreError, Result};
use num_bigint::{BigInt, Sign};

/// Width of an encoded amount in bytes.
pub const AMOUNT_BYTES: usize = 32;

/// Reject negative amounts and amounts wider than 256 bits.
pub fn ensure_amount(field: &str, value: &BigInt) -> Result<()> {
    if value.sign() == Sign::Minus {
        return Err(CoreError::InvalidRequest(format!(
            "{field} must be non-negative, got {value}"
        )));
    }
    if value.bits() > (AMOUNT_BYTES as u64) * 8 {
        return Err(CoreError::InvalidRequest(format!(
            "{field} exceeds 256 bits"
        )));
    }
    Ok(())
}

/// Big-endian 32-byte representation. `None` for negative or oversized values.
pub fn to_be_bytes32(value: &BigInt) -> Option<[u8; AMOUNT_BYTES]> {
    let (sign, bytes) = value.to_bytes_be();
    if sign == Sign::Minus || bytes.len() > AMOUNT_BYTES {
        return None;
    }
    let mut out = [0u8; AMOUNT_BYTES];
    out[AMOUNT_BYTES - bytes.len()..].copy_from_slice(&bytes);
    Some(out)
}

/// Serde adapter: `BigInt` as a decimal string (integers are accepted on input).
pub mod serde_str {
    use num_bigint::BigInt;
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(value: &BigInt, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigInt, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }

    struct AmountVisitor;

    impl<'de> Visitor<'de> for AmountVisitor {
        type Value = BigInt;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a decimal integer string or integer")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<BigInt, E> {
            v.trim()
                .parse::<BigInt>()
                .map_err(|e| E::custom(format!("invalid amount {v:?}: {e}")))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<BigInt, E> {
            Ok(BigInt::from(v))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<BigInt, E> {
            Ok(BigInt::from(v))
        }
    }
}
