//! Serde adapters for `0x`-prefixed hex byte strings.

/// Strip an optional `0x` prefix and surrounding whitespace, then decode.
pub fn decode(s: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let trimmed = s.trim();
    hex::decode(trimmed.strip_prefix("0x").unwrap_or(trimmed))
}

/// Encode with a `0x` prefix.
pub fn encode(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// `Option<Vec<u8>>` as `0x`-hex or null. Empty strings decode to `None`.
pub mod bytes_opt {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(bytes) => serializer.serialize_str(&super::encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<u8>>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(s) if !s.trim().is_empty() => {
                super::decode(&s).map(Some).map_err(de::Error::custom)
            }
            _ => Ok(None),
        }
    }
}

/// `[u8; 32]` as `0x`-hex.
pub mod bytes32 {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::encode(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u8; 32], D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = super::decode(&s).map_err(de::Error::custom)?;
        <[u8; 32]>::try_from(bytes.as_slice())
            .map_err(|_| de::Error::custom(format!("expected 32 bytes, got {}", bytes.len())))
    }
}

/// 20-byte L1 `Address` as `0x`-hex.
pub mod address {
    use alloy::primitives::Address;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Address, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::encode(value.as_slice()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Address, D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = super::decode(&s).map_err(de::Error::custom)?;
        if bytes.len() != 20 {
            return Err(de::Error::custom(format!(
                "expected 20-byte address, got {}",
                bytes.len()
            )));
        }
        Ok(Address::from_slice(&bytes))
    }
}
