//! Network-assigned identifiers.
//!
//! Every id on the rollup is a signed 64-bit integer on the wire. The
//! newtypes keep account, asset, NFT and pair indices from being mixed up
//! at call sites; they serialize as the bare integer.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! index_newtype {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl $name {
            pub fn new(id: i64) -> Self {
                Self(id)
            }

            pub fn index(&self) -> i64 {
                self.0
            }

            /// Reject negative ids before they reach the encoder.
            pub fn ensure_valid(&self) -> Result<()> {
                if self.0 < 0 {
                    return Err(CoreError::invalid(format!(
                        "{} must be non-negative, got {}",
                        $label, self.0
                    )));
                }
                Ok(())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }
    };
}

index_newtype!(
    /// Stable account index assigned by the rollup at registration.
    AccountIndex,
    "account index"
);

index_newtype!(
    /// Fungible asset identifier. Asset 0 is the native gas asset.
    AssetId,
    "asset id"
);

index_newtype!(
    /// Global NFT index.
    NftIndex,
    "nft index"
);

index_newtype!(
    /// Liquidity pool (trading pair) index.
    PairIndex,
    "pair index"
);

/// Reject a negative plain integer field (offer ids, collection ids, rates).
pub fn ensure_non_negative(field: &str, value: i64) -> Result<()> {
    if value < 0 {
        return Err(CoreError::invalid(format!(
            "{field} must be non-negative, got {value}"
        )));
    }
    Ok(())
}

/// Reject an empty or whitespace-only required string.
pub fn ensure_not_blank(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CoreError::invalid(format!("{field} must not be empty")));
    }
    Ok(())
}
