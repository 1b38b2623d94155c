//! Error types for rollup-core.

use thiserror::Error;

/// Core error types.
///
/// Raised before any network or signing work happens, so a caller seeing one
/// of these knows nothing left the process.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Mismatched offers: {field} differs (buy={buy}, sell={sell})")]
    MismatchedOffer {
        field: &'static str,
        buy: i64,
        sell: i64,
    },

    #[error("Offer {offer_id} expired: expired_at={expired_at} <= now={now_ms}")]
    ExpiredOffer {
        offer_id: i64,
        expired_at: i64,
        now_ms: i64,
    },
}

impl CoreError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
