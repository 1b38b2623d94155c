//! Error types for rollup-txutils.

use rollup_core::CoreError;
use thiserror::Error;

use crate::signer::SignerError;

/// Transaction building errors.
#[derive(Debug, Error)]
pub enum TxError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Signing error: {0}")]
    Signing(#[from] SignerError),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Wire format error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for transaction building.
pub type TxResult<T> = std::result::Result<T, TxError>;
