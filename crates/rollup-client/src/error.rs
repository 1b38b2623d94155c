//! Caller-facing error taxonomy.

use rollup_core::CoreError;
use rollup_remote::RemoteError;
use rollup_txutils::{KeyError, SignerError, TxError};
use thiserror::Error;

/// Every public operation fails with exactly one of these, from the first
/// stage that failed. Nothing is submitted after an error.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Malformed or out-of-range request fields. Raised before any network
    /// or signing work.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A lookup needed to fill defaults failed.
    #[error("Resolution error ({context}): {source}")]
    Resolution {
        context: String,
        #[source]
        source: RemoteError,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Offer {offer_id} expired: expired_at={expired_at} <= now={now_ms}")]
    ExpiredOffer {
        offer_id: i64,
        expired_at: i64,
        now_ms: i64,
    },

    #[error("Mismatched offers: {field} differs (buy={buy}, sell={sell})")]
    MismatchedOffer {
        field: &'static str,
        buy: i64,
        sell: i64,
    },

    #[error("Signing error: {0}")]
    Signing(String),

    /// The endpoint refused the transaction; `message` is the remote's own.
    #[error("Submission failed: {message}")]
    Submission { code: Option<i64>, message: String },

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Wrap a failed lookup. A missing entity stays `NotFound`.
    pub fn resolution(context: impl Into<String>, err: RemoteError) -> Self {
        match err {
            RemoteError::NotFound(what) => Self::NotFound(what),
            source => Self::Resolution {
                context: context.into(),
                source,
            },
        }
    }

    /// Wrap a failed submission, keeping the remote message verbatim.
    pub fn submission(err: RemoteError) -> Self {
        match err {
            RemoteError::Api { code, message } => Self::Submission {
                code: Some(code),
                message,
            },
            other => Self::Submission {
                code: None,
                message: other.to_string(),
            },
        }
    }
}

impl From<CoreError> for ClientError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidRequest(msg) => Self::Validation(msg),
            CoreError::MismatchedOffer { field, buy, sell } => {
                Self::MismatchedOffer { field, buy, sell }
            }
            CoreError::ExpiredOffer {
                offer_id,
                expired_at,
                now_ms,
            } => Self::ExpiredOffer {
                offer_id,
                expired_at,
                now_ms,
            },
        }
    }
}

impl From<TxError> for ClientError {
    fn from(err: TxError) -> Self {
        match err {
            TxError::Core(e) => e.into(),
            TxError::Signing(e) => e.into(),
            TxError::Encoding(msg) => Self::Encoding(msg),
            TxError::Json(e) => Self::Encoding(e.to_string()),
        }
    }
}

impl From<SignerError> for ClientError {
    fn from(err: SignerError) -> Self {
        match err {
            // A malformed embedded signature is a bad request, not a local signing failure.
            SignerError::MalformedSignature(msg) => Self::Validation(msg),
            other => Self::Signing(other.to_string()),
        }
    }
}

impl From<KeyError> for ClientError {
    fn from(err: KeyError) -> Self {
        Self::Signing(format!("key unavailable: {err}"))
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_survives_resolution_wrapping() {
        let err = ClientError::resolution(
            "destination",
            RemoteError::NotFound("account name nobody.legend".to_string()),
        );
        assert!(matches!(err, ClientError::NotFound(_)));

        let err = ClientError::resolution("nonce", RemoteError::HttpClient("timeout".to_string()));
        assert!(matches!(err, ClientError::Resolution { .. }));
        assert!(err.to_string().contains("nonce"));
    }

    #[test]
    fn test_submission_message_is_verbatim() {
        let err = ClientError::submission(RemoteError::Api {
            code: 21,
            message: "invalid nonce, expected 8".to_string(),
        });
        assert_eq!(err.to_string(), "Submission failed: invalid nonce, expected 8");
    }

    #[test]
    fn test_core_errors_map_to_taxonomy() {
        let err: ClientError = TxError::Core(CoreError::InvalidRequest("bad".to_string())).into();
        assert!(matches!(err, ClientError::Validation(_)));

        let err: ClientError = CoreError::MismatchedOffer {
            field: "nft index",
            buy: 3,
            sell: 4,
        }
        .into();
        assert!(matches!(err, ClientError::MismatchedOffer { buy: 3, sell: 4, .. }));
    }
}
