//! Remote collaborator error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// The endpoint rejected the request; `message` is passed through verbatim.
    #[error("API error {code}: {message}")]
    Api { code: i64, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type RemoteResult<T> = Result<T, RemoteError>;
