//! Client-specific error types and conversions.

use techvault_core::error::VaultError;

/// Errors raised by the client's own dependencies before they are
/// folded into [`VaultError`].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(#[from] figment::Error),
}

impl From<ClientError> for VaultError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Http(e) if e.is_decode() => VaultError::Decode(e.to_string()),
            ClientError::Http(e) => VaultError::Transport(e.to_string()),
            ClientError::Io(e) => VaultError::Storage(e.to_string()),
            ClientError::Json(e) => VaultError::Decode(e.to_string()),
            ClientError::Config(e) => VaultError::Config(e.to_string()),
        }
    }
}
