//! Error types for the TechVault client.

use std::collections::BTreeMap;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("Transport error: {0}")]
    Transport(String),

    /// The session could not be refreshed and has been cleared. Callers
    /// should send the user back to the login entry point.
    #[error("Session expired, please log in again")]
    SessionExpired,

    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    #[error("Permission denied: {reason}")]
    PermissionDenied { reason: String },

    /// 4xx with field-level messages. `fields` holds the server text verbatim.
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        fields: BTreeMap<String, Vec<String>>,
    },

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Not found: {message}")]
    NotFoundMessage { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl VaultError {
    /// Whether this error means the user has to authenticate again.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            VaultError::SessionExpired | VaultError::AuthenticationFailed { .. }
        )
    }

    /// Field-level validation messages, empty for every other variant.
    pub fn field_errors(&self) -> Option<&BTreeMap<String, Vec<String>>> {
        match self {
            VaultError::Validation { fields, .. } => Some(fields),
            _ => None,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        VaultError::Validation {
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }
}

pub type VaultResult<T> = Result<T, VaultError>;
