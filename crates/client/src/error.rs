//! Client-wide error types.

use thiserror::Error;

use crate::session::StorageError;

/// Client-wide result type.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors surfaced by the gateway and the resource clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The access credential was rejected and could not be recovered for
    /// this request (replayed request failed again, or no session exists).
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// The renewal exchange failed. The session has already been torn down
    /// and the caller must re-authenticate.
    #[error("Session expired - re-login required")]
    SessionExpired,

    /// The server rejected the operation (validation, not-found, conflict, ...).
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Transport-level failure.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A network call exceeded its deadline.
    #[error("Request timed out")]
    Timeout,

    /// Response body could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Session persistence failure.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The request could not be constructed (bad base URL, malformed token,
    /// unencodable body).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Check if this error is an authentication failure (recoverable via renewal
    /// when seen on a first attempt).
    #[inline]
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// Check if this error means the user has to log in again.
    pub fn requires_relogin(&self) -> bool {
        matches!(self, Self::Unauthorized(_) | Self::SessionExpired)
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized(_) => Some(401),
            Self::Api { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
