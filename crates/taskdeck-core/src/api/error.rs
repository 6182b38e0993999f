//! API error handling
//!
//! Typed errors for the HTTP/API layer. `Unauthorized` is special: the
//! client has already torn the session down by the time a caller sees it,
//! so callers must not try to recover locally.

use thiserror::Error;

/// Errors that can occur talking to the backend
#[derive(Error, Debug)]
pub enum ApiError {
    /// The server rejected our credentials (HTTP 401)
    ///
    /// The session store has been cleared and a `SessionExpired` event
    /// emitted before this error is returned.
    #[error("Unauthorized: the session has expired, log in again")]
    Unauthorized,

    /// Any other non-success response
    #[error("Request failed with status {status}: {body}")]
    RequestFailed {
        status: u16,
        /// Raw response body text
        body: String,
    },

    /// Client-side validation failure, raised before any request is sent
    #[error("{0}")]
    Validation(String),

    /// The session store could not be read or written
    ///
    /// The server call (if any) succeeded; only the local persistence
    /// failed.
    #[error("Session storage error: {0}")]
    Session(String),

    /// Network-level failure (unreachable host, connection reset, ...)
    ///
    /// Callers treat this the same as `RequestFailed`: surface and move on.
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not the JSON shape we expected
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Whether this error means the session is gone
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
