//! Error types for the pet API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers assert deletion by
//! fetching a pet and expecting it to be gone. It is only produced by a 404 on
//! fetch; a 404 from any other operation lands in `HttpError` with the raw
//! status code and body like every other non-2xx response.

use thiserror::Error;

/// Result type returned by every client operation.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors returned by `PetClient` parse methods and `PetApi` operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response: connection refused, timeout,
    /// DNS or TLS failure.
    #[error("transport failed: {0}")]
    Transport(String),

    /// A fetch returned 404. The requested pet does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The client configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ApiError {
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound)
    }

    /// HTTP status carried by the error, if a response was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound => Some(404),
            ApiError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Short name of the variant, used in verification diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Transport(_) => "Transport",
            ApiError::NotFound => "NotFound",
            ApiError::HttpError { .. } => "HttpError",
            ApiError::DeserializationError(_) => "DeserializationError",
            ApiError::SerializationError(_) => "SerializationError",
            ApiError::InvalidConfig(_) => "InvalidConfig",
        }
    }
}
