//! Common error types shared across crates.

use thiserror::Error;

/// Top-level service error type.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::BadRequest`] → 400
/// - [`ServiceError::InvalidKey`] → 400
/// - [`ServiceError::DecryptionFailed`] → 422
/// - [`ServiceError::Internal`] → 500
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request was malformed: missing parameter or unsupported data type.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The supplied key is not valid base64 or has an unsupported length.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// The payload could not be decrypted.
    ///
    /// Deliberately carries no detail: malformed messages, wrong keys, padding
    /// and encoding failures must be indistinguishable to the caller.
    #[error("unable to decrypt payload")]
    DecryptionFailed,

    /// An unexpected internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::InvalidKey(_) => 400,
            ServiceError::DecryptionFailed => 422,
            ServiceError::Internal(_) => 500,
        }
    }

    /// Short machine-readable error code used in [`crate::protocol::ErrorResponse`].
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::BadRequest(_) => "bad_request",
            ServiceError::InvalidKey(_) => "invalid_key",
            ServiceError::DecryptionFailed => "decryption_failed",
            ServiceError::Internal(_) => "internal_error",
        }
    }
}
