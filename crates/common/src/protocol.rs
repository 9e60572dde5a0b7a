//! Request and response types exchanged with HTTP clients.
//!
//! Keys travel base64-encoded; encrypted payloads travel in the
//! `base64(iv)::base64(ciphertext)` wire format.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Query-string endpoints (`POST /encrypt`, `POST /decrypt`)
// ---------------------------------------------------------------------------

/// Query parameters for `POST /encrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptParams {
    /// Base64-encoded AES key (16, 24 or 32 bytes once decoded).
    pub key: String,
    /// Plaintext to encrypt, taken verbatim.
    pub data: String,
}

/// Query parameters for `POST /decrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecryptParams {
    /// Wire message produced by an earlier encrypt call.
    pub data_encrypted: String,
    /// Base64-encoded AES key.
    pub key: String,
}

// ---------------------------------------------------------------------------
// JSON-body endpoints (`POST /api/encrypt`, `POST /api/decrypt`)
// ---------------------------------------------------------------------------

/// Request body for `POST /api/encrypt`.
///
/// `data` must be either a JSON string (encrypted as-is) or a JSON object
/// (serialised to canonical JSON text before encryption).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptRequest {
    /// Base64-encoded AES key.
    pub key: String,
    /// String or object to encrypt.
    pub data: serde_json::Value,
}

/// Successful response body for `POST /api/encrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptResponse {
    /// Wire message: `base64(iv)::base64(ciphertext)`.
    pub data: String,
}

/// Request body for `POST /api/decrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecryptRequest {
    /// Base64-encoded AES key.
    pub key: String,
    /// Wire message to decrypt.
    pub data_encrypted: String,
}

/// Successful response body for `POST /api/decrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecryptResponse {
    /// Decrypted text parsed as JSON.
    pub payload: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"invalid_key"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&crate::ServiceError> for ErrorResponse {
    fn from(err: &crate::ServiceError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status, always `"ok"` while the process is serving.
    pub status: String,
    /// Crate version of the running binary.
    pub version: String,
}
