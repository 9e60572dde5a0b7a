//! Axum request handlers for all service endpoints.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use common::{
    protocol::{
        DecryptParams, DecryptRequest, DecryptResponse, EncryptParams, EncryptRequest,
        EncryptResponse, ErrorResponse, HealthResponse,
    },
    ServiceError,
};
use serde_json::Value;
use tracing::{debug, error, warn};

use super::state::AppState;
use crate::crypto::{cipher, CipherKey, Plaintext};

/// [`ServiceError`] rendered as a JSON [`ErrorResponse`] with the matching status.
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorResponse::from(&self.0))).into_response()
    }
}

/// `POST /encrypt?key=..&data=..`: encrypt `data` verbatim.
///
/// Responds with the wire message as a JSON string.
pub async fn encrypt_query(Query(params): Query<EncryptParams>) -> Result<Json<String>, ApiError> {
    let wire = seal(&params.key, &Plaintext::Text(params.data))?;
    Ok(Json(wire))
}

/// `POST /decrypt?data_encrypted=..&key=..`: decrypt and parse as JSON.
///
/// Responds with the decoded JSON value, or the literal `false` on any failure.
pub async fn decrypt_query(Query(params): Query<DecryptParams>) -> Json<Value> {
    match open(&params.key, &params.data_encrypted) {
        Ok(value) => Json(value),
        Err(_) => Json(Value::Bool(false)),
    }
}

/// `POST /api/encrypt`: encrypt a JSON string or object.
pub async fn encrypt_json(
    Json(req): Json<EncryptRequest>,
) -> Result<Json<EncryptResponse>, ApiError> {
    let plaintext = Plaintext::try_from(req.data).map_err(|_| {
        ServiceError::BadRequest("data must be a string or an object".into())
    })?;
    let data = seal(&req.key, &plaintext)?;
    Ok(Json(EncryptResponse { data }))
}

/// `POST /api/decrypt`: decrypt and parse as JSON.
///
/// Every failure maps to the same `422 decryption_failed` response.
pub async fn decrypt_json(
    Json(req): Json<DecryptRequest>,
) -> Result<Json<DecryptResponse>, ApiError> {
    let payload = open(&req.key, &req.data_encrypted)?;
    Ok(Json(DecryptResponse { payload }))
}

/// `GET /`: serve the web client's `index.html`.
pub async fn index(State(state): State<AppState>) -> Response {
    let path = state.web_dir.join("index.html");
    match tokio::fs::read_to_string(&path).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "index.html unavailable");
            not_found().await.into_response()
        }
    }
}

/// `GET /health`: liveness check.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

// ---------------------------------------------------------------------------
// Codec boundary
// ---------------------------------------------------------------------------

/// Encrypt `plaintext` under a base64 key, returning the wire string.
///
/// Key problems surface distinctly: key validity does not depend on any secret.
fn seal(key_b64: &str, plaintext: &Plaintext) -> Result<String, ServiceError> {
    let key = CipherKey::from_base64(key_b64)
        .map_err(|e| ServiceError::InvalidKey(e.to_string()))?;
    let wire = cipher::encrypt(&key, plaintext).map_err(|e| {
        error!(kind = e.kind(), "encryption failed");
        ServiceError::Internal("encryption failed".into())
    })?;
    debug!(key_size = ?key.size(), ciphertext_len = wire.ciphertext.len(), "payload encrypted");
    Ok(wire.to_string())
}

/// Decrypt a wire string under a base64 key and parse the plaintext as JSON.
///
/// Every failure collapses to [`ServiceError::DecryptionFailed`]; the precise
/// kind is only visible in debug logs.
fn open(key_b64: &str, message: &str) -> Result<Value, ServiceError> {
    let text = CipherKey::from_base64(key_b64)
        .and_then(|key| cipher::decrypt(&key, message))
        .map_err(|e| {
            debug!(kind = e.kind(), "decryption rejected");
            ServiceError::DecryptionFailed
        })?;
    serde_json::from_str(&text).map_err(|_| {
        debug!(kind = "structure_invalid", "decryption rejected");
        ServiceError::DecryptionFailed
    })
}
