//! # Body Extraction
//!
//! Reads a request body and decodes it as JSON, mapping every failure to
//! [`ApiError::MalformedRequest`]. The `Content-Type` header is not
//! inspected: any body that decodes as JSON is accepted.

use axum::body::Body;
use serde_json::Value;

use crate::error::ApiError;

/// Collect up to `limit` bytes of `body` and decode them as JSON.
///
/// # Errors
///
/// Returns [`ApiError::MalformedRequest`] if the body cannot be read, is
/// larger than `limit`, is empty, or is not valid JSON.
pub async fn read_json_body(body: Body, limit: usize) -> Result<Value, ApiError> {
    let bytes = axum::body::to_bytes(body, limit)
        .await
        .map_err(|e| ApiError::MalformedRequest(format!("failed to read body: {e}")))?;
    decode_json(&bytes)
}

/// Decode a complete body as JSON.
///
/// # Errors
///
/// Returns [`ApiError::MalformedRequest`] for empty or invalid input.
pub fn decode_json(bytes: &[u8]) -> Result<Value, ApiError> {
    if bytes.is_empty() {
        return Err(ApiError::MalformedRequest("empty body".to_string()));
    }
    serde_json::from_slice(bytes).map_err(|e| ApiError::MalformedRequest(e.to_string()))
}
