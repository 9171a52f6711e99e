//! # Error Envelope
//!
//! The three client-visible failures of a validated handler and their
//! mapping to HTTP responses. Every body has the shape
//! `{"error": <text>, "errors"?: {<field>: [<message>, ...]}}`.
//! Internal reasons are logged, never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use jsonguard_schema::FieldErrorMap;
use serde::Serialize;
use thiserror::Error;

/// JSON body of every failure response.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    /// Fixed human-readable description of the failure kind.
    pub error: String,
    /// Field-keyed violation messages, present only for schema violations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrorMap>,
}

/// Failure raised by the validating wrapper itself.
///
/// Errors returned by the wrapped handler never pass through this type.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Body missing, empty, unreadable, or not JSON (400).
    ///
    /// The payload is the decoder's reason, kept for logs only.
    #[error("Request is malformed; could not decode JSON object.")]
    MalformedRequest(String),

    /// Request body or handler result violates its schema (400).
    #[error("Request is invalid; There are validation errors.")]
    SchemaViolation(FieldErrorMap),

    /// Handler result cannot be represented as JSON (500).
    ///
    /// The payload is the encoder's reason, kept for logs only.
    #[error("Response is malformed; could not encode JSON object.")]
    UnserializableResponse(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MalformedRequest(_) | Self::SchemaViolation(_) => StatusCode::BAD_REQUEST,
            Self::UnserializableResponse(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The wire envelope for this error.
    pub fn envelope(&self) -> ErrorEnvelope {
        let errors = match self {
            Self::SchemaViolation(errors) => Some(errors.clone()),
            _ => None,
        };
        ErrorEnvelope {
            error: self.to_string(),
            errors,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::MalformedRequest(reason) => {
                tracing::debug!(%reason, "rejecting malformed request body");
            }
            Self::SchemaViolation(errors) => {
                tracing::debug!(fields = errors.len(), "rejecting schema violation");
            }
            Self::UnserializableResponse(reason) => {
                tracing::error!(%reason, "handler returned data that cannot be encoded as JSON");
            }
        }

        (self.status(), Json(self.envelope())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::CONTENT_TYPE;
    use http_body_util::BodyExt;
    use serde_json::Value;

    async fn response_parts(err: ApiError) -> (StatusCode, Option<String>, Value) {
        let response = err.into_response();
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, content_type, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn status_codes() {
        assert_eq!(ApiError::MalformedRequest("eof".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::SchemaViolation(FieldErrorMap::new()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::UnserializableResponse("key must be a string".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn envelope_omits_errors_when_absent() {
        let json = serde_json::to_string(&ApiError::MalformedRequest("eof".into()).envelope()).unwrap();
        assert_eq!(json, r#"{"error":"Request is malformed; could not decode JSON object."}"#);
    }

    #[tokio::test]
    async fn malformed_request_body() {
        let (status, content_type, body) =
            response_parts(ApiError::MalformedRequest("expected value at line 1".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        assert_eq!(body["error"], "Request is malformed; could not decode JSON object.");
        assert!(body.get("errors").is_none());
    }

    #[tokio::test]
    async fn schema_violation_body_carries_field_errors() {
        let mut errors = FieldErrorMap::new();
        errors.push("text", r#""text" is a required property"#);
        let (status, _, body) = response_parts(ApiError::SchemaViolation(errors)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Request is invalid; There are validation errors.");
        assert_eq!(body["errors"]["text"][0], r#""text" is a required property"#);
    }

    #[tokio::test]
    async fn unserializable_response_hides_reason() {
        let (status, _, body) =
            response_parts(ApiError::UnserializableResponse("key must be a string".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Response is malformed; could not encode JSON object.");
        assert!(!body.to_string().contains("key must be a string"));
    }
}
