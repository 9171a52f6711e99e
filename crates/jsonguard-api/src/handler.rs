//! # Validated Handlers
//!
//! Wraps a JSON handler so that its input and output are checked against
//! JSON Schemas:
//!
//! 1. Read and decode the body. Failure → 400 malformed, handler not run.
//! 2. Check the body against the request schema. Violations → 400 with
//!    field errors, handler not run.
//! 3. Run the handler with `(body, request head)`. Its errors are turned
//!    into responses by their own `IntoResponse` impl, untouched.
//! 4. A [`Reply::Raw`] response is returned as-is.
//! 5. Encode the result as JSON. Failure → 500, even with no response
//!    schema.
//! 6. Check the encoded result against the response schema. Violations →
//!    400 with field errors (the same envelope as a request violation).
//! 7. Respond 200 with the encoded result.
//!
//! Schemas are compiled by [`validate`], before any handler is wrapped, so
//! a malformed schema fails at startup.
//!
//! ```ignore
//! let validation = jsonguard_api::validate(Some(request_schema), None)?;
//! let router = Router::new().route(
//!     "/v1/echo",
//!     post(validation.wrap(|body: Value, _parts: Parts| async move {
//!         Ok::<_, Infallible>(Reply::Data(body))
//!     })),
//! );
//! ```

use std::future::Future;
use std::pin::Pin;

use axum::body::Body;
use axum::extract::Request;
use axum::handler::Handler;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use jsonguard_schema::{CompiledSchema, SchemaError};
use serde::Serialize;
use serde_json::Value;

use crate::config::ValidateConfig;
use crate::error::ApiError;
use crate::extractors::read_json_body;

/// What a wrapped handler produces on success.
#[derive(Debug)]
pub enum Reply<T> {
    /// Data to validate against the response schema and send as JSON.
    Data(T),
    /// A finished response, e.g. a streaming body, sent without
    /// validation or re-encoding.
    Raw(Response),
}

impl<T> Reply<T> {
    /// Pass any response through untouched.
    pub fn raw(response: impl IntoResponse) -> Self {
        Self::Raw(response.into_response())
    }
}

impl<T> From<T> for Reply<T> {
    fn from(data: T) -> Self {
        Self::Data(data)
    }
}

/// Compile the request and response schemas with the default settings.
///
/// `None` disables validation on that side.
///
/// # Errors
///
/// Returns [`SchemaError::InvalidSchema`] if either document is not a
/// valid schema.
pub fn validate(
    request_schema: Option<Value>,
    response_schema: Option<Value>,
) -> Result<Validation, SchemaError> {
    validate_with_config(request_schema, response_schema, ValidateConfig::default())
}

/// Compile the request and response schemas with explicit settings.
///
/// # Errors
///
/// Returns [`SchemaError::InvalidSchema`] if either document is not a
/// valid schema under the configured draft.
pub fn validate_with_config(
    request_schema: Option<Value>,
    response_schema: Option<Value>,
    config: ValidateConfig,
) -> Result<Validation, SchemaError> {
    let compile = |schema: Option<Value>| {
        schema
            .map(|document| CompiledSchema::compile_with_draft(document, config.draft))
            .transpose()
    };

    Ok(Validation {
        request: compile(request_schema)?,
        response: compile(response_schema)?,
        config,
    })
}

/// A compiled request/response schema pair, ready to wrap handlers.
///
/// One `Validation` can wrap any number of handlers.
#[derive(Debug, Clone)]
pub struct Validation {
    request: Option<CompiledSchema>,
    response: Option<CompiledSchema>,
    config: ValidateConfig,
}

impl Validation {
    /// Wrap `handler` with request and response validation.
    pub fn wrap<H>(&self, handler: H) -> ValidatedHandler<H> {
        ValidatedHandler {
            handler,
            validation: self.clone(),
        }
    }

    /// The request schema document, if any.
    pub fn request_schema(&self) -> Option<&Value> {
        self.request.as_ref().map(CompiledSchema::document)
    }

    /// The response schema document, if any.
    pub fn response_schema(&self) -> Option<&Value> {
        self.response.as_ref().map(CompiledSchema::document)
    }

    /// Settings in effect for handlers wrapped by this pair.
    pub fn config(&self) -> &ValidateConfig {
        &self.config
    }

    async fn decode_request(&self, body: Body) -> Result<Value, ApiError> {
        let payload = read_json_body(body, self.config.max_body_bytes).await?;
        if let Some(schema) = &self.request {
            schema.check(&payload).map_err(ApiError::SchemaViolation)?;
        }
        Ok(payload)
    }

    fn encode_response<T: Serialize>(&self, data: &T) -> Result<Value, ApiError> {
        let value = serde_json::to_value(data)
            .map_err(|e| ApiError::UnserializableResponse(e.to_string()))?;
        if let Some(schema) = &self.response {
            schema.check(&value).map_err(|errors| {
                tracing::warn!(fields = errors.len(), "handler result violates response schema");
                ApiError::SchemaViolation(errors)
            })?;
        }
        Ok(value)
    }
}

/// A handler wrapped with schema validation.
///
/// The inner handler has the signature
/// `Fn(Value, Parts) -> impl Future<Output = Result<Reply<T>, E>>`.
/// Implements [`axum::handler::Handler`], so it can be routed directly.
#[derive(Debug, Clone)]
pub struct ValidatedHandler<H> {
    handler: H,
    validation: Validation,
}

impl<H> ValidatedHandler<H> {
    /// The request schema document, if any.
    pub fn request_schema(&self) -> Option<&Value> {
        self.validation.request_schema()
    }

    /// The response schema document, if any.
    pub fn response_schema(&self) -> Option<&Value> {
        self.validation.response_schema()
    }

    /// Run one request through validation and the inner handler.
    pub async fn handle<Fut, T, E>(&self, request: Request) -> Response
    where
        H: Fn(Value, Parts) -> Fut,
        Fut: Future<Output = Result<Reply<T>, E>>,
        T: Serialize,
        E: IntoResponse,
    {
        let (parts, body) = request.into_parts();

        let payload = match self.validation.decode_request(body).await {
            Ok(payload) => payload,
            Err(e) => return e.into_response(),
        };

        let data = match (self.handler)(payload, parts).await {
            Ok(Reply::Data(data)) => data,
            Ok(Reply::Raw(response)) => return response,
            Err(e) => return e.into_response(),
        };

        match self.validation.encode_response(&data) {
            Ok(value) => (StatusCode::OK, Json(value)).into_response(),
            Err(e) => e.into_response(),
        }
    }
}

/// Marker distinguishing [`ValidatedHandler`] in Axum's `Handler` impls.
#[derive(Debug, Clone, Copy)]
pub struct Validated;

impl<H, Fut, T, E, S> Handler<(Validated, T, E), S> for ValidatedHandler<H>
where
    H: Fn(Value, Parts) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Result<Reply<T>, E>> + Send + 'static,
    T: Serialize + Send + 'static,
    E: IntoResponse + Send + 'static,
    S: Send + Sync + 'static,
{
    type Future = Pin<Box<dyn Future<Output = Response> + Send>>;

    fn call(self, request: Request, _state: S) -> Self::Future {
        Box::pin(async move { self.handle::<Fut, T, E>(request).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::convert::Infallible;

    fn text_schema() -> Value {
        json!({
            "type": "object",
            "properties": {"text": {"type": "string"}},
            "required": ["text"],
            "additionalProperties": false
        })
    }

    #[test]
    fn validate_without_schemas() {
        let validation = validate(None, None).unwrap();
        assert!(validation.request_schema().is_none());
        assert!(validation.response_schema().is_none());
    }

    #[test]
    fn validate_rejects_malformed_request_schema() {
        let err = validate(Some(json!({"type": 12})), None).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidSchema { .. }), "got: {err}");
    }

    #[test]
    fn validate_rejects_malformed_response_schema() {
        let err = validate(None, Some(json!({"required": "text"}))).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidSchema { .. }), "got: {err}");
    }

    #[test]
    fn wrapped_handler_exposes_schemas() {
        let validation = validate(Some(text_schema()), Some(json!({"type": "string"}))).unwrap();
        let handler = validation.wrap(|_body: Value, _parts: Parts| async {
            Ok::<_, Infallible>(Reply::Data("Hello world!"))
        });
        assert_eq!(handler.request_schema(), Some(&text_schema()));
        assert_eq!(handler.response_schema(), Some(&json!({"type": "string"})));
    }

    #[test]
    fn config_draft_is_applied() {
        let config = ValidateConfig {
            draft: Some(jsonguard_schema::Draft::Draft4),
            ..ValidateConfig::default()
        };
        let validation = validate_with_config(Some(text_schema()), None, config).unwrap();
        assert_eq!(validation.config().draft, Some(jsonguard_schema::Draft::Draft4));
    }

    #[test]
    fn reply_from_data() {
        let reply: Reply<u32> = 7.into();
        assert!(matches!(reply, Reply::Data(7)));
    }

    #[tokio::test]
    async fn handle_runs_handler_with_decoded_body() {
        let validation = validate(Some(text_schema()), None).unwrap();
        let handler = validation.wrap(|body: Value, parts: Parts| async move {
            Ok::<_, Infallible>(Reply::Data(json!({
                "seen": body["text"],
                "method": parts.method.as_str(),
            })))
        });
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from(r#"{"text": "foobar"}"#))
            .unwrap();
        let response = handler.handle(request).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
