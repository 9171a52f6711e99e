//! # Echo Routes
//!
//! Routes:
//! - POST /v1/echo: body `{"text": string}`; returns the body unchanged,
//!   checked against the same shape on the way out.
//! - POST /v1/greeting: body `{"text": string}`; returns `"Hello world!"`.

use std::convert::Infallible;

use axum::http::request::Parts;
use axum::routing::post;
use axum::Router;
use jsonguard_schema::SchemaError;
use serde_json::{json, Value};

use crate::config::ValidateConfig;
use crate::handler::{validate_with_config, Reply};

/// Object with a single required string property `text`.
pub fn text_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "text": {"type": "string"}
        },
        "required": ["text"],
        "additionalProperties": false
    })
}

/// Echo router.
///
/// # Errors
///
/// Returns [`SchemaError`] if a route schema fails to compile.
pub fn router(config: ValidateConfig) -> Result<Router, SchemaError> {
    let echo = validate_with_config(Some(text_schema()), Some(text_schema()), config)?;
    let greeting = validate_with_config(Some(text_schema()), None, config)?;

    Ok(Router::new()
        .route("/v1/echo", post(echo.wrap(echo_text)))
        .route("/v1/greeting", post(greeting.wrap(greet))))
}

async fn echo_text(body: Value, _parts: Parts) -> Result<Reply<Value>, Infallible> {
    Ok(body.into())
}

async fn greet(_body: Value, _parts: Parts) -> Result<Reply<&'static str>, Infallible> {
    Ok("Hello world!".into())
}
