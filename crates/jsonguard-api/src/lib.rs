//! # jsonguard-api: Schema-Validated Axum Handlers
//!
//! Wraps JSON request handlers so that request bodies and handler results
//! are checked against JSON Schemas, with every failure returned in one
//! envelope:
//!
//! | Condition                      | Status | `error`                                                  |
//! |--------------------------------|--------|----------------------------------------------------------|
//! | Body missing or not JSON       | 400    | `Request is malformed; could not decode JSON object.`    |
//! | Body violates request schema   | 400    | `Request is invalid; There are validation errors.`       |
//! | Result violates response schema| 400    | `Request is invalid; There are validation errors.`       |
//! | Result cannot be encoded       | 500    | `Response is malformed; could not encode JSON object.`   |
//!
//! Schema violations also carry `errors`: a map from field name to the
//! validator's messages for that field.
//!
//! ## Usage
//!
//! [`validate`] compiles the schemas (failing fast on a malformed schema)
//! and [`Validation::wrap`] turns an `async fn(Value, Parts)` into an Axum
//! handler.
//!
//! ## Crate Policy
//!
//! - Errors from the wrapped handler are never rewritten.
//! - Schemas are compiled once and shared read-only across requests.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handler;
pub mod middleware;
pub mod routes;

use axum::Router;
use jsonguard_schema::SchemaError;

pub use config::{ServerConfig, ValidateConfig};
pub use error::{ApiError, ErrorEnvelope};
pub use handler::{validate, validate_with_config, Reply, ValidatedHandler, Validation};

/// Assemble the demo application.
///
/// # Errors
///
/// Returns [`SchemaError`] if a route schema fails to compile.
pub fn app(config: ValidateConfig) -> Result<Router, SchemaError> {
    Ok(Router::new()
        .merge(routes::health::router())
        .merge(routes::echo::router(config)?)
        .layer(middleware::tracing_layer::layer()))
}
