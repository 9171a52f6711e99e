//! # Health Probes
//!
//! - GET /health/liveness: always `ok`, no validation.

use axum::routing::get;
use axum::Router;

/// Health probe router.
pub fn router() -> Router {
    Router::new().route("/health/liveness", get(liveness))
}

async fn liveness() -> &'static str {
    "ok"
}
