//! # Request Tracing
//!
//! `tower_http::trace::TraceLayer` for per-request spans. Validation
//! rejections are logged inside these spans by the error envelope.

use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::TraceLayer;

/// Build the request tracing layer.
///
/// Each request gets a span with method and URI; the response status and
/// latency are recorded when it completes.
pub fn layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
}
