//! # Middleware
//!
//! Tower layers applied to the demo router.

pub mod tracing_layer;
