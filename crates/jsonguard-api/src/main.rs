//! # jsonguard-demo: Binary Entry Point
//!
//! Serves the demo routes with schema validation enabled.
//! Binds to `PORT` (default 8080).

use jsonguard_api::{ServerConfig, ValidateConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let server = ServerConfig::from_env();
    let validate = ValidateConfig::from_env();

    let app = jsonguard_api::app(validate).map_err(|e| {
        tracing::error!("Route schema compilation failed: {e}");
        e
    })?;

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], server.port));
    tracing::info!(max_body_bytes = validate.max_body_bytes, "jsonguard demo listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
