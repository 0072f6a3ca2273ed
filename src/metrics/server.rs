//! HTTP exporter for the agent's Prometheus counters.
//!
//! The server runs on its own thread with its own runtime so the
//! session loop stays synchronous. Handlers only read the shared
//! registry; the session is the sole writer.

use crate::metrics::MetricsRegistry;
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during metrics server operations.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listen port could not be bound.
    #[error("failed to bind metrics listener: {0}")]
    Bind(#[from] std::io::Error),

    /// The server stopped with an error.
    #[error("metrics server stopped: {0}")]
    Server(String),
}

/// Configuration for the metrics server.
#[derive(Debug, Clone)]
pub struct MetricsServerConfig {
    /// Port to listen on, bound on all interfaces.
    pub port: u16,
}

impl Default for MetricsServerConfig {
    fn default() -> Self {
        Self { port: 9090 }
    }
}

impl MetricsServerConfig {
    /// Creates a config with a custom port.
    pub fn with_port(port: u16) -> Self {
        Self { port }
    }
}

/// Serves `/metrics` in the Prometheus text format.
///
/// The registry arrives pre-shared with the session thread and is
/// internally synchronized, so handlers borrow it without locking.
pub struct MetricsServer {
    config: MetricsServerConfig,
    registry: Arc<MetricsRegistry>,
}

impl MetricsServer {
    /// Creates a new metrics server over a shared registry.
    pub fn new(config: MetricsServerConfig, registry: Arc<MetricsRegistry>) -> Self {
        Self { config, registry }
    }

    /// Binds the listener and serves requests until shut down.
    pub async fn run(self) -> Result<(), ServerError> {
        let app = Router::new()
            .route("/", get(index_handler))
            .route("/metrics", get(metrics_handler))
            .route("/health", get(health_handler))
            .layer(tower_http::cors::CorsLayer::permissive())
            .with_state(self.registry);

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.port));
        let listener = tokio::net::TcpListener::bind(addr).await?;

        tracing::info!(%addr, "Metrics exporter listening");

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Server(e.to_string()))?;

        Ok(())
    }
}

async fn index_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        "block-pilot exporter\n\n/metrics  Prometheus text format\n/health   liveness\n",
    )
}

async fn metrics_handler(State(registry): State<Arc<MetricsRegistry>>) -> impl IntoResponse {
    match registry.encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "text/plain; charset=utf-8")],
            format!("metrics encoding failed: {}", e),
        ),
    }
}

async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, concat!("block-pilot ", env!("CARGO_PKG_VERSION")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_port() {
        let config = MetricsServerConfig::default();
        assert_eq!(config.port, 9090);
    }

    #[test]
    fn test_config_with_port() {
        let config = MetricsServerConfig::with_port(8080);
        assert_eq!(config.port, 8080);
    }

    #[tokio::test]
    async fn test_metrics_handler_serves_exposition_text() {
        let registry = Arc::new(MetricsRegistry::new().unwrap());
        let response = metrics_handler(State(registry)).await.into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap();
        assert!(content_type.starts_with("text/plain"));
    }

    #[tokio::test]
    async fn test_health_handler_reports_version() {
        let response = health_handler().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
