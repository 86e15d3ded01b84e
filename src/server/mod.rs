//! HTTP surface: the forecast API and the separate metrics listener.
//!
//! ```text
//! /                  - service name
//! /api/v1/forecast   - ?address=... → {"summary": "..."}
//! /health            - liveness
//! ```

pub mod handlers;
pub mod metrics;

use crate::core::ForecastEngine;
use crate::utils::error::Result;
use crate::utils::metrics::MetricsCollector;
use axum::routing::get;
use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::net::TcpListener;

pub use metrics::{metrics_router, serve_metrics};

pub struct AppState {
    pub engine: ForecastEngine,
    pub metrics: MetricsCollector,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(engine: ForecastEngine, metrics: MetricsCollector) -> Self {
        Self {
            engine,
            metrics,
            started_at: Utc::now(),
        }
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/api/v1/forecast", get(handlers::forecast))
        .with_state(state)
}

/// Binds the API listener and serves until Ctrl-C.
pub async fn serve(addr: &str, state: Arc<AppState>) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("🚀 API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("👋 API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
