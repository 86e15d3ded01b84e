use crate::utils::error::Result;
use crate::utils::metrics::MetricsCollector;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

pub fn metrics_router(collector: MetricsCollector) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(collector)
}

async fn metrics_handler(State(collector): State<MetricsCollector>) -> impl IntoResponse {
    (
        [(CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        collector.snapshot().to_prometheus(),
    )
}

/// Serves `/metrics` on its own listener until the process exits.
pub async fn serve_metrics(addr: &str, collector: MetricsCollector) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("📊 Metrics listening on http://{}/metrics", listener.local_addr()?);
    axum::serve(listener, metrics_router(collector)).await?;
    Ok(())
}
