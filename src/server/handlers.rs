use crate::server::AppState;
use crate::utils::error::ForecastError;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;

pub const SERVICE_NAME: &str = "nws-forecast-summarizer";

#[derive(Debug, Deserialize)]
pub struct ForecastParams {
    pub address: Option<String>,
}

impl IntoResponse for ForecastError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, self.user_friendly_message()).into_response()
    }
}

pub async fn root() -> &'static str {
    SERVICE_NAME
}

pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "started_at": state.started_at.to_rfc3339(),
    }))
}

pub async fn forecast(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ForecastParams>,
) -> Response {
    state.metrics.record_forecast_request();

    let Some(address) = params.address else {
        return ForecastError::MissingParameter {
            name: "address".to_string(),
        }
        .into_response();
    };

    match state.engine.summarize_address(&address).await {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => {
            if let Some(stage) = e.stage() {
                state.metrics.record_forecast_failure(stage.as_str());
                tracing::error!(
                    "❌ Forecast for '{}' failed at {} (Category: {:?}): {}",
                    address,
                    stage,
                    e.category(),
                    e
                );
            } else {
                tracing::warn!("Rejected forecast request: {}", e);
            }
            e.into_response()
        }
    }
}
