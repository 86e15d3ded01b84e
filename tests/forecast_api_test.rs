use httpmock::prelude::*;
use nws_forecast_summarizer::server::metrics_router;
use nws_forecast_summarizer::{
    build_router, AppState, ForecastEngine, MetricsCollector, ServiceConfig,
};
use std::sync::Arc;

const ADDRESS: &str = "400 Broad St, Seattle, WA 98109";

fn config_for(server: &MockServer) -> ServiceConfig {
    ServiceConfig {
        ollama_host: "http://127.0.0.1".to_string(),
        ollama_port: server.port(),
        census_base_url: server.base_url(),
        nws_base_url: server.base_url(),
        user_agent: "forecast-integration-test".to_string(),
        request_timeout_seconds: 5,
        retry_attempts: 0,
        retry_delay_ms: 1,
        ..ServiceConfig::default()
    }
}

async fn spawn_app(server: &MockServer) -> (String, MetricsCollector) {
    let metrics = MetricsCollector::new();
    let engine = ForecastEngine::from_config(&config_for(server), &metrics).unwrap();
    let state = Arc::new(AppState::new(engine, metrics.clone()));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, build_router(state)).await.unwrap();
    });

    (format!("http://{}", addr), metrics)
}

fn mock_geocoder(server: &MockServer, matches: serde_json::Value) -> httpmock::Mock<'_> {
    server.mock(|when, then| {
        when.method(GET)
            .path("/geocoder/locations/onelineaddress")
            .query_param_exists("address")
            .query_param("benchmark", "2020")
            .query_param("format", "json");
        then.status(200)
            .json_body(serde_json::json!({"result": {"addressMatches": matches}}));
    })
}

fn seattle_match() -> serde_json::Value {
    serde_json::json!([{
        "matchedAddress": "400 BROAD ST, SEATTLE, WA, 98109",
        "coordinates": {"x": -122.34926, "y": 47.62051}
    }])
}

fn mock_nws(server: &MockServer) -> (httpmock::Mock<'_>, httpmock::Mock<'_>) {
    let forecast_url = server.url("/gridpoints/SEW/124,69/forecast");
    let points = server.mock(|when, then| {
        when.method(GET)
            .path("/points/47.62051,-122.34926")
            .header("user-agent", "forecast-integration-test");
        then.status(200).json_body(serde_json::json!({
            "properties": {"forecast": forecast_url}
        }));
    });

    let forecast = server.mock(|when, then| {
        when.method(GET).path("/gridpoints/SEW/124,69/forecast");
        then.status(200).json_body(serde_json::json!({
            "properties": {"periods": [
                {
                    "number": 1,
                    "name": "Today",
                    "startTime": "2024-07-08T06:00:00-07:00",
                    "endTime": "2024-07-08T18:00:00-07:00",
                    "isDaytime": true,
                    "temperature": 88,
                    "temperatureUnit": "F",
                    "relativeHumidity": {"unitCode": "wmoUnit:percent", "value": 40},
                    "windSpeed": "5 mph",
                    "windDirection": "NW",
                    "shortForecast": "Sunny",
                    "detailedForecast": "Sunny, with a high near 88."
                },
                {
                    "number": 2,
                    "name": "Tonight",
                    "startTime": "2024-07-08T18:00:00-07:00",
                    "endTime": "2024-07-09T06:00:00-07:00",
                    "isDaytime": false,
                    "temperature": 60,
                    "temperatureUnit": "F",
                    "windSpeed": "3 mph",
                    "windDirection": "N",
                    "shortForecast": "Clear",
                    "detailedForecast": "Clear, with a low around 60."
                }
            ]}
        }));
    });

    (points, forecast)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_forecast_end_to_end() {
    let server = MockServer::start();
    let geocode = mock_geocoder(&server, seattle_match());
    let (points, forecast) = mock_nws(&server);
    let chat = server.mock(|when, then| {
        when.method(POST)
            .path("/api/chat")
            .json_body_partial(r#"{"model": "llama3", "stream": false, "format": "json"}"#)
            .body_contains("high near 88")
            .body_contains("88F")
            .body_contains("5 mph NW");
        then.status(200).json_body(serde_json::json!({
            "model": "llama3",
            "message": {
                "role": "assistant",
                "content": "{\"summary\": \"Hot and sunny today with a high of 88F, clearing to a mild night.\"}"
            },
            "done": true
        }));
    });

    let (base, metrics) = spawn_app(&server).await;
    let response = reqwest::Client::new()
        .get(format!("{}/api/v1/forecast", base))
        .query(&[("address", ADDRESS)])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body["summary"],
        "Hot and sunny today with a high of 88F, clearing to a mild night."
    );

    geocode.assert();
    points.assert();
    forecast.assert();
    chat.assert();

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.forecast_total, 1);
    assert!(snapshot.forecast_failures.is_empty());
    assert_eq!(snapshot.upstream_requests.get("census"), Some(&1));
    assert_eq!(snapshot.upstream_requests.get("nws"), Some(&2));
    assert_eq!(snapshot.upstream_requests.get("ollama"), Some(&1));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_missing_address_is_bad_request() {
    let server = MockServer::start();
    let geocode = mock_geocoder(&server, seattle_match());

    let (base, metrics) = spawn_app(&server).await;
    let response = reqwest::get(format!("{}/api/v1/forecast", base))
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    assert_eq!(
        response.text().await.unwrap(),
        "address parameter is required"
    );
    geocode.assert_hits(0);
    assert_eq!(metrics.snapshot().forecast_total, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_unknown_address_is_not_found() {
    let server = MockServer::start();
    mock_geocoder(&server, serde_json::json!([]));

    let (base, metrics) = spawn_app(&server).await;
    let response = reqwest::Client::new()
        .get(format!("{}/api/v1/forecast", base))
        .query(&[("address", "1 Nowhere Lane, Atlantis")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
    assert_eq!(response.text().await.unwrap(), "error geocoding address");
    assert_eq!(
        metrics.snapshot().forecast_failures.get("geocode"),
        Some(&1)
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_model_failure_is_bad_gateway() {
    let server = MockServer::start();
    mock_geocoder(&server, seattle_match());
    mock_nws(&server);
    server.mock(|when, then| {
        when.method(POST).path("/api/chat");
        then.status(500)
            .json_body(serde_json::json!({"error": "model failed to load"}));
    });

    let (base, metrics) = spawn_app(&server).await;
    let response = reqwest::Client::new()
        .get(format!("{}/api/v1/forecast", base))
        .query(&[("address", ADDRESS)])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 502);
    assert_eq!(response.text().await.unwrap(), "error summarizing forecast");
    assert_eq!(
        metrics.snapshot().forecast_failures.get("summarize"),
        Some(&1)
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_root_and_health() {
    let server = MockServer::start();
    let (base, _) = spawn_app(&server).await;

    let root = reqwest::get(format!("{}/", base)).await.unwrap();
    assert_eq!(root.status(), 200);
    assert_eq!(root.text().await.unwrap(), "nws-forecast-summarizer");

    let health: serde_json::Value = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["service"], "nws-forecast-summarizer");
    assert!(health["started_at"].as_str().is_some());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_metrics_endpoint_exposes_counters() {
    let metrics = MetricsCollector::new();
    metrics.record_forecast_request();
    metrics.record_forecast_failure("periods");
    metrics.record_upstream_request("nws");

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = metrics_router(metrics.clone());
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let response = reqwest::get(format!("http://{}/metrics", addr))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert!(response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .starts_with("text/plain"));

    let text = response.text().await.unwrap();
    assert!(text.contains("forecast_total 1"));
    assert!(text.contains("forecast_failures_total{stage=\"periods\"} 1"));
    assert!(text.contains("upstream_requests_total{service=\"nws\"} 1"));
}
