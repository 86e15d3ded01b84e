use crate::config::ServiceConfig;
use crate::utils::error::{ForecastError, Result};
use crate::utils::metrics::MetricsCollector;
use reqwest::header::HeaderMap;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use std::time::Duration;

const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub timeout: Duration,
    pub user_agent: String,
    pub retry_attempts: u32,
    pub retry_delay: Duration,
}

impl HttpSettings {
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self {
            timeout: config.request_timeout(),
            user_agent: config.user_agent.clone(),
            retry_attempts: config.retry_attempts,
            retry_delay: config.retry_delay(),
        }
    }

    /// Same as `from_config` with the longer model generation timeout.
    pub fn for_ollama(config: &ServiceConfig) -> Self {
        Self {
            timeout: config.ollama_timeout(),
            ..Self::from_config(config)
        }
    }
}

/// A `reqwest` client bound to one upstream service, with timeout and retry.
#[derive(Debug, Clone)]
pub struct HttpClient {
    service: &'static str,
    client: Client,
    settings: HttpSettings,
    metrics: MetricsCollector,
}

impl HttpClient {
    pub fn new(
        service: &'static str,
        settings: HttpSettings,
        metrics: MetricsCollector,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(settings.user_agent.clone())
            .build()?;

        Ok(Self {
            service,
            client,
            settings,
            metrics,
        })
    }

    pub async fn get_json(
        &self,
        url: &str,
        query: &[(&str, &str)],
        headers: &HeaderMap,
    ) -> Result<serde_json::Value> {
        tracing::debug!("GET {} ({})", url, self.service);
        let response = self
            .send_with_retry(true, || {
                self.client
                    .get(url)
                    .query(query)
                    .headers(headers.clone())
            })
            .await?;
        self.read_json(response).await
    }

    /// A POST that timed out is not sent again; the server may still be working on it.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<serde_json::Value> {
        tracing::debug!("POST {} ({})", url, self.service);
        let response = self
            .send_with_retry(false, || self.client.post(url).json(body))
            .await?;
        self.read_json(response).await
    }

    async fn read_json(&self, response: Response) -> Result<serde_json::Value> {
        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| ForecastError::malformed(self.service, format!("body is not JSON: {}", e)))
    }

    /// Connect errors, 5xx and 429 are retried, timeouts only when `retry_timeouts`
    /// is set; other statuses fail at once.
    async fn send_with_retry<F>(&self, retry_timeouts: bool, build: F) -> Result<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut attempt: u32 = 0;

        loop {
            self.metrics.record_upstream_request(self.service);

            let (error, retryable) = match build().send().await {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) => {
                    let status = response.status();
                    let retryable =
                        status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS;
                    let body = response.text().await.unwrap_or_default();
                    let error = ForecastError::Upstream {
                        service: self.service.to_string(),
                        status: status.as_u16(),
                        message: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
                    };
                    (error, retryable)
                }
                Err(e) => {
                    let retryable = e.is_connect() || (retry_timeouts && e.is_timeout());
                    (ForecastError::Http(e), retryable)
                }
            };

            if !retryable || attempt >= self.settings.retry_attempts {
                return Err(error);
            }

            attempt += 1;
            tracing::warn!(
                "🔄 {} request failed ({}), retry {}/{} in {:?}",
                self.service,
                error,
                attempt,
                self.settings.retry_attempts,
                self.settings.retry_delay
            );
            tokio::time::sleep(self.settings.retry_delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn settings(retry_attempts: u32) -> HttpSettings {
        HttpSettings {
            timeout: Duration::from_secs(5),
            user_agent: "forecast-test".to_string(),
            retry_attempts,
            retry_delay: Duration::from_millis(10),
        }
    }

    #[tokio::test]
    async fn test_get_json_sends_user_agent_and_query() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/lookup")
                .query_param("q", "seattle")
                .header("user-agent", "forecast-test");
            then.status(200).json_body(serde_json::json!({"ok": true}));
        });

        let client = HttpClient::new("test", settings(0), MetricsCollector::new()).unwrap();
        let body = client
            .get_json(&server.url("/lookup"), &[("q", "seattle")], &HeaderMap::new())
            .await
            .unwrap();

        mock.assert();
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn test_server_errors_are_retried() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/flaky");
            then.status(503).body("try later");
        });

        let metrics = MetricsCollector::new();
        let client = HttpClient::new("flaky", settings(2), metrics.clone()).unwrap();
        let err = client
            .get_json(&server.url("/flaky"), &[], &HeaderMap::new())
            .await
            .unwrap_err();

        mock.assert_hits(3);
        assert_eq!(metrics.snapshot().upstream_requests.get("flaky"), Some(&3));
        match err {
            ForecastError::Upstream {
                status, message, ..
            } => {
                assert_eq!(status, 503);
                assert_eq!(message, "try later");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/missing");
            then.status(404);
        });

        let client = HttpClient::new("test", settings(3), MetricsCollector::new()).unwrap();
        let err = client
            .get_json(&server.url("/missing"), &[], &HeaderMap::new())
            .await
            .unwrap_err();

        mock.assert_hits(1);
        assert_eq!(err.status_code(), 502);
    }

    #[tokio::test]
    async fn test_timed_out_post_is_sent_once() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/chat");
            then.status(200)
                .delay(Duration::from_millis(1500))
                .json_body(serde_json::json!({"message": {"content": "{}"}}));
        });

        let metrics = MetricsCollector::new();
        let slow = HttpSettings {
            timeout: Duration::from_secs(1),
            ..settings(2)
        };
        let client = HttpClient::new("ollama", slow, metrics.clone()).unwrap();
        let err = client
            .post_json(&server.url("/api/chat"), &serde_json::json!({"model": "llama3"}))
            .await
            .unwrap_err();

        match err {
            ForecastError::Http(e) => assert!(e.is_timeout()),
            other => panic!("unexpected error: {other:?}"),
        }
        mock.assert_hits(1);
        assert_eq!(metrics.snapshot().upstream_requests.get("ollama"), Some(&1));
    }

    #[tokio::test]
    async fn test_timed_out_get_is_retried() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/points");
            then.status(200)
                .delay(Duration::from_millis(1500))
                .json_body(serde_json::json!({}));
        });

        let slow = HttpSettings {
            timeout: Duration::from_secs(1),
            ..settings(1)
        };
        let client = HttpClient::new("nws", slow, MetricsCollector::new()).unwrap();
        let err = client
            .get_json(&server.url("/points"), &[], &HeaderMap::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ForecastError::Http(_)));
        mock.assert_hits(2);
    }

    #[tokio::test]
    async fn test_non_json_body_is_malformed() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/chat");
            then.status(200).body("<html>");
        });

        let client = HttpClient::new("ollama", settings(0), MetricsCollector::new()).unwrap();
        let err = client
            .post_json(&server.url("/chat"), &serde_json::json!({}))
            .await
            .unwrap_err();

        assert!(matches!(err, ForecastError::MalformedResponse { .. }));
    }
}
