use crate::adapters::http::HttpClient;
use crate::core::prompt::build_messages;
use crate::domain::model::{ChatMessage, ForecastSummary, SimplifiedForecastPeriod};
use crate::domain::ports::Summarizer;
use crate::utils::error::{ForecastError, Result};
use async_trait::async_trait;
use serde::Serialize;

const SERVICE: &str = "ollama";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    format: &'static str,
}

/// Summarizes forecasts through Ollama's `/api/chat` in JSON mode.
pub struct OllamaSummarizer {
    base_url: String,
    model: String,
    http: HttpClient,
}

impl OllamaSummarizer {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, http: HttpClient) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            http,
        }
    }

    pub async fn chat(&self, messages: &[ChatMessage]) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            stream: false,
            format: "json",
        };

        let body = self
            .http
            .post_json(&format!("{}/api/chat", self.base_url), &request)
            .await?;

        body["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ForecastError::malformed(SERVICE, "message.content missing"))
    }
}

#[async_trait]
impl Summarizer for OllamaSummarizer {
    async fn summarize(&self, periods: &[SimplifiedForecastPeriod]) -> Result<ForecastSummary> {
        let query = serde_json::to_string(periods)?;
        let content = self.chat(&build_messages(query)).await?;

        serde_json::from_str::<ForecastSummary>(content.trim()).map_err(|e| {
            tracing::debug!("model output was: {}", content);
            ForecastError::malformed(SERVICE, format!("model did not return a summary: {}", e))
        })
    }
}
