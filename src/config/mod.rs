#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::TomlConfig;

use crate::utils::error::{ForecastError, Result};
use crate::utils::logger::LogFormat;
use crate::utils::validation::{
    validate_non_empty_string, validate_one_of, validate_port, validate_range, validate_url,
    Validate,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_LOG_FORMAT: &str = "compact";
pub const DEFAULT_API_HOST: &str = "0.0.0.0";
pub const DEFAULT_API_PORT: u16 = 8080;
pub const DEFAULT_METRICS_HOST: &str = "0.0.0.0";
pub const DEFAULT_METRICS_PORT: u16 = 9090;
pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost";
pub const DEFAULT_OLLAMA_PORT: u16 = 11434;
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3";
pub const DEFAULT_OLLAMA_TIMEOUT_SECONDS: u64 = 120;
pub const DEFAULT_CENSUS_BASE_URL: &str = "https://geocoding.geo.census.gov";
pub const DEFAULT_NWS_BASE_URL: &str = "https://api.weather.gov";
pub const DEFAULT_USER_AGENT: &str = "nws-forecast-summarizer";
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 2;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 500;

/// Fully resolved service settings, whichever source they came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub log_level: String,
    pub log_format: String,
    pub api_host: String,
    pub api_port: u16,
    pub metrics_host: String,
    pub metrics_port: u16,
    pub ollama_host: String,
    pub ollama_port: u16,
    pub ollama_model: String,
    /// Generation runs much longer than the lookups, so the model gets its own timeout.
    pub ollama_timeout_seconds: u64,
    pub census_base_url: String,
    pub nws_base_url: String,
    pub user_agent: String,
    pub request_timeout_seconds: u64,
    pub retry_attempts: u32,
    pub retry_delay_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_format: DEFAULT_LOG_FORMAT.to_string(),
            api_host: DEFAULT_API_HOST.to_string(),
            api_port: DEFAULT_API_PORT,
            metrics_host: DEFAULT_METRICS_HOST.to_string(),
            metrics_port: DEFAULT_METRICS_PORT,
            ollama_host: DEFAULT_OLLAMA_HOST.to_string(),
            ollama_port: DEFAULT_OLLAMA_PORT,
            ollama_model: DEFAULT_OLLAMA_MODEL.to_string(),
            ollama_timeout_seconds: DEFAULT_OLLAMA_TIMEOUT_SECONDS,
            census_base_url: DEFAULT_CENSUS_BASE_URL.to_string(),
            nws_base_url: DEFAULT_NWS_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
        }
    }
}

impl ServiceConfig {
    pub fn api_addr(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }

    pub fn metrics_addr(&self) -> String {
        format!("{}:{}", self.metrics_host, self.metrics_port)
    }

    pub fn ollama_base_url(&self) -> String {
        format!(
            "{}:{}",
            self.ollama_host.trim_end_matches('/'),
            self.ollama_port
        )
    }

    pub fn log_format(&self) -> LogFormat {
        LogFormat::parse(&self.log_format)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn ollama_timeout(&self) -> Duration {
        Duration::from_secs(self.ollama_timeout_seconds)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Validate for ServiceConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("log_level", &self.log_level)?;
        validate_one_of("log_format", &self.log_format, &["compact", "json"])?;

        validate_non_empty_string("api_host", &self.api_host)?;
        validate_port("api_port", self.api_port)?;
        validate_non_empty_string("metrics_host", &self.metrics_host)?;
        validate_port("metrics_port", self.metrics_port)?;
        if self.api_addr() == self.metrics_addr() {
            return Err(ForecastError::config(format!(
                "api and metrics listeners both bind {}",
                self.api_addr()
            )));
        }

        validate_url("ollama_host", &self.ollama_host)?;
        validate_port("ollama_port", self.ollama_port)?;
        validate_non_empty_string("ollama_model", &self.ollama_model)?;
        validate_range("ollama_timeout_seconds", self.ollama_timeout_seconds, 1, 3600)?;

        validate_url("census_base_url", &self.census_base_url)?;
        validate_url("nws_base_url", &self.nws_base_url)?;
        validate_non_empty_string("user_agent", &self.user_agent)?;

        validate_range("request_timeout_seconds", self.request_timeout_seconds, 1, 300)?;
        validate_range("retry_attempts", self.retry_attempts, 0, 10)?;
        Ok(())
    }
}
