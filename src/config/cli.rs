use crate::config::{self, ServiceConfig};
use clap::Parser;
use std::path::PathBuf;

/// Command line flags. Every flag falls back to an environment variable.
#[derive(Debug, Clone, Parser)]
#[command(name = "nws-forecast-summarizer")]
#[command(about = "Summarizes National Weather Service forecasts with a local language model")]
#[command(version)]
pub struct CliConfig {
    /// Load settings from a TOML file instead of flags and environment
    #[arg(long, env = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "LOG_LEVEL", default_value = config::DEFAULT_LOG_LEVEL)]
    pub log_level: String,

    /// compact or json
    #[arg(long, env = "LOG_FORMAT", default_value = config::DEFAULT_LOG_FORMAT)]
    pub log_format: String,

    #[arg(long, env = "API_HOST", default_value = config::DEFAULT_API_HOST)]
    pub api_host: String,

    #[arg(long, env = "API_PORT", default_value_t = config::DEFAULT_API_PORT)]
    pub api_port: u16,

    #[arg(long, env = "METRICS_HOST", default_value = config::DEFAULT_METRICS_HOST)]
    pub metrics_host: String,

    #[arg(long, env = "METRICS_PORT", default_value_t = config::DEFAULT_METRICS_PORT)]
    pub metrics_port: u16,

    #[arg(long, env = "OLLAMA_HOST", default_value = config::DEFAULT_OLLAMA_HOST)]
    pub ollama_host: String,

    #[arg(long, env = "OLLAMA_PORT", default_value_t = config::DEFAULT_OLLAMA_PORT)]
    pub ollama_port: u16,

    #[arg(long, env = "OLLAMA_MODEL", default_value = config::DEFAULT_OLLAMA_MODEL)]
    pub ollama_model: String,

    /// Seconds to wait for one model generation
    #[arg(long, env = "OLLAMA_TIMEOUT_SECONDS", default_value_t = config::DEFAULT_OLLAMA_TIMEOUT_SECONDS)]
    pub ollama_timeout_seconds: u64,

    #[arg(long, env = "CENSUS_BASE_URL", default_value = config::DEFAULT_CENSUS_BASE_URL)]
    pub census_base_url: String,

    #[arg(long, env = "NWS_BASE_URL", default_value = config::DEFAULT_NWS_BASE_URL)]
    pub nws_base_url: String,

    /// weather.gov rejects requests without an identifying User-Agent
    #[arg(long, env = "NWS_USER_AGENT", default_value = config::DEFAULT_USER_AGENT)]
    pub user_agent: String,

    #[arg(long, env = "REQUEST_TIMEOUT_SECONDS", default_value_t = config::DEFAULT_REQUEST_TIMEOUT_SECONDS)]
    pub request_timeout_seconds: u64,

    #[arg(long, env = "RETRY_ATTEMPTS", default_value_t = config::DEFAULT_RETRY_ATTEMPTS)]
    pub retry_attempts: u32,

    #[arg(long, env = "RETRY_DELAY_MS", default_value_t = config::DEFAULT_RETRY_DELAY_MS)]
    pub retry_delay_ms: u64,
}

impl From<CliConfig> for ServiceConfig {
    fn from(cli: CliConfig) -> Self {
        ServiceConfig {
            log_level: cli.log_level,
            log_format: cli.log_format,
            api_host: cli.api_host,
            api_port: cli.api_port,
            metrics_host: cli.metrics_host,
            metrics_port: cli.metrics_port,
            ollama_host: cli.ollama_host,
            ollama_port: cli.ollama_port,
            ollama_model: cli.ollama_model,
            ollama_timeout_seconds: cli.ollama_timeout_seconds,
            census_base_url: cli.census_base_url,
            nws_base_url: cli.nws_base_url,
            user_agent: cli.user_agent,
            request_timeout_seconds: cli.request_timeout_seconds,
            retry_attempts: cli.retry_attempts,
            retry_delay_ms: cli.retry_delay_ms,
        }
    }
}
