use crate::config::ServiceConfig;
use crate::utils::error::{ForecastError, Result};
use crate::utils::validation::Validate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

static ENV_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    // `${VAR_NAME}`
    Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid")
});

/// On-disk layout of the service configuration. Every key is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    #[serde(default)]
    pub log: LogSection,
    #[serde(default)]
    pub api: ListenerSection,
    #[serde(default)]
    pub metrics: ListenerSection,
    #[serde(default)]
    pub ollama: OllamaSection,
    #[serde(default)]
    pub upstream: UpstreamSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogSection {
    pub level: Option<String>,
    pub format: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListenerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OllamaSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub model: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpstreamSection {
    pub census_base_url: Option<String>,
    pub nws_base_url: Option<String>,
    pub user_agent: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub retry_attempts: Option<u32>,
    pub retry_delay_ms: Option<u64>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ForecastError::Io)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ForecastError::InvalidConfigValue {
            field: "toml_parsing".to_string(),
            value: String::new(),
            reason: format!("TOML parsing error: {}", e),
        })
    }

    /// Fills every unset key with its default.
    pub fn into_service_config(self) -> ServiceConfig {
        let defaults = ServiceConfig::default();
        ServiceConfig {
            log_level: self.log.level.unwrap_or(defaults.log_level),
            log_format: self.log.format.unwrap_or(defaults.log_format),
            api_host: self.api.host.unwrap_or(defaults.api_host),
            api_port: self.api.port.unwrap_or(defaults.api_port),
            metrics_host: self.metrics.host.unwrap_or(defaults.metrics_host),
            metrics_port: self.metrics.port.unwrap_or(defaults.metrics_port),
            ollama_host: self.ollama.host.unwrap_or(defaults.ollama_host),
            ollama_port: self.ollama.port.unwrap_or(defaults.ollama_port),
            ollama_model: self.ollama.model.unwrap_or(defaults.ollama_model),
            ollama_timeout_seconds: self
                .ollama
                .timeout_seconds
                .unwrap_or(defaults.ollama_timeout_seconds),
            census_base_url: self
                .upstream
                .census_base_url
                .unwrap_or(defaults.census_base_url),
            nws_base_url: self.upstream.nws_base_url.unwrap_or(defaults.nws_base_url),
            user_agent: self.upstream.user_agent.unwrap_or(defaults.user_agent),
            request_timeout_seconds: self
                .upstream
                .timeout_seconds
                .unwrap_or(defaults.request_timeout_seconds),
            retry_attempts: self
                .upstream
                .retry_attempts
                .unwrap_or(defaults.retry_attempts),
            retry_delay_ms: self
                .upstream
                .retry_delay_ms
                .unwrap_or(defaults.retry_delay_ms),
        }
    }
}

impl ServiceConfig {
    /// Loads and validates a TOML config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = TomlConfig::from_file(path)?.into_service_config();
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config = TomlConfig::from_toml_str(content)?.into_service_config();
        config.validate()?;
        Ok(config)
    }
}

/// Replaces `${VAR}` with the variable's value; unknown variables stay as written.
fn substitute_env_vars(content: &str) -> String {
    ENV_PLACEHOLDER
        .replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
}
