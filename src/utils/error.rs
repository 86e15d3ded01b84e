use crate::domain::model::Stage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("{name} parameter is required")]
    MissingParameter { name: String },

    #[error("No address matches found for '{address}'")]
    AddressNotFound { address: String },

    #[error("{service} responded with {status}: {message}")]
    Upstream {
        service: String,
        status: u16,
        message: String,
    },

    #[error("Malformed {service} response: {message}")]
    MalformedResponse { service: String, message: String },

    #[error("{} ({source})", .stage.public_message())]
    StageFailed {
        stage: Stage,
        #[source]
        source: Box<ForecastError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Upstream,
    Data,
    Client,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ForecastError {
    pub fn config(message: impl Into<String>) -> Self {
        ForecastError::Config {
            message: message.into(),
        }
    }

    pub fn malformed(service: &str, message: impl Into<String>) -> Self {
        ForecastError::MalformedResponse {
            service: service.to_string(),
            message: message.into(),
        }
    }

    /// Wraps the error with the forecast stage it happened in.
    pub fn at(self, stage: Stage) -> Self {
        ForecastError::StageFailed {
            stage,
            source: Box::new(self),
        }
    }

    /// The innermost error, looking through stage wrappers.
    pub fn root(&self) -> &ForecastError {
        match self {
            ForecastError::StageFailed { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn stage(&self) -> Option<Stage> {
        match self {
            ForecastError::StageFailed { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self.root() {
            ForecastError::Http(_) => ErrorCategory::Network,
            ForecastError::Io(_) => ErrorCategory::System,
            ForecastError::Serialization(_) | ForecastError::MalformedResponse { .. } => {
                ErrorCategory::Data
            }
            ForecastError::Yaml(_)
            | ForecastError::Config { .. }
            | ForecastError::InvalidConfigValue { .. } => ErrorCategory::Configuration,
            ForecastError::MissingParameter { .. } | ForecastError::AddressNotFound { .. } => {
                ErrorCategory::Client
            }
            ForecastError::Upstream { .. } => ErrorCategory::Upstream,
            ForecastError::StageFailed { .. } => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Client => ErrorSeverity::Low,
            ErrorCategory::Network | ErrorCategory::Upstream => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// HTTP status the API answers with for this error.
    pub fn status_code(&self) -> u16 {
        match self.root() {
            ForecastError::MissingParameter { .. } => 400,
            ForecastError::AddressNotFound { .. } => 404,
            ForecastError::Http(_)
            | ForecastError::Upstream { .. }
            | ForecastError::MalformedResponse { .. } => 502,
            _ if self.stage().is_some() => 502,
            _ => 500,
        }
    }

    /// Short message safe to show to API clients and terminal users.
    pub fn user_friendly_message(&self) -> String {
        if let Some(stage) = self.stage() {
            return stage.public_message().to_string();
        }
        match self {
            ForecastError::MissingParameter { .. } | ForecastError::AddressNotFound { .. } => {
                self.to_string()
            }
            ForecastError::Config { .. } | ForecastError::InvalidConfigValue { .. } => {
                format!("invalid configuration: {}", self)
            }
            ForecastError::Yaml(_) => "workflow file is not valid YAML".to_string(),
            ForecastError::Io(e) => format!("file system error: {}", e),
            _ => "internal error".to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.root() {
            ForecastError::MissingParameter { .. } => "pass ?address=<street, city, state>",
            ForecastError::AddressNotFound { .. } => {
                "check the address spelling; only US addresses can be geocoded"
            }
            ForecastError::Http(_) => "check network connectivity and upstream hostnames",
            ForecastError::Upstream { .. } => "the upstream service is unhealthy, retry later",
            ForecastError::MalformedResponse { .. } | ForecastError::Serialization(_) => {
                "the upstream response format changed or the model ignored the JSON format"
            }
            ForecastError::Config { .. } | ForecastError::InvalidConfigValue { .. } => {
                "fix the flag, environment variable or config file entry named above"
            }
            ForecastError::Yaml(_) => "run yamllint on the workflow file",
            ForecastError::Io(_) => "check that the path exists and is readable",
            ForecastError::StageFailed { .. } => "see the logs for the failing stage",
        }
    }
}

pub type Result<T> = std::result::Result<T, ForecastError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_wrapper_keeps_root_status() {
        let err = ForecastError::AddressNotFound {
            address: "nowhere".to_string(),
        }
        .at(Stage::Geocode);

        assert_eq!(err.status_code(), 404);
        assert_eq!(err.stage(), Some(Stage::Geocode));
        assert_eq!(err.user_friendly_message(), "error geocoding address");
        assert_eq!(err.category(), ErrorCategory::Client);
    }

    #[test]
    fn test_upstream_errors_map_to_bad_gateway() {
        let err = ForecastError::Upstream {
            service: "nws".to_string(),
            status: 503,
            message: "Service Unavailable".to_string(),
        }
        .at(Stage::Periods);

        assert_eq!(err.status_code(), 502);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.to_string().contains("error getting forecast periods"));
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_missing_parameter_message() {
        let err = ForecastError::MissingParameter {
            name: "address".to_string(),
        };
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.user_friendly_message(), "address parameter is required");
    }

    #[test]
    fn test_config_errors_are_high_severity() {
        let err = ForecastError::config("bad");
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(err.status_code(), 500);
    }
}
