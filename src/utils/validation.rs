use crate::utils::error::{ForecastError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: impl ToString, reason: impl Into<String>) -> ForecastError {
    ForecastError::InvalidConfigValue {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty"));
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(invalid(
                field_name,
                url_str,
                format!("Unsupported URL scheme: {}", scheme),
            )),
        },
        Err(e) => Err(invalid(
            field_name,
            url_str,
            format!("Invalid URL format: {}", e),
        )),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_port(field_name: &str, port: u16) -> Result<()> {
    if port == 0 {
        return Err(invalid(field_name, port, "Port must be between 1 and 65535"));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(invalid(
            field_name,
            value,
            format!("Allowed values: {}", allowed.join(", ")),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("nws_base_url", "https://api.weather.gov").is_ok());
        assert!(validate_url("ollama_host", "http://localhost").is_ok());
        assert!(validate_url("nws_base_url", "").is_err());
        assert!(validate_url("nws_base_url", "invalid-url").is_err());
        assert!(validate_url("nws_base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_port() {
        assert!(validate_port("api_port", 8080).is_ok());
        assert!(validate_port("api_port", 0).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("retry_attempts", 2, 0, 10).is_ok());
        let err = validate_range("retry_attempts", 11, 0, 10).unwrap_err();
        assert!(err.to_string().contains("between 0 and 10"));
    }

    #[test]
    fn test_validate_one_of() {
        assert!(validate_one_of("log_format", "json", &["compact", "json"]).is_ok());
        assert!(validate_one_of("log_format", "pretty", &["compact", "json"]).is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("ollama_model", "llama3").is_ok());
        assert!(validate_non_empty_string("ollama_model", "   ").is_err());
    }
}
