use crate::adapters::http::HttpClient;
use crate::domain::model::{Coordinates, Period};
use crate::domain::ports::WeatherSource;
use crate::utils::error::{ForecastError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};

const SERVICE: &str = "nws";

/// weather.gov client: points lookup, then the gridpoint forecast.
pub struct NwsClient {
    base_url: String,
    http: HttpClient,
}

impl NwsClient {
    pub fn new(base_url: impl Into<String>, http: HttpClient) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        }
    }

    /// Coordinates are rounded to five decimals.
    pub fn points_url(&self, coordinates: &Coordinates) -> String {
        format!(
            "{}/points/{:.5},{:.5}",
            self.base_url, coordinates.latitude, coordinates.longitude
        )
    }

    fn geojson_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/geojson"));
        headers
    }
}

#[async_trait]
impl WeatherSource for NwsClient {
    async fn forecast_url(&self, coordinates: &Coordinates) -> Result<String> {
        let body = self
            .http
            .get_json(&self.points_url(coordinates), &[], &Self::geojson_headers())
            .await?;

        match body["properties"]["forecast"].as_str() {
            Some(url) if !url.is_empty() => Ok(url.to_string()),
            _ => Err(ForecastError::malformed(SERVICE, "no forecast URL found")),
        }
    }

    async fn periods(&self, forecast_url: &str) -> Result<Vec<Period>> {
        let mut body = self
            .http
            .get_json(forecast_url, &[], &Self::geojson_headers())
            .await?;

        let periods = body["properties"]["periods"].take();
        if periods.is_null() {
            return Err(ForecastError::malformed(SERVICE, "properties.periods missing"));
        }

        let periods: Vec<Period> = serde_json::from_value(periods).map_err(|e| {
            ForecastError::malformed(SERVICE, format!("invalid forecast periods: {}", e))
        })?;

        if periods.is_empty() {
            return Err(ForecastError::malformed(SERVICE, "no forecast periods found"));
        }

        tracing::debug!("🌦️ {} forecast periods from {}", periods.len(), forecast_url);
        Ok(periods)
    }
}
