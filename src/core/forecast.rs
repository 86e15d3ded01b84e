use crate::adapters::{CensusGeocoder, HttpClient, HttpSettings, NwsClient, OllamaSummarizer};
use crate::config::ServiceConfig;
use crate::core::transform::simplify_periods;
use crate::domain::model::{ForecastSummary, Stage};
use crate::domain::ports::{Geocoder, Summarizer, WeatherSource};
use crate::utils::error::{ForecastError, Result};
use crate::utils::metrics::MetricsCollector;
use std::sync::Arc;
use std::time::Instant;

/// Runs address → coordinates → forecast URL → periods → summary.
#[derive(Clone)]
pub struct ForecastEngine {
    geocoder: Arc<dyn Geocoder>,
    weather: Arc<dyn WeatherSource>,
    summarizer: Arc<dyn Summarizer>,
}

impl ForecastEngine {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        weather: Arc<dyn WeatherSource>,
        summarizer: Arc<dyn Summarizer>,
    ) -> Self {
        Self {
            geocoder,
            weather,
            summarizer,
        }
    }

    /// Wires the Census, weather.gov and Ollama clients from config.
    pub fn from_config(config: &ServiceConfig, metrics: &MetricsCollector) -> Result<Self> {
        let settings = HttpSettings::from_config(config);

        let geocoder = CensusGeocoder::new(
            config.census_base_url.clone(),
            HttpClient::new("census", settings.clone(), metrics.clone())?,
        );
        let weather = NwsClient::new(
            config.nws_base_url.clone(),
            HttpClient::new("nws", settings, metrics.clone())?,
        );
        let summarizer = OllamaSummarizer::new(
            config.ollama_base_url(),
            config.ollama_model.clone(),
            HttpClient::new("ollama", HttpSettings::for_ollama(config), metrics.clone())?,
        );

        Ok(Self::new(
            Arc::new(geocoder),
            Arc::new(weather),
            Arc::new(summarizer),
        ))
    }

    pub async fn summarize_address(&self, address: &str) -> Result<ForecastSummary> {
        let address = address.trim();
        if address.is_empty() {
            return Err(ForecastError::MissingParameter {
                name: "address".to_string(),
            });
        }

        let started = Instant::now();
        tracing::info!("🔎 Forecast requested for '{}'", address);

        let coordinates = self
            .geocoder
            .geocode(address)
            .await
            .map_err(|e| e.at(Stage::Geocode))?;
        tracing::debug!(
            "📍 Geocoded to {:.5},{:.5}",
            coordinates.latitude,
            coordinates.longitude
        );

        let forecast_url = self
            .weather
            .forecast_url(&coordinates)
            .await
            .map_err(|e| e.at(Stage::ForecastUrl))?;

        let periods = self
            .weather
            .periods(&forecast_url)
            .await
            .map_err(|e| e.at(Stage::Periods))?;

        let simplified = simplify_periods(&periods);
        let summary = self
            .summarizer
            .summarize(&simplified)
            .await
            .map_err(|e| e.at(Stage::Summarize))?;

        tracing::info!(
            "✅ Summarized {} periods for '{}' in {:?}",
            simplified.len(),
            address,
            started.elapsed()
        );
        Ok(summary)
    }
}
